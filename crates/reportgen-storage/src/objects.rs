use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use crate::error::StorageError;

/// Put an object to S3, replacing whatever is stored under `key`.
pub async fn put_object(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: Option<&str>,
    content_encoding: Option<&str>,
) -> Result<(), StorageError> {
    let size = body.len();
    let mut req = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body));

    if let Some(ct) = content_type {
        req = req.content_type(ct);
    }
    if let Some(ce) = content_encoding {
        req = req.content_encoding(ce);
    }

    req.send().await.map_err(|e| StorageError::PutObject {
        key: key.to_string(),
        message: e.into_service_error().to_string(),
    })?;

    debug!(bucket, key, size, "object stored");
    Ok(())
}
