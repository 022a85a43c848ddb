use aws_sdk_s3::Client;

/// Build an S3 client from the ambient AWS configuration.
///
/// When `endpoint` is set (e.g. LocalStack) requests go there with path-style
/// addressing, since emulators rarely serve virtual-hosted buckets.
pub fn build_client(config: &aws_config::SdkConfig, endpoint: Option<&str>) -> Client {
    let mut builder = aws_sdk_s3::config::Builder::from(config);
    if let Some(url) = endpoint {
        builder = builder.endpoint_url(url).force_path_style(true);
    }
    Client::from_conf(builder.build())
}
