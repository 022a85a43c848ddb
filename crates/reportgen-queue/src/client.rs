use aws_sdk_sqs::Client;

/// Build an SQS client from the ambient AWS configuration, optionally pointed
/// at an emulator endpoint.
pub fn build_client(config: &aws_config::SdkConfig, endpoint: Option<&str>) -> Client {
    let mut builder = aws_sdk_sqs::config::Builder::from(config);
    if let Some(url) = endpoint {
        builder = builder.endpoint_url(url);
    }
    Client::from_conf(builder.build())
}
