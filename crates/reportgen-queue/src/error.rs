use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue does not exist: {name}")]
    QueueNotFound { name: String },

    #[error("SQS GetQueueUrl error for {name}: {message}")]
    GetQueueUrl { name: String, message: String },

    #[error("SQS ReceiveMessage error: {0}")]
    Receive(String),

    #[error("SQS DeleteMessage error: {0}")]
    Delete(String),

    #[error("SQS SendMessage error: {0}")]
    Send(String),
}
