use aws_sdk_sqs::Client;
use tracing::debug;

use crate::error::QueueError;

/// SQS caps a single receive at ten messages.
pub const MAX_BATCH_SIZE: usize = 10;

/// Long-poll duration for [`receive_messages`].
pub const WAIT_TIME_SECONDS: i32 = 20;

/// A received message, detached from the SDK types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueMessage {
    pub message_id: Option<String>,
    pub body: Option<String>,
    pub receipt_handle: Option<String>,
}

/// Resolve a queue name to its URL.
pub async fn queue_url(client: &Client, name: &str) -> Result<String, QueueError> {
    let resp = client
        .get_queue_url()
        .queue_name(name)
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            if err.is_queue_does_not_exist() {
                QueueError::QueueNotFound {
                    name: name.to_string(),
                }
            } else {
                QueueError::GetQueueUrl {
                    name: name.to_string(),
                    message: err.to_string(),
                }
            }
        })?;

    resp.queue_url()
        .map(|s| s.to_string())
        .ok_or_else(|| QueueError::QueueNotFound {
            name: name.to_string(),
        })
}

/// Long-poll for up to `max_messages` messages (clamped to the SQS limit).
///
/// Returns an empty vec when the wait elapses with nothing available.
pub async fn receive_messages(
    client: &Client,
    queue_url: &str,
    max_messages: usize,
) -> Result<Vec<QueueMessage>, QueueError> {
    let max = max_messages.clamp(1, MAX_BATCH_SIZE) as i32;

    let resp = client
        .receive_message()
        .queue_url(queue_url)
        .max_number_of_messages(max)
        .wait_time_seconds(WAIT_TIME_SECONDS)
        .send()
        .await
        .map_err(|e| QueueError::Receive(e.into_service_error().to_string()))?;

    let messages: Vec<QueueMessage> = resp
        .messages()
        .iter()
        .map(|m| QueueMessage {
            message_id: m.message_id().map(|s| s.to_string()),
            body: m.body().map(|s| s.to_string()),
            receipt_handle: m.receipt_handle().map(|s| s.to_string()),
        })
        .collect();

    debug!(count = messages.len(), "received messages");
    Ok(messages)
}

/// Delete a message, acknowledging it so it is not redelivered.
pub async fn delete_message(
    client: &Client,
    queue_url: &str,
    receipt_handle: &str,
) -> Result<(), QueueError> {
    client
        .delete_message()
        .queue_url(queue_url)
        .receipt_handle(receipt_handle)
        .send()
        .await
        .map_err(|e| QueueError::Delete(e.into_service_error().to_string()))?;

    Ok(())
}

/// Send a message body. Returns the SQS message id.
pub async fn send_message(
    client: &Client,
    queue_url: &str,
    body: &str,
) -> Result<String, QueueError> {
    let resp = client
        .send_message()
        .queue_url(queue_url)
        .message_body(body)
        .send()
        .await
        .map_err(|e| QueueError::Send(e.into_service_error().to_string()))?;

    Ok(resp.message_id().unwrap_or_default().to_string())
}
