//! reportgen-queue
//!
//! SQS operations for the report job queue. Thin wrapper around the AWS SQS SDK.

pub mod client;
pub mod error;
pub mod messages;
