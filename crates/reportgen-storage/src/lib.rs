//! reportgen-storage
//!
//! S3 operations for report artifacts. Thin wrapper around the AWS S3 SDK.

pub mod client;
pub mod error;
pub mod objects;
