//! reportgen-core
//!
//! Pure domain types and S3 key conventions.
//! No AWS SDK or database dependency. This is the shared vocabulary of the
//! report generation pipeline.

pub mod error;
pub mod models;
pub mod s3_keys;
