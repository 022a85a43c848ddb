//! reportgen-worker
//!
//! The asynchronous report pipeline: a bounded worker pool consuming job
//! descriptors from the queue, and the idempotent builder that turns each one
//! into a stored artifact and a terminal report state.

pub mod adapters;
pub mod builder;
pub mod config;
pub mod error;
pub mod pool;
pub mod ports;
pub mod submit;
