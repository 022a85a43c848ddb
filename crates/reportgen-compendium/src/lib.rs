//! reportgen-compendium
//!
//! Read-only HTTP client for the Hyrule compendium API, the source of report data.

pub mod client;
pub mod error;
