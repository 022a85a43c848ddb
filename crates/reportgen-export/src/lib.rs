//! reportgen-export
//!
//! Renders compendium records into the gzip-compressed CSV artifact.

pub mod artifact;
pub mod error;
