//! reportgen-db
//!
//! PostgreSQL persistence for the `reports` table.

pub mod error;
pub mod pool;
pub mod reports;
mod row;
