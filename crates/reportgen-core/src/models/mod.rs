pub mod job;
pub mod monster;
pub mod report;
