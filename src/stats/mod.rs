//! Aggregate statistics and value estimation

pub mod aggregator;
pub mod value;
