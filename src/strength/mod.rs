//! Strength analysis
//!
//! Position analysis of a phrase within a source text, and the six-tier
//! strength classification built on top of it.

pub mod classifier;
pub mod position;
