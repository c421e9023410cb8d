//! Combination generation
//!
//! This module provides the counted backtracking generator and the
//! input-size scaling policy that bounds its output.

pub mod generator;
pub mod scaling;
