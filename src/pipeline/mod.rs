//! Analysis pipeline
//!
//! This module provides the request model, request validation, the stage
//! runner and its observer hooks.

pub mod error_code;
pub mod errors;
pub mod observer;
pub mod request;
pub mod runner;
pub mod traits;
pub mod validation;
