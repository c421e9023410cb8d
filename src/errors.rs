//! Crate-level error type

use thiserror::Error;

use crate::pipeline::errors::RequestError;

/// Errors returned by the analysis entry points
#[derive(Debug, Error)]
pub enum ComboError {
    /// The request failed validation; every error diagnostic is included
    #[error("invalid input: {}", format_errors(.0))]
    InvalidInput(Vec<RequestError>),

    /// The JSON request could not be parsed or the result serialized
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ComboError {
    /// Diagnostics for an `InvalidInput` error
    pub fn diagnostics(&self) -> &[RequestError] {
        match self {
            Self::InvalidInput(errors) => errors,
            Self::Json(_) => &[],
        }
    }
}

fn format_errors(errors: &[RequestError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ComboError>;
