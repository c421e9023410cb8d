//! Request diagnostics.

use serde::Serialize;
use thiserror::Error;

use super::error_code::ErrorCode;

/// A single problem with an analysis request, located by JSON pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{path}: {message} [{code}]")]
pub struct RequestError {
    pub code: ErrorCode,
    /// JSON pointer to the offending field (e.g. `/options/minLength`).
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl RequestError {
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    /// Attach a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
