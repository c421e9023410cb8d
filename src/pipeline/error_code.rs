//! Stable error codes for request diagnostics.
//!
//! Codes are part of the JSON contract: consumers match on them, so variants
//! may be added but never renamed.

use serde::Serialize;

/// Machine-readable category of a request diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Title and subtitle are both blank.
    EmptyInput,
    /// A numeric option is out of its allowed range.
    InvalidValue,
    /// Two options contradict each other (e.g. `minLength > maxLength`).
    InvalidRange,
    /// Every generation source is disabled.
    NoSources,
    /// A field the schema does not know.
    UnknownField,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::InvalidValue => "invalid_value",
            Self::InvalidRange => "invalid_range",
            Self::NoSources => "no_sources",
            Self::UnknownField => "unknown_field",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
