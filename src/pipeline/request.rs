//! Analysis request types.
//!
//! An [`AnalysisRequest`] carries the two metadata fields and the per-call
//! options. It is the input to both the
//! [`super::validation::ValidationEngine`] and the
//! [`super::runner::Pipeline`].
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "titleText": "Headspace: Meditation & Sleep",
//!   "subtitleText": "Mindfulness Timer & Wellness App",
//!   "options": {
//!     "minLength": 2,
//!     "maxLength": 3,
//!     "includeCrossElement": true,
//!     "perSourceCap": 500,
//!     "scaling": { "topN": 300 }
//!   },
//!   "strict": false
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::CombinationOptions;

/// One analysis request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub title_text: String,

    #[serde(default)]
    pub subtitle_text: String,

    /// Omitted options take their defaults.
    #[serde(default)]
    pub options: CombinationOptions,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl AnalysisRequest {
    /// Request with default options.
    pub fn new(title_text: impl Into<String>, subtitle_text: impl Into<String>) -> Self {
        Self {
            title_text: title_text.into(),
            subtitle_text: subtitle_text.into(),
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: CombinationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Parse a request from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
