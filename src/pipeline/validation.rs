//! Validation engine for analysis requests.
//!
//! The engine runs all registered [`ValidationRule`]s against an
//! [`AnalysisRequest`](super::request::AnalysisRequest) and collects every
//! diagnostic into a [`ValidationReport`]; it never short-circuits on the
//! first error, so callers see all problems at once.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use rapid_combos::pipeline::validation::ValidationEngine;
//!
//! let engine = ValidationEngine::with_defaults();
//! let report = engine.validate(&request);
//! if report.has_errors() {
//!     for err in report.errors() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use super::error_code::ErrorCode;
use super::errors::RequestError;
use super::request::AnalysisRequest;
use crate::types::MAX_PHRASE_LENGTH;

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: RequestError,
}

impl ValidationDiagnostic {
    pub fn error(err: RequestError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: RequestError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &RequestError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    /// Iterate over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &RequestError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects a request and returns zero or more
/// diagnostics.
///
/// Rules are stateless and must be `Send + Sync` so one engine can serve
/// parallel batch analysis.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"length_range"`).
    fn name(&self) -> &str;

    /// Inspect `request` and return any findings.
    fn validate(&self, request: &AnalysisRequest) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against a request and collects all
/// diagnostics into a [`ValidationReport`].
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(EmptyInputRule));
        engine.add_rule(Box::new(LengthRangeRule));
        engine.add_rule(Box::new(LimitsRule));
        engine.add_rule(Box::new(SourcesRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    /// Register an additional rule.
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in run order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules against `request` and return the collected report.
    pub fn validate(&self, request: &AnalysisRequest) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(request));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. at least one field must have text ───────────────────────────────────

struct EmptyInputRule;

impl ValidationRule for EmptyInputRule {
    fn name(&self) -> &str {
        "empty_input"
    }

    fn validate(&self, request: &AnalysisRequest) -> Vec<ValidationDiagnostic> {
        if request.title_text.trim().is_empty() && request.subtitle_text.trim().is_empty() {
            vec![ValidationDiagnostic::error(
                RequestError::new(
                    ErrorCode::EmptyInput,
                    "",
                    "titleText and subtitleText are both empty",
                )
                .with_hint("Provide a title, a subtitle, or both"),
            )]
        } else {
            vec![]
        }
    }
}

// ─── 2. phrase length range ─────────────────────────────────────────────────

struct LengthRangeRule;

impl ValidationRule for LengthRangeRule {
    fn name(&self) -> &str {
        "length_range"
    }

    fn validate(&self, request: &AnalysisRequest) -> Vec<ValidationDiagnostic> {
        let options = &request.options;
        let mut out = Vec::new();

        if options.min_length == 0 {
            out.push(ValidationDiagnostic::error(
                RequestError::new(
                    ErrorCode::InvalidValue,
                    "/options/minLength",
                    "minLength must be greater than 0",
                )
                .with_hint("Use 2 for multi-word combinations"),
            ));
        } else if options.min_length == 1 {
            out.push(ValidationDiagnostic::warning(RequestError::new(
                ErrorCode::InvalidValue,
                "/options/minLength",
                "minLength of 1 produces single words, not combinations",
            )));
        }

        if options.min_length > options.max_length {
            out.push(ValidationDiagnostic::error(
                RequestError::new(
                    ErrorCode::InvalidRange,
                    "/options/minLength",
                    format!(
                        "minLength ({}) is greater than maxLength ({})",
                        options.min_length, options.max_length
                    ),
                )
                .with_hint("Swap the values or raise maxLength"),
            ));
        }

        if options.max_length > MAX_PHRASE_LENGTH {
            out.push(ValidationDiagnostic::error(
                RequestError::new(
                    ErrorCode::InvalidValue,
                    "/options/maxLength",
                    format!(
                        "maxLength ({}) exceeds the limit of {} words",
                        options.max_length, MAX_PHRASE_LENGTH
                    ),
                )
                .with_hint(format!("Use a maxLength of at most {MAX_PHRASE_LENGTH}")),
            ));
        }

        out
    }
}

// ─── 3. caps and scaling limits must be positive and ordered ────────────────

struct LimitsRule;

impl ValidationRule for LimitsRule {
    fn name(&self) -> &str {
        "limits"
    }

    fn validate(&self, request: &AnalysisRequest) -> Vec<ValidationDiagnostic> {
        let options = &request.options;
        let scaling = &options.scaling;
        let mut out = Vec::new();

        let checks: &[(&str, usize)] = &[
            ("/options/perSourceCap", options.per_source_cap),
            ("/options/scaling/rankedBudget", scaling.ranked_budget),
            ("/options/scaling/topN", scaling.top_n),
        ];

        for &(path, value) in checks {
            if value == 0 {
                let field = path.rsplit('/').next().unwrap_or(path);
                out.push(ValidationDiagnostic::error(
                    RequestError::new(
                        ErrorCode::InvalidValue,
                        path,
                        format!("{field} must be greater than 0"),
                    )
                    .with_hint(format!("Remove {field} to use the default")),
                ));
            }
        }

        if scaling.full_enumeration_max > scaling.ranked_max {
            out.push(ValidationDiagnostic::error(RequestError::new(
                ErrorCode::InvalidRange,
                "/options/scaling/fullEnumerationMax",
                format!(
                    "fullEnumerationMax ({}) is greater than rankedMax ({})",
                    scaling.full_enumeration_max, scaling.ranked_max
                ),
            )));
        }

        out
    }
}

// ─── 4. at least one source enabled ─────────────────────────────────────────

struct SourcesRule;

impl ValidationRule for SourcesRule {
    fn name(&self) -> &str {
        "sources"
    }

    fn validate(&self, request: &AnalysisRequest) -> Vec<ValidationDiagnostic> {
        let options = &request.options;
        if options.include_title_only
            || options.include_subtitle_only
            || options.include_cross_element
        {
            return vec![];
        }
        vec![ValidationDiagnostic::warning(
            RequestError::new(
                ErrorCode::NoSources,
                "/options",
                "every combination source is disabled; no combinations will be generated",
            )
            .with_hint("Enable includeTitleOnly, includeSubtitleOnly, or includeCrossElement"),
        )]
    }
}

// ─── 5. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl UnknownFieldsRule {
    /// Collect unknown-field diagnostics at the given JSON pointer `path`
    /// from a map of extra fields captured by `#[serde(flatten)]`.
    fn check_unknowns(
        path: &str,
        unknowns: &HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let diag_fn = if strict {
                    ValidationDiagnostic::error
                } else {
                    ValidationDiagnostic::warning
                };
                diag_fn(
                    RequestError::new(
                        ErrorCode::UnknownField,
                        format!("{path}/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, request: &AnalysisRequest) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();
        out.extend(Self::check_unknowns("", &request.unknown_fields, request.strict));
        out.extend(Self::check_unknowns(
            "/options",
            &request.options.unknown_fields,
            request.strict,
        ));
        out.extend(Self::check_unknowns(
            "/options/scaling",
            &request.options.scaling.unknown_fields,
            request.strict,
        ));
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════
