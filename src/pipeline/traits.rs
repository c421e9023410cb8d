//! Stage trait definitions for the pipeline.
//!
//! The pipeline itself is fixed (tokenize → preprocess → generate → classify
//! → aggregate). The one pluggable boundary is keyword preprocessing: callers
//! that know domain facts the engine does not (brand names, banned terms)
//! rewrite the keyword lists before generation.

use crate::types::{CombinationOptions, Keyword};

/// Title and subtitle keyword lists flowing from the tokenizer to the
/// generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordLists {
    pub title: Vec<Keyword>,
    pub subtitle: Vec<Keyword>,
}

impl KeywordLists {
    pub fn new(title: Vec<Keyword>, subtitle: Vec<Keyword>) -> Self {
        Self { title, subtitle }
    }

    /// Total keywords across both fields (duplicates included)
    pub fn len(&self) -> usize {
        self.title.len() + self.subtitle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.subtitle.is_empty()
    }

    /// Keep only keywords matching `keep`, in both lists
    pub fn retain(&mut self, mut keep: impl FnMut(&Keyword) -> bool) {
        self.title.retain(|k| keep(k));
        self.subtitle.retain(|k| keep(k));
    }
}

/// Optional keyword preprocessing stage.
///
/// # Contract
///
/// - **Input**: mutable [`KeywordLists`] (modify in place).
/// - **Output**: none, the lists are mutated in place.
/// - **Idempotent**: calling `preprocess` twice should produce the same
///   result as calling it once.
/// - Must only remove or rewrite keywords; the strength classifier still
///   reads the original title and subtitle text.
pub trait KeywordPreprocessor {
    /// Preprocess the keyword lists in place.
    fn preprocess(&self, keywords: &mut KeywordLists, options: &CombinationOptions);
}

/// No-op preprocessor, the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPreprocessor;

impl KeywordPreprocessor for NoopPreprocessor {
    #[inline]
    fn preprocess(&self, _keywords: &mut KeywordLists, _options: &CombinationOptions) {}
}
