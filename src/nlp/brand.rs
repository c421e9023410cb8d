//! Brand-term filtering
//!
//! Brand names (the app's own or a competitor's) are domain knowledge the
//! engine does not have. Callers that want them out of the generated
//! combinations plug a [`BrandFilter`] into the pipeline as its keyword
//! preprocessor. Classification is unaffected: a phrase containing a brand
//! word is still classified against the full title and subtitle.

use rustc_hash::FxHashSet;

use super::tokenizer::Tokenizer;
use crate::pipeline::traits::{KeywordLists, KeywordPreprocessor};
use crate::types::CombinationOptions;

/// Removes brand terms from the keyword lists
#[derive(Debug, Clone, Default)]
pub struct BrandFilter {
    terms: FxHashSet<String>,
}

impl BrandFilter {
    /// Build a filter from brand names
    ///
    /// Multi-word names ("Sleep Cycle") contribute every word.
    pub fn new<S: AsRef<str>>(brands: &[S]) -> Self {
        let tokenizer = Tokenizer::with_stopwords(super::stopwords::StopwordFilter::empty());
        let terms = brands
            .iter()
            .flat_map(|b| tokenizer.phrase_words(b.as_ref()))
            .collect();
        Self { terms }
    }

    /// Whether a normalized word is a brand term
    pub fn is_brand(&self, word: &str) -> bool {
        self.terms.contains(word)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl KeywordPreprocessor for BrandFilter {
    fn preprocess(&self, keywords: &mut KeywordLists, _options: &CombinationOptions) {
        if self.terms.is_empty() {
            return;
        }
        keywords.retain(|k| !self.is_brand(&k.text));
    }
}
