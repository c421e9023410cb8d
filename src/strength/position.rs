//! Position analysis
//!
//! Answers two questions about a phrase and a source text: are all of the
//! phrase's words present, and do they form an adjacent, in-order run?
//!
//! Presence is multiset containment: a repeated phrase word needs a distinct
//! occurrence for each repetition. Adjacency is checked inside a single
//! segment, and source stopwords between matched words are skipped, so
//! "editor instagram" is consecutive in "Editor for Instagram" but
//! "headspace meditation" is not consecutive in "Headspace: Meditation".

use rustc_hash::FxHashMap;

use crate::nlp::tokenizer::{Term, Tokenizer};

/// Result of locating a phrase in a source text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionMatch {
    /// Every phrase word has its own occurrence in the source
    pub exists: bool,
    /// The words form an adjacent in-order run
    pub is_consecutive: bool,
    /// Term indices of the matched occurrences, in phrase order
    pub positions: Vec<usize>,
}

/// A pre-normalized source text
#[derive(Debug, Clone, Default)]
pub struct SourceText {
    terms: Vec<Term>,
    counts: FxHashMap<String, usize>,
}

impl SourceText {
    /// Normalize `text` with the shared tokenizer
    pub fn new(text: &str, tokenizer: &Tokenizer) -> Self {
        Self::from_terms(tokenizer.normalize(text))
    }

    pub fn from_terms(terms: Vec<Term>) -> Self {
        let mut counts: FxHashMap<String, usize> = FxHashMap::default();
        for term in &terms {
            *counts.entry(term.text.clone()).or_insert(0) += 1;
        }
        Self { terms, counts }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Number of occurrences of a normalized word
    pub fn occurrences(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.occurrences(word) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Locate `words` in this text
    pub fn locate<S: AsRef<str>>(&self, words: &[S]) -> PositionMatch {
        if words.is_empty() {
            return PositionMatch::default();
        }

        if let Some(run) = self.find_run(words) {
            return PositionMatch {
                exists: true,
                is_consecutive: true,
                positions: run,
            };
        }

        match self.match_occurrences(words) {
            Some(positions) => PositionMatch {
                exists: true,
                is_consecutive: false,
                positions,
            },
            None => PositionMatch::default(),
        }
    }

    /// First adjacent in-order run of `words`, if any
    fn find_run<S: AsRef<str>>(&self, words: &[S]) -> Option<Vec<usize>> {
        let first = words[0].as_ref();
        self.terms
            .iter()
            .filter(|t| t.text == first)
            .find_map(|t| self.run_from(t.index, words))
    }

    fn run_from<S: AsRef<str>>(&self, start: usize, words: &[S]) -> Option<Vec<usize>> {
        let segment = self.terms[start].segment;
        let mut positions = Vec::with_capacity(words.len());
        positions.push(start);

        let mut next = 1;
        let mut i = start + 1;
        while next < words.len() {
            let term = self.terms.get(i)?;
            if term.segment != segment {
                return None;
            }
            if term.text == words[next].as_ref() {
                positions.push(i);
                next += 1;
            } else if !term.is_stopword {
                return None;
            }
            i += 1;
        }
        Some(positions)
    }

    /// Assign each word its first unused occurrence
    fn match_occurrences<S: AsRef<str>>(&self, words: &[S]) -> Option<Vec<usize>> {
        let mut used = vec![false; self.terms.len()];
        let mut positions = Vec::with_capacity(words.len());
        for word in words {
            let word = word.as_ref();
            let idx = self
                .terms
                .iter()
                .position(|t| !used[t.index] && t.text == word)?;
            used[idx] = true;
            positions.push(idx);
        }
        Some(positions)
    }
}

/// Locate `phrase` in `source_text` using the default English tokenizer
pub fn analyze_in_text(phrase: &str, source_text: &str) -> PositionMatch {
    let tokenizer = Tokenizer::new();
    let words = tokenizer.phrase_words(phrase);
    SourceText::new(source_text, &tokenizer).locate(&words)
}
