//! Tokenization
//!
//! Two views of the same text come out of the [`Tokenizer`]:
//!
//! - [`Tokenizer::normalize`] yields every word as a [`Term`], with its
//!   segment index and stopword flag. The position analyzer works on this.
//! - [`Tokenizer::tokenize`] yields only the [`Keyword`]s worth combining:
//!   stopwords and single-character tokens are dropped.
//!
//! Normalization lowercases, deletes apostrophes, and treats every other
//! non-alphanumeric character as whitespace. Separator punctuation
//! (`: ; , . | ! ? ( ) [ ] { } • · – —`, or `-` and `/` touching whitespace)
//! additionally closes the current segment, so `"Headspace: Meditation"` puts
//! the two words in different segments while `"Meditation & Sleep"` keeps
//! them together.

use super::stopwords::StopwordFilter;
use crate::types::{Keyword, SourceField};

/// Minimum characters for a token to become a keyword
const MIN_KEYWORD_CHARS: usize = 2;

/// A normalized word from a source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub text: String,
    /// Index in the term stream
    pub index: usize,
    /// Segment the term belongs to
    pub segment: usize,
    pub is_stopword: bool,
}

/// Shared tokenizer; owns the stopword set used by every stage
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stopwords: StopwordFilter,
}

impl Tokenizer {
    /// English tokenizer
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenizer with the stopword list for `language`
    pub fn for_language(language: &str) -> Self {
        Self {
            stopwords: StopwordFilter::new(language),
        }
    }

    /// Tokenizer with a custom stopword filter
    pub fn with_stopwords(stopwords: StopwordFilter) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopwordFilter {
        &self.stopwords
    }

    /// Whether a normalized word qualifies as a keyword
    pub fn is_keyword(&self, word: &str) -> bool {
        word.chars().count() >= MIN_KEYWORD_CHARS && !self.stopwords.is_stopword(word)
    }

    /// Split `text` into its full normalized term stream
    pub fn normalize(&self, text: &str) -> Vec<Term> {
        split_segments(text)
            .into_iter()
            .enumerate()
            .map(|(index, (word, segment))| Term {
                is_stopword: self.stopwords.is_stopword(&word),
                text: word,
                index,
                segment,
            })
            .collect()
    }

    /// Normalized words of a phrase, nothing filtered
    pub fn phrase_words(&self, phrase: &str) -> Vec<String> {
        split_segments(phrase).into_iter().map(|(word, _)| word).collect()
    }

    /// Extract the keywords of `text`, tagged with `field`
    pub fn tokenize(&self, text: &str, field: SourceField) -> Vec<Keyword> {
        split_segments(text)
            .into_iter()
            .filter(|(word, _)| self.is_keyword(word))
            .enumerate()
            .map(|(position, (word, segment))| Keyword::new(word, field, position, segment))
            .collect()
    }
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | '\u{2018}' | '`')
}

fn is_hard_separator(c: char) -> bool {
    matches!(
        c,
        ':' | ';' | ',' | '.' | '|' | '!' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '•' | '·'
            | '\u{2013}'
            | '\u{2014}'
    )
}

/// Split into `(lowercased word, segment)` pairs
fn split_segments(text: &str) -> Vec<(String, usize)> {
    let chars: Vec<char> = text.chars().collect();
    let mut out: Vec<(String, usize)> = Vec::new();
    let mut current = String::new();
    let mut segment = 0usize;
    let mut boundary_pending = false;

    let mut flush = |word: &mut String, segment: &mut usize, boundary_pending: &mut bool| {
        if word.is_empty() {
            return;
        }
        if *boundary_pending && !out.is_empty() {
            *segment += 1;
        }
        *boundary_pending = false;
        out.push((std::mem::take(word), *segment));
    };

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
            continue;
        }
        if is_apostrophe(c) {
            continue;
        }

        flush(&mut current, &mut segment, &mut boundary_pending);

        let separator = if c == '-' || c == '/' {
            let before = i == 0 || chars[i - 1].is_whitespace();
            let after = i + 1 >= chars.len() || chars[i + 1].is_whitespace();
            before || after
        } else {
            is_hard_separator(c)
        };
        if separator {
            boundary_pending = true;
        }
    }
    flush(&mut current, &mut segment, &mut boundary_pending);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(keywords: &[Keyword]) -> Vec<&str> {
        keywords.iter().map(|k| k.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_lowercases_and_strips_punctuation() {
        let tokenizer = Tokenizer::new();
        let keywords = tokenizer.tokenize("Headspace: Meditation & Sleep", SourceField::Title);

        assert_eq!(texts(&keywords), vec!["headspace", "meditation", "sleep"]);
        assert!(keywords.iter().all(|k| k.field == SourceField::Title));
        assert_eq!(keywords[2].position, 2);
    }

    #[test]
    fn test_tokenize_drops_stopwords_and_short_tokens() {
        let tokenizer = Tokenizer::new();
        let keywords =
            tokenizer.tokenize("A Photo Editor for the X Generation", SourceField::Subtitle);

        assert_eq!(texts(&keywords), vec!["photo", "editor", "generation"]);
        assert_eq!(keywords[2].position, 2);
    }

    #[test]
    fn test_colon_starts_new_segment() {
        let tokenizer = Tokenizer::new();
        let terms = tokenizer.normalize("Headspace: Meditation & Sleep");

        assert_eq!(terms.len(), 3);
        assert_eq!(terms[0].segment, 0);
        assert_eq!(terms[1].segment, 1);
        assert_eq!(terms[2].segment, 1);
    }

    #[test]
    fn test_dash_between_spaces_is_separator() {
        let tokenizer = Tokenizer::new();
        let terms = tokenizer.normalize("Calm - Sleep Sounds");
        assert_ne!(terms[0].segment, terms[1].segment);

        let terms = tokenizer.normalize("To-Do List");
        let words: Vec<_> = terms.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["to", "do", "list"]);
        assert!(terms.iter().all(|t| t.segment == 0));
    }

    #[test]
    fn test_apostrophes_are_deleted() {
        let tokenizer = Tokenizer::new();
        let keywords = tokenizer.tokenize("Kid's Games, Don\u{2019}t Stop", SourceField::Title);
        assert_eq!(texts(&keywords), vec!["kids", "games", "dont", "stop"]);
    }

    #[test]
    fn test_normalize_keeps_stopwords_flagged() {
        let tokenizer = Tokenizer::new();
        let terms = tokenizer.normalize("Editor for Instagram");

        assert_eq!(terms.len(), 3);
        assert!(!terms[0].is_stopword);
        assert!(terms[1].is_stopword);
        assert_eq!(terms[2].index, 2);
    }

    #[test]
    fn test_phrase_words_keeps_everything() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.phrase_words("A c"), vec!["a", "c"]);
        assert!(tokenizer.phrase_words("  ").is_empty());
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.tokenize("", SourceField::Title).is_empty());
        assert!(tokenizer.normalize(":: & --").is_empty());
    }

    #[test]
    fn test_unicode_words() {
        let tokenizer = Tokenizer::for_language("de");
        let keywords = tokenizer.tokenize("Übungen für Schlaf", SourceField::Title);
        assert_eq!(texts(&keywords), vec!["übungen", "schlaf"]);
    }
}
