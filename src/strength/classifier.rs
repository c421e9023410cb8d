//! Strength classification
//!
//! Assigns every phrase exactly one [`StrengthTier`] by checking, in order of
//! ranking power:
//!
//! 1. title, consecutive
//! 2. title, non-consecutive
//! 3. cross-element: title and subtitle jointly hold every word, and the
//!    title holds at least one of them
//! 4. subtitle, consecutive
//! 5. subtitle, non-consecutive
//! 6. missing
//!
//! Only title-consecutive phrases are at full strength. Everything else can be
//! strengthened, except a missing phrase that needs a word absent from both
//! fields.

use rustc_hash::FxHashMap;

use super::position::SourceText;
use crate::nlp::tokenizer::Tokenizer;
use crate::types::{Classification, ComboSource, Combination, StrengthTier};

/// Classifies phrases against one title/subtitle pair
#[derive(Debug, Clone)]
pub struct StrengthClassifier<'t> {
    tokenizer: &'t Tokenizer,
    title: SourceText,
    subtitle: SourceText,
}

impl<'t> StrengthClassifier<'t> {
    /// Normalize both texts once for repeated classification
    pub fn new(tokenizer: &'t Tokenizer, title_text: &str, subtitle_text: &str) -> Self {
        Self {
            tokenizer,
            title: SourceText::new(title_text, tokenizer),
            subtitle: SourceText::new(subtitle_text, tokenizer),
        }
    }

    /// Classify a generated combination
    pub fn classify(&self, combination: &Combination) -> Classification {
        self.classify_words(&combination.words())
    }

    /// Classify an arbitrary phrase (e.g. a target search term)
    pub fn classify_phrase(&self, phrase: &str) -> Classification {
        let words = self.tokenizer.phrase_words(phrase);
        self.classify_words(&words)
    }

    /// Classify a phrase given as normalized words
    pub fn classify_words<S: AsRef<str>>(&self, words: &[S]) -> Classification {
        let phrase = words
            .iter()
            .map(|w| w.as_ref())
            .collect::<Vec<_>>()
            .join(" ");

        let in_title = self.title.locate(words);
        if in_title.exists {
            if in_title.is_consecutive {
                return Classification {
                    tier: StrengthTier::TitleConsecutive,
                    is_consecutive: true,
                    can_strengthen: false,
                    suggestion: None,
                };
            }
            return Classification {
                tier: StrengthTier::TitleNonConsecutive,
                is_consecutive: false,
                can_strengthen: true,
                suggestion: Some(format!(
                    "Place \"{phrase}\" as adjacent words in the title"
                )),
            };
        }

        if !words.is_empty() && self.is_cross_element(words) {
            let moved = self.subtitle_only_words(words).join(" ");
            return Classification {
                tier: StrengthTier::CrossElement,
                is_consecutive: false,
                can_strengthen: true,
                suggestion: Some(format!(
                    "Move \"{moved}\" from the subtitle to the title to form \"{phrase}\" in the title"
                )),
            };
        }

        let in_subtitle = self.subtitle.locate(words);
        if in_subtitle.exists {
            let (tier, suggestion) = if in_subtitle.is_consecutive {
                (
                    StrengthTier::SubtitleConsecutive,
                    format!("Move \"{phrase}\" from the subtitle to the title"),
                )
            } else {
                (
                    StrengthTier::SubtitleNonConsecutive,
                    format!("Move \"{phrase}\" from the subtitle to the title as adjacent words"),
                )
            };
            return Classification {
                tier,
                is_consecutive: in_subtitle.is_consecutive,
                can_strengthen: true,
                suggestion: Some(suggestion),
            };
        }

        let formable = !words.is_empty()
            && words
                .iter()
                .all(|w| self.title.contains(w.as_ref()) || self.subtitle.contains(w.as_ref()));
        Classification {
            tier: StrengthTier::Missing,
            is_consecutive: false,
            can_strengthen: formable,
            suggestion: formable.then(|| {
                format!("Rearrange existing words so \"{phrase}\" appears in the title")
            }),
        }
    }

    /// Pool that can supply every word: one field alone, or both together
    ///
    /// Phrases needing words from neither field also report
    /// [`ComboSource::CrossElement`]; they classify as `Missing`.
    pub fn source_of<S: AsRef<str>>(&self, words: &[S]) -> ComboSource {
        if self.title.locate(words).exists {
            ComboSource::TitleOnly
        } else if self.subtitle.locate(words).exists {
            ComboSource::SubtitleOnly
        } else {
            ComboSource::CrossElement
        }
    }

    /// Both fields together hold every word, and the title holds some
    fn is_cross_element<S: AsRef<str>>(&self, words: &[S]) -> bool {
        let needed = word_counts(words);
        let covered = needed.iter().all(|(word, &count)| {
            self.title.occurrences(word) + self.subtitle.occurrences(word) >= count
        });
        covered && needed.keys().any(|word| self.title.contains(word))
    }

    /// Words the title cannot supply, in phrase order
    fn subtitle_only_words<'w, S: AsRef<str>>(&self, words: &'w [S]) -> Vec<&'w str> {
        let mut title_left: FxHashMap<&str, usize> = FxHashMap::default();
        let mut out = Vec::new();
        for word in words {
            let word = word.as_ref();
            let left = title_left
                .entry(word)
                .or_insert_with(|| self.title.occurrences(word));
            if *left > 0 {
                *left -= 1;
            } else {
                out.push(word);
            }
        }
        out
    }
}

fn word_counts<S: AsRef<str>>(words: &[S]) -> FxHashMap<&str, usize> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for word in words {
        *counts.entry(word.as_ref()).or_insert(0) += 1;
    }
    counts
}

/// Classify one combination against raw title and subtitle text
///
/// Builds a default English tokenizer per call; use [`StrengthClassifier`]
/// when classifying many phrases against the same pair.
pub fn classify(
    combination: &Combination,
    title_text: &str,
    subtitle_text: &str,
) -> Classification {
    let tokenizer = Tokenizer::new();
    StrengthClassifier::new(&tokenizer, title_text, subtitle_text).classify(combination)
}
