//! Estimated strategic value
//!
//! A cheap, deterministic score used only to decide which combinations to
//! generate first when the keyword count is too large for full enumeration.
//!
//! Keyword weight: `field_weight * rarity * position_decay`
//! - field weight: title 1.0, subtitle 0.7
//! - rarity: 1 / (occurrences of the word across both fields)
//! - position decay: 1 / (1 + 0.05 * position)
//!
//! Phrase value: `length_factor * mean(keyword weight)`, where shorter phrases
//! score higher (they carry more search volume).

use std::cmp::Ordering;

use rustc_hash::FxHashMap;

use crate::types::{Combination, Keyword, SourceField};

const TITLE_WEIGHT: f64 = 1.0;
const SUBTITLE_WEIGHT: f64 = 0.7;
const POSITION_DECAY: f64 = 0.05;

/// Length multiplier for a phrase of `len` words
pub fn length_factor(len: usize) -> f64 {
    match len {
        0 | 1 | 2 => 1.0,
        3 => 0.85,
        _ => 0.7,
    }
}

/// Value model over one title/subtitle keyword set
#[derive(Debug, Clone, Default)]
pub struct ValueModel {
    occurrences: FxHashMap<String, usize>,
}

impl ValueModel {
    /// Build from the (un-deduplicated) keyword lists
    pub fn new(title: &[Keyword], subtitle: &[Keyword]) -> Self {
        let mut occurrences: FxHashMap<String, usize> = FxHashMap::default();
        for keyword in title.iter().chain(subtitle) {
            *occurrences.entry(keyword.text.clone()).or_insert(0) += 1;
        }
        Self { occurrences }
    }

    /// Weight of a single keyword
    pub fn keyword_weight(&self, keyword: &Keyword) -> f64 {
        let field = match keyword.field {
            SourceField::Title => TITLE_WEIGHT,
            SourceField::Subtitle => SUBTITLE_WEIGHT,
        };
        let count = self.occurrences.get(&keyword.text).copied().unwrap_or(1).max(1);
        let rarity = 1.0 / count as f64;
        let decay = 1.0 / (1.0 + POSITION_DECAY * keyword.position as f64);
        field * rarity * decay
    }

    /// Value of a phrase made of `keywords`
    pub fn phrase_value(&self, keywords: &[Keyword]) -> f64 {
        if keywords.is_empty() {
            return 0.0;
        }
        let total: f64 = keywords.iter().map(|k| self.keyword_weight(k)).sum();
        length_factor(keywords.len()) * total / keywords.len() as f64
    }

    /// Set `estimated_value` on every combination
    pub fn score_all(&self, combinations: &mut [Combination]) {
        for combo in combinations.iter_mut() {
            combo.estimated_value = self.phrase_value(&combo.keywords);
        }
    }

    /// Indices of `keywords` ordered by descending weight, ties by position
    pub fn visit_order(&self, keywords: &[Keyword]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..keywords.len()).collect();
        order.sort_by(|&a, &b| {
            self.keyword_weight(&keywords[b])
                .total_cmp(&self.keyword_weight(&keywords[a]))
                .then(a.cmp(&b))
        });
        order
    }
}

/// Highest value first, ties broken by text
pub fn by_value_desc(a: &Combination, b: &Combination) -> Ordering {
    b.estimated_value
        .total_cmp(&a.estimated_value)
        .then_with(|| a.text.cmp(&b.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ComboSource;

    fn kw(text: &str, field: SourceField, position: usize) -> Keyword {
        Keyword::new(text, field, position, 0)
    }

    #[test]
    fn test_title_outweighs_subtitle() {
        let title = vec![kw("sleep", SourceField::Title, 0)];
        let subtitle = vec![kw("timer", SourceField::Subtitle, 0)];
        let model = ValueModel::new(&title, &subtitle);

        assert!(model.keyword_weight(&title[0]) > model.keyword_weight(&subtitle[0]));
    }

    #[test]
    fn test_repeated_words_are_less_rare() {
        let title = vec![kw("sleep", SourceField::Title, 0), kw("sounds", SourceField::Title, 1)];
        let subtitle = vec![kw("sleep", SourceField::Subtitle, 0)];
        let model = ValueModel::new(&title, &subtitle);

        let sleep = model.keyword_weight(&title[0]);
        assert!((sleep - 0.5).abs() < 1e-12);
        assert!(model.keyword_weight(&title[1]) > sleep);
    }

    #[test]
    fn test_shorter_phrases_score_higher() {
        let words: Vec<_> = ["calm", "sleep", "sounds", "rain"]
            .iter()
            .enumerate()
            .map(|(i, w)| kw(w, SourceField::Title, i))
            .collect();
        let model = ValueModel::new(&words, &[]);

        let two = model.phrase_value(&words[..2]);
        let three = model.phrase_value(&words[..3]);
        assert!(two > three);
        assert_eq!(model.phrase_value(&[]), 0.0);
    }

    #[test]
    fn test_visit_order_is_stable() {
        let title = vec![kw("calm", SourceField::Title, 0), kw("sleep", SourceField::Title, 1)];
        let subtitle = vec![
            kw("rain", SourceField::Subtitle, 0),
            kw("calm", SourceField::Subtitle, 1),
        ];
        let model = ValueModel::new(&title, &subtitle);

        let all: Vec<Keyword> = title.iter().chain(&subtitle).cloned().collect();
        let order = model.visit_order(&all);
        assert_eq!(order[0], 1); // "sleep": title, unique
        assert_eq!(order, model.visit_order(&all));
    }

    #[test]
    fn test_by_value_desc_breaks_ties_by_text() {
        let single = |w: &'static str| {
            Combination::from_keywords(vec![kw(w, SourceField::Title, 0)], ComboSource::TitleOnly)
        };
        let mut a = single("b");
        let mut b = single("a");
        a.estimated_value = 1.0;
        b.estimated_value = 1.0;
        assert_eq!(by_value_desc(&a, &b), Ordering::Greater);

        a.estimated_value = 2.0;
        assert_eq!(by_value_desc(&a, &b), Ordering::Less);
    }
}
