//! Core types shared across the crate
//!
//! Keywords come out of the tokenizer, combinations out of the generator,
//! classifications out of the strength classifier. Everything here is a plain
//! value owned by the invocation that created it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata field a keyword was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceField {
    Title,
    Subtitle,
}

impl SourceField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Subtitle => "subtitle",
        }
    }
}

/// A normalized keyword token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keyword {
    /// Lowercased, punctuation-free text
    pub text: String,
    /// Field the keyword was read from
    pub field: SourceField,
    /// Ordinal among the kept keywords of its field
    pub position: usize,
    /// Segment index (separator punctuation starts a new segment)
    pub segment: usize,
}

impl Keyword {
    /// Create a new keyword
    pub fn new(
        text: impl Into<String>,
        field: SourceField,
        position: usize,
        segment: usize,
    ) -> Self {
        Self {
            text: text.into(),
            field,
            position,
            segment,
        }
    }
}

/// Which keyword pool a combination was generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboSource {
    TitleOnly,
    SubtitleOnly,
    CrossElement,
}

impl ComboSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TitleOnly => "title_only",
            Self::SubtitleOnly => "subtitle_only",
            Self::CrossElement => "cross_element",
        }
    }
}

/// A candidate keyword combination
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    /// Joined phrase text, also the dedup key
    pub text: String,
    /// Constituent keywords in phrase order
    pub keywords: Vec<Keyword>,
    /// Provenance
    pub source: ComboSource,
    /// Estimated strategic value (see [`crate::stats::value`])
    pub estimated_value: f64,
}

impl Combination {
    /// Build a combination from keywords in phrase order
    pub fn from_keywords(keywords: Vec<Keyword>, source: ComboSource) -> Self {
        let text = join_keywords(&keywords);
        Self {
            text,
            keywords,
            source,
            estimated_value: 0.0,
        }
    }

    /// Number of words in the phrase
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Constituent word texts
    pub fn words(&self) -> Vec<&str> {
        self.keywords.iter().map(|k| k.text.as_str()).collect()
    }
}

/// Join keyword texts with single spaces
pub fn join_keywords(keywords: &[Keyword]) -> String {
    keywords
        .iter()
        .map(|k| k.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ranking strength of a combination, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthTier {
    /// All words adjacent, in order, in the title
    TitleConsecutive,
    /// All words in the title, not adjacent
    TitleNonConsecutive,
    /// Words spread across title and subtitle
    CrossElement,
    /// All words adjacent, in order, in the subtitle
    SubtitleConsecutive,
    /// All words in the subtitle, not adjacent
    SubtitleNonConsecutive,
    /// Not formable from the current metadata
    Missing,
}

impl StrengthTier {
    /// Every tier, strongest first
    pub const ALL: [StrengthTier; 6] = [
        StrengthTier::TitleConsecutive,
        StrengthTier::TitleNonConsecutive,
        StrengthTier::CrossElement,
        StrengthTier::SubtitleConsecutive,
        StrengthTier::SubtitleNonConsecutive,
        StrengthTier::Missing,
    ];

    /// 1-based rank (1 = strongest)
    pub fn rank(&self) -> u8 {
        match self {
            Self::TitleConsecutive => 1,
            Self::TitleNonConsecutive => 2,
            Self::CrossElement => 3,
            Self::SubtitleConsecutive => 4,
            Self::SubtitleNonConsecutive => 5,
            Self::Missing => 6,
        }
    }

    /// Whether the combination can rank at all with the current metadata
    pub fn is_existing(&self) -> bool {
        !matches!(self, Self::Missing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TitleConsecutive => "title_consecutive",
            Self::TitleNonConsecutive => "title_non_consecutive",
            Self::CrossElement => "cross_element",
            Self::SubtitleConsecutive => "subtitle_consecutive",
            Self::SubtitleNonConsecutive => "subtitle_non_consecutive",
            Self::Missing => "missing",
        }
    }
}

impl std::fmt::Display for StrengthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength classification of a single phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub tier: StrengthTier,
    pub is_consecutive: bool,
    pub can_strengthen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Public output record: a combination with its classification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedCombination {
    pub text: String,
    pub keywords: Vec<String>,
    pub length: usize,
    pub source: ComboSource,
    pub strength: StrengthTier,
    pub is_consecutive: bool,
    pub can_strengthen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strengthening_suggestion: Option<String>,
    pub estimated_value: f64,
}

impl ClassifiedCombination {
    /// Attach a classification to a combination
    pub fn new(combination: Combination, classification: Classification) -> Self {
        let keywords: Vec<String> = combination.keywords.into_iter().map(|k| k.text).collect();
        Self {
            text: combination.text,
            length: keywords.len(),
            keywords,
            source: combination.source,
            strength: classification.tier,
            is_consecutive: classification.is_consecutive,
            can_strengthen: classification.can_strengthen,
            strengthening_suggestion: classification.suggestion,
            estimated_value: combination.estimated_value,
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// Input-size tier chosen by the scaling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingTier {
    /// Every combination is enumerated
    #[default]
    Full,
    /// Highest-value combinations first, cut at the combined budget
    Ranked,
    /// Only the top N combinations by value
    TopN,
}

/// Thresholds for the input-size scaling policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScalingPolicy {
    /// Largest keyword count that still gets full enumeration
    pub full_enumeration_max: usize,
    /// Largest keyword count handled by the ranked tier
    pub ranked_max: usize,
    /// Combined output budget for the ranked tier
    pub ranked_budget: usize,
    /// Output size above `ranked_max`
    pub top_n: usize,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for ScalingPolicy {
    fn default() -> Self {
        Self {
            full_enumeration_max: 15,
            ranked_max: 30,
            ranked_budget: 1500,
            top_n: 500,
            unknown_fields: HashMap::new(),
        }
    }
}

impl ScalingPolicy {
    /// Pick the tier for a distinct keyword count
    pub fn tier_for(&self, keyword_count: usize) -> ScalingTier {
        if keyword_count <= self.full_enumeration_max {
            ScalingTier::Full
        } else if keyword_count <= self.ranked_max {
            ScalingTier::Ranked
        } else {
            ScalingTier::TopN
        }
    }
}

/// Longest phrase, in words, a request may ask for
pub const MAX_PHRASE_LENGTH: usize = 4;

/// Per-call generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CombinationOptions {
    /// Minimum words per phrase
    pub min_length: usize,
    /// Maximum words per phrase
    pub max_length: usize,
    pub include_title_only: bool,
    pub include_subtitle_only: bool,
    pub include_cross_element: bool,
    /// Maximum new combinations emitted per source
    pub per_source_cap: usize,
    /// Stopword language (ISO 639-1 code or English name)
    pub language: String,
    pub scaling: ScalingPolicy,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for CombinationOptions {
    fn default() -> Self {
        Self {
            min_length: 2,
            max_length: 4,
            include_title_only: true,
            include_subtitle_only: true,
            include_cross_element: true,
            per_source_cap: 500,
            language: "en".to_string(),
            scaling: ScalingPolicy::default(),
            unknown_fields: HashMap::new(),
        }
    }
}

impl CombinationOptions {
    /// Set the phrase length range
    pub fn with_length_range(mut self, min_length: usize, max_length: usize) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    /// Enable or disable each source
    pub fn with_sources(
        mut self,
        title_only: bool,
        subtitle_only: bool,
        cross_element: bool,
    ) -> Self {
        self.include_title_only = title_only;
        self.include_subtitle_only = subtitle_only;
        self.include_cross_element = cross_element;
        self
    }

    pub fn with_per_source_cap(mut self, cap: usize) -> Self {
        self.per_source_cap = cap;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_scaling(mut self, scaling: ScalingPolicy) -> Self {
        self.scaling = scaling;
        self
    }

    /// Whether `source` is enabled
    pub fn includes(&self, source: ComboSource) -> bool {
        match source {
            ComboSource::TitleOnly => self.include_title_only,
            ComboSource::SubtitleOnly => self.include_subtitle_only,
            ComboSource::CrossElement => self.include_cross_element,
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Count of combinations per strength tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCounts {
    pub title_consecutive: usize,
    pub title_non_consecutive: usize,
    pub cross_element: usize,
    pub subtitle_consecutive: usize,
    pub subtitle_non_consecutive: usize,
    pub missing: usize,
}

impl TierCounts {
    /// Increment the counter for `tier`
    pub fn record(&mut self, tier: StrengthTier) {
        *self.slot(tier) += 1;
    }

    /// Count for `tier`
    pub fn get(&self, tier: StrengthTier) -> usize {
        match tier {
            StrengthTier::TitleConsecutive => self.title_consecutive,
            StrengthTier::TitleNonConsecutive => self.title_non_consecutive,
            StrengthTier::CrossElement => self.cross_element,
            StrengthTier::SubtitleConsecutive => self.subtitle_consecutive,
            StrengthTier::SubtitleNonConsecutive => self.subtitle_non_consecutive,
            StrengthTier::Missing => self.missing,
        }
    }

    /// Sum over all tiers
    pub fn total(&self) -> usize {
        StrengthTier::ALL.iter().map(|t| self.get(*t)).sum()
    }

    fn slot(&mut self, tier: StrengthTier) -> &mut usize {
        match tier {
            StrengthTier::TitleConsecutive => &mut self.title_consecutive,
            StrengthTier::TitleNonConsecutive => &mut self.title_non_consecutive,
            StrengthTier::CrossElement => &mut self.cross_element,
            StrengthTier::SubtitleConsecutive => &mut self.subtitle_consecutive,
            StrengthTier::SubtitleNonConsecutive => &mut self.subtitle_non_consecutive,
            StrengthTier::Missing => &mut self.missing,
        }
    }
}

/// Count of combinations per generation source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCounts {
    pub title_only: usize,
    pub subtitle_only: usize,
    pub cross_element: usize,
}

impl SourceCounts {
    pub fn record(&mut self, source: ComboSource) {
        match source {
            ComboSource::TitleOnly => self.title_only += 1,
            ComboSource::SubtitleOnly => self.subtitle_only += 1,
            ComboSource::CrossElement => self.cross_element += 1,
        }
    }
}

/// Aggregate statistics over one analysis
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub total_possible: usize,
    pub existing: usize,
    pub missing: usize,
    pub coverage_percent: f64,
    pub tier_counts: TierCounts,
    pub can_strengthen_count: usize,
    pub truncated: bool,
    /// Distinct keywords across both fields
    pub keyword_count: usize,
    pub scaling_tier: ScalingTier,
    pub source_counts: SourceCounts,
}

/// Top-level output of one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub combinations: Vec<ClassifiedCombination>,
    pub stats: AnalysisStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl AnalysisResult {
    /// Look up a combination by its phrase text
    pub fn find(&self, text: &str) -> Option<&ClassifiedCombination> {
        self.combinations.iter().find(|c| c.text == text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_order_matches_rank() {
        for pair in StrengthTier::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].rank() < pair[1].rank());
        }
        assert!(!StrengthTier::Missing.is_existing());
        assert!(StrengthTier::SubtitleNonConsecutive.is_existing());
    }

    #[test]
    fn test_scaling_policy_tiers() {
        let policy = ScalingPolicy::default();
        assert_eq!(policy.tier_for(0), ScalingTier::Full);
        assert_eq!(policy.tier_for(15), ScalingTier::Full);
        assert_eq!(policy.tier_for(16), ScalingTier::Ranked);
        assert_eq!(policy.tier_for(30), ScalingTier::Ranked);
        assert_eq!(policy.tier_for(31), ScalingTier::TopN);
    }

    #[test]
    fn test_options_deserialize_defaults() {
        let options: CombinationOptions = serde_json::from_str(r#"{ "maxLength": 3 }"#).unwrap();
        assert_eq!(options.min_length, 2);
        assert_eq!(options.max_length, 3);
        assert_eq!(options.per_source_cap, 500);
        assert!(options.include_cross_element);
        assert_eq!(options.scaling.top_n, 500);
        assert!(options.unknown_fields.is_empty());
    }

    #[test]
    fn test_options_unknown_fields_captured() {
        let options: CombinationOptions =
            serde_json::from_str(r#"{ "maxLenght": 3, "scaling": { "topN": 50, "bogus": 1 } }"#)
                .unwrap();
        assert!(options.unknown_fields.contains_key("maxLenght"));
        assert!(options.scaling.unknown_fields.contains_key("bogus"));
        assert_eq!(options.scaling.top_n, 50);
    }

    #[test]
    fn test_tier_counts_record() {
        let mut counts = TierCounts::default();
        counts.record(StrengthTier::CrossElement);
        counts.record(StrengthTier::CrossElement);
        counts.record(StrengthTier::Missing);
        assert_eq!(counts.get(StrengthTier::CrossElement), 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_classified_combination_serializes_camel_case() {
        let combo = Combination::from_keywords(
            vec![
                Keyword::new("sleep", SourceField::Title, 0, 0),
                Keyword::new("timer", SourceField::Subtitle, 1, 0),
            ],
            ComboSource::CrossElement,
        );
        let classified = ClassifiedCombination::new(
            combo,
            Classification {
                tier: StrengthTier::CrossElement,
                is_consecutive: false,
                can_strengthen: true,
                suggestion: None,
            },
        );
        let json = serde_json::to_value(&classified).unwrap();
        assert_eq!(json["text"], "sleep timer");
        assert_eq!(json["strength"], "cross_element");
        assert_eq!(json["canStrengthen"], true);
        assert_eq!(json["length"], 2);
        assert!(json.get("strengtheningSuggestion").is_none());
    }
}
