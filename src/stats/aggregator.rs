//! Aggregate statistics over a classified combination set

use crate::combos::generator::GenerationOutput;
use crate::types::{AnalysisStats, ClassifiedCombination, SourceCounts, TierCounts};

/// Summarize classified combinations
///
/// Generation facts (truncation, keyword count, scaling tier) are not
/// derivable from the combinations; attach them with [`with_generation`].
pub fn summarize(classified: &[ClassifiedCombination]) -> AnalysisStats {
    let mut tier_counts = TierCounts::default();
    let mut source_counts = SourceCounts::default();
    let mut can_strengthen_count = 0;

    for combo in classified {
        tier_counts.record(combo.strength);
        source_counts.record(combo.source);
        if combo.can_strengthen {
            can_strengthen_count += 1;
        }
    }

    let total_possible = classified.len();
    let missing = tier_counts.missing;
    let existing = total_possible - missing;
    let coverage_percent = if total_possible == 0 {
        0.0
    } else {
        existing as f64 / total_possible as f64 * 100.0
    };

    AnalysisStats {
        total_possible,
        existing,
        missing,
        coverage_percent,
        tier_counts,
        can_strengthen_count,
        truncated: false,
        keyword_count: 0,
        scaling_tier: Default::default(),
        source_counts,
    }
}

/// Copy generation facts into `stats`
pub fn with_generation(mut stats: AnalysisStats, generation: &GenerationOutput) -> AnalysisStats {
    stats.truncated = generation.truncated;
    stats.keyword_count = generation.keyword_count;
    stats.scaling_tier = generation.scaling_tier;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ComboSource, ScalingTier, StrengthTier};

    fn classified(
        text: &str,
        strength: StrengthTier,
        source: ComboSource,
    ) -> ClassifiedCombination {
        ClassifiedCombination {
            text: text.to_string(),
            keywords: text.split(' ').map(str::to_string).collect(),
            length: text.split(' ').count(),
            source,
            strength,
            is_consecutive: false,
            can_strengthen: strength != StrengthTier::TitleConsecutive,
            strengthening_suggestion: None,
            estimated_value: 0.0,
        }
    }

    #[test]
    fn test_counts_and_coverage() {
        let list = vec![
            classified("a b", StrengthTier::TitleConsecutive, ComboSource::TitleOnly),
            classified("a c", StrengthTier::CrossElement, ComboSource::CrossElement),
            classified("c d", StrengthTier::SubtitleConsecutive, ComboSource::SubtitleOnly),
            classified("z q", StrengthTier::Missing, ComboSource::TitleOnly),
        ];
        let stats = summarize(&list);

        assert_eq!(stats.total_possible, 4);
        assert_eq!(stats.existing, 3);
        assert_eq!(stats.missing, 1);
        assert_eq!(stats.existing + stats.missing, stats.total_possible);
        assert!((stats.coverage_percent - 75.0).abs() < 1e-9);
        assert_eq!(stats.tier_counts.get(StrengthTier::CrossElement), 1);
        assert_eq!(stats.tier_counts.total(), 4);
        assert_eq!(stats.can_strengthen_count, 3);
        assert_eq!(stats.source_counts.title_only, 2);
        assert!(!stats.truncated);
    }

    #[test]
    fn test_empty_set() {
        let stats = summarize(&[]);
        assert_eq!(stats.total_possible, 0);
        assert_eq!(stats.coverage_percent, 0.0);
    }

    #[test]
    fn test_with_generation() {
        let generation = GenerationOutput {
            candidates: Vec::new(),
            keyword_count: 42,
            scaling_tier: ScalingTier::TopN,
            truncated: true,
            capped_sources: Vec::new(),
            visited: 0,
            warnings: Vec::new(),
        };
        let stats = with_generation(summarize(&[]), &generation);

        assert!(stats.truncated);
        assert_eq!(stats.keyword_count, 42);
        assert_eq!(stats.scaling_tier, ScalingTier::TopN);
    }
}
