//! Input-size scaling policy
//!
//! Phrase counts grow polynomially with the keyword count (two-word phrases
//! alone are O(k²)), so generation is tiered on the number of distinct
//! keywords:
//!
//! | keywords | tier | output |
//! |----------|------|--------|
//! | ≤ 15 | [`ScalingTier::Full`] | everything the per-source caps allow |
//! | 16–30 | [`ScalingTier::Ranked`] | best by value, cut at the combined budget |
//! | > 30 | [`ScalingTier::TopN`] | best N by value, always flagged partial |

use crate::stats::value::by_value_desc;
use crate::types::{Combination, ScalingPolicy, ScalingTier};

/// What the policy did to a candidate list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalingOutcome {
    pub tier: ScalingTier,
    /// Candidates were dropped (or never generated) because of the tier
    pub truncated: bool,
    pub warning: Option<String>,
}

/// Rank and cut `candidates` according to `tier`
///
/// Candidates must already carry their estimated value. Full enumeration
/// keeps generation order; the other tiers sort by value (ties by text).
pub fn apply_policy(
    policy: &ScalingPolicy,
    tier: ScalingTier,
    keyword_count: usize,
    candidates: &mut Vec<Combination>,
) -> ScalingOutcome {
    match tier {
        ScalingTier::Full => ScalingOutcome {
            tier,
            truncated: false,
            warning: None,
        },
        ScalingTier::Ranked => {
            candidates.sort_by(by_value_desc);
            let truncated = candidates.len() > policy.ranked_budget;
            candidates.truncate(policy.ranked_budget);
            ScalingOutcome {
                tier,
                truncated,
                warning: truncated.then(|| {
                    format!(
                        "combination budget of {} reached for {} keywords; lower-value combinations were skipped",
                        policy.ranked_budget, keyword_count
                    )
                }),
            }
        }
        ScalingTier::TopN => {
            candidates.sort_by(by_value_desc);
            candidates.truncate(policy.top_n);
            ScalingOutcome {
                tier,
                truncated: true,
                warning: Some(format!(
                    "analysis is partial: {} keywords exceed the limit of {}; only the top {} combinations by estimated value are shown",
                    keyword_count, policy.ranked_max, policy.top_n
                )),
            }
        }
    }
}
