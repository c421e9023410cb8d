//! Combination generation
//!
//! Every order-preserving subsequence of a keyword pool with a length in
//! `[min_length, max_length]` is a candidate. Three pools are searched in
//! order, each with its own emission budget:
//!
//! - title keywords
//! - subtitle keywords
//! - title followed by subtitle (cross-element); only phrases that mix words
//!   from both fields are emitted here
//!
//! Candidates are deduplicated by joined text across all pools; the first
//! pool to produce a phrase owns its provenance.
//!
//! The search is a counted backtracking walk. The [`Budget`] is an explicit
//! argument of every recursive call and meters two things: emitted
//! candidates (the per-source cap) and visited search nodes. Either limit
//! stops the walk, so work stays bounded even when most subsequences are
//! rejected as duplicates.

use rustc_hash::FxHashSet;

use super::scaling::apply_policy;
use crate::stats::value::ValueModel;
use crate::types::{
    join_keywords, ComboSource, Combination, CombinationOptions, Keyword, ScalingTier, SourceField,
};

/// Search nodes allowed per unit of per-source cap
const SEARCH_NODES_PER_EMISSION: usize = 64;
const MIN_SEARCH_NODES: usize = 4_096;
const MAX_SEARCH_NODES: usize = 1_000_000;

/// Node limit that goes with a per-source cap of `cap`
pub fn search_limit_for(cap: usize) -> usize {
    cap.saturating_mul(SEARCH_NODES_PER_EMISSION)
        .clamp(MIN_SEARCH_NODES, MAX_SEARCH_NODES)
}

/// Emission and search budget for one pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    remaining: usize,
    overflowed: bool,
    nodes_left: usize,
    visited: usize,
    exhausted: bool,
}

impl Budget {
    /// `cap` emissions with the matching [`search_limit_for`] node limit
    pub fn new(cap: usize) -> Self {
        Self::with_search_limit(cap, search_limit_for(cap))
    }

    pub fn with_search_limit(cap: usize, nodes: usize) -> Self {
        Self {
            remaining: cap,
            overflowed: false,
            nodes_left: nodes,
            visited: 0,
            exhausted: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// A candidate was refused because the budget ran out
    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    /// A search node was refused because the node limit ran out
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Either limit has stopped the search
    pub fn is_stopped(&self) -> bool {
        self.overflowed || self.exhausted
    }

    /// Search nodes visited so far
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Claim one emission; records the overflow when empty
    pub fn try_take(&mut self) -> bool {
        if self.remaining == 0 {
            self.overflowed = true;
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Claim one search node; records the exhaustion when empty
    pub fn visit(&mut self) -> bool {
        if self.nodes_left == 0 {
            self.exhausted = true;
            return false;
        }
        self.nodes_left -= 1;
        self.visited += 1;
        true
    }
}

/// A keyword pool plus the order in which the search visits it
#[derive(Debug, Clone)]
struct SourcePool {
    source: ComboSource,
    words: Vec<Keyword>,
    /// Visit order as indices into `words`
    order: Vec<usize>,
    /// Title words in `order[i..]`
    title_after: Vec<usize>,
    /// Subtitle words in `order[i..]`
    subtitle_after: Vec<usize>,
}

impl SourcePool {
    fn new(source: ComboSource, words: Vec<Keyword>, order: Vec<usize>) -> Self {
        let n = order.len();
        let mut title_after = vec![0; n + 1];
        let mut subtitle_after = vec![0; n + 1];
        for i in (0..n).rev() {
            let is_title = words[order[i]].field == SourceField::Title;
            title_after[i] = title_after[i + 1] + usize::from(is_title);
            subtitle_after[i] = subtitle_after[i + 1] + usize::from(!is_title);
        }
        Self {
            source,
            words,
            order,
            title_after,
            subtitle_after,
        }
    }

    /// Whether `picked` can still grow into a mixed phrase from `order[start..]`
    fn can_mix(&self, picked: &[usize], start: usize) -> bool {
        if self.source != ComboSource::CrossElement {
            return true;
        }
        let has = |field: SourceField| picked.iter().any(|&i| self.words[i].field == field);
        (has(SourceField::Title) || self.title_after[start] > 0)
            && (has(SourceField::Subtitle) || self.subtitle_after[start] > 0)
    }
}

/// Deduplicating candidate collector
#[derive(Debug, Default)]
struct CandidateSink {
    seen: FxHashSet<String>,
    out: Vec<Combination>,
}

/// Output of the generation stage
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutput {
    pub candidates: Vec<Combination>,
    /// Distinct keywords across both fields
    pub keyword_count: usize,
    pub scaling_tier: ScalingTier,
    /// Some candidates were not generated or were cut
    pub truncated: bool,
    /// Pools stopped early by their cap or search limit
    pub capped_sources: Vec<ComboSource>,
    /// Search nodes visited across all pools
    pub visited: usize,
    pub warnings: Vec<String>,
}

/// Generates candidate combinations from title and subtitle keywords
#[derive(Debug, Clone)]
pub struct CombinationGenerator<'o> {
    options: &'o CombinationOptions,
}

impl<'o> CombinationGenerator<'o> {
    pub fn new(options: &'o CombinationOptions) -> Self {
        Self { options }
    }

    /// Generate, score, and scale candidates
    pub fn generate(&self, title: &[Keyword], subtitle: &[Keyword]) -> GenerationOutput {
        let title_words = dedup_keywords(title);
        let subtitle_words = dedup_keywords(subtitle);
        let cross_words = cross_pool(&title_words, &subtitle_words);
        let keyword_count = cross_words.len();

        let policy = &self.options.scaling;
        let tier = policy.tier_for(keyword_count);
        let model = ValueModel::new(title, subtitle);
        let cap = self.options.per_source_cap;

        let pools = [
            (ComboSource::TitleOnly, title_words),
            (ComboSource::SubtitleOnly, subtitle_words),
            (ComboSource::CrossElement, cross_words),
        ];

        let mut sink = CandidateSink::default();
        let mut capped_sources = Vec::new();
        let mut warnings = Vec::new();
        let mut visited = 0;

        for (source, words) in pools {
            if !self.options.includes(source) {
                continue;
            }
            // a subtitle that repeats the title leaves nothing to mix
            if source == ComboSource::CrossElement && !mixes_fields(&words) {
                continue;
            }
            let order = match tier {
                ScalingTier::Full => (0..words.len()).collect(),
                ScalingTier::Ranked | ScalingTier::TopN => model.visit_order(&words),
            };
            let pool = SourcePool::new(source, words, order);

            let budget = self.generate_pool(&pool, Budget::new(cap), &mut sink);
            visited += budget.visited();
            if budget.is_overflowed() {
                capped_sources.push(source);
                warnings.push(format!(
                    "{} generation stopped at the per-source cap of {}",
                    source.as_str(),
                    cap
                ));
            } else if budget.is_exhausted() {
                capped_sources.push(source);
                warnings.push(format!(
                    "{} generation stopped at the search limit of {} nodes",
                    source.as_str(),
                    search_limit_for(cap)
                ));
            }
        }

        let mut candidates = sink.out;
        model.score_all(&mut candidates);
        let outcome = apply_policy(policy, tier, keyword_count, &mut candidates);
        warnings.extend(outcome.warning);

        tracing::debug!(
            keyword_count,
            tier = ?tier,
            candidates = candidates.len(),
            visited,
            capped = capped_sources.len(),
            "generated combinations"
        );

        GenerationOutput {
            candidates,
            keyword_count,
            scaling_tier: tier,
            truncated: outcome.truncated || !capped_sources.is_empty(),
            capped_sources,
            visited,
            warnings,
        }
    }

    /// Search one pool for every length in range; returns the spent budget
    fn generate_pool(
        &self,
        pool: &SourcePool,
        mut budget: Budget,
        sink: &mut CandidateSink,
    ) -> Budget {
        let max_length = self.options.max_length.min(pool.words.len());
        let mut picked = Vec::with_capacity(max_length);
        for length in self.options.min_length.max(1)..=max_length {
            search(pool, 0, length, &mut picked, &mut budget, sink);
            if budget.is_stopped() {
                break;
            }
        }
        budget
    }
}

/// Convenience wrapper around [`CombinationGenerator`]
pub fn generate(
    title: &[Keyword],
    subtitle: &[Keyword],
    options: &CombinationOptions,
) -> GenerationOutput {
    CombinationGenerator::new(options).generate(title, subtitle)
}

fn search(
    pool: &SourcePool,
    start: usize,
    length: usize,
    picked: &mut Vec<usize>,
    budget: &mut Budget,
    sink: &mut CandidateSink,
) {
    if !budget.visit() {
        return;
    }
    if picked.len() == length {
        emit(pool, picked, budget, sink);
        return;
    }
    if !pool.can_mix(picked, start) {
        return;
    }

    let needed = length - picked.len();
    for i in start..pool.order.len() {
        if pool.order.len() - i < needed {
            break;
        }
        picked.push(pool.order[i]);
        search(pool, i + 1, length, picked, budget, sink);
        picked.pop();
        if budget.is_stopped() {
            return;
        }
    }
}

fn emit(pool: &SourcePool, picked: &[usize], budget: &mut Budget, sink: &mut CandidateSink) {
    // phrase text always follows source order, whatever the visit order was
    let mut indices = picked.to_vec();
    indices.sort_unstable();
    let keywords: Vec<Keyword> = indices.iter().map(|&i| pool.words[i].clone()).collect();

    if pool.source == ComboSource::CrossElement && !mixes_fields(&keywords) {
        return;
    }

    let text = join_keywords(&keywords);
    if sink.seen.contains(&text) || !budget.try_take() {
        return;
    }
    sink.seen.insert(text.clone());
    sink.out.push(Combination {
        text,
        keywords,
        source: pool.source,
        estimated_value: 0.0,
    });
}

fn mixes_fields(keywords: &[Keyword]) -> bool {
    keywords.iter().any(|k| k.field == SourceField::Title)
        && keywords.iter().any(|k| k.field == SourceField::Subtitle)
}

/// First occurrence of every keyword text, in order
fn dedup_keywords(keywords: &[Keyword]) -> Vec<Keyword> {
    let mut seen = FxHashSet::default();
    keywords
        .iter()
        .filter(|k| seen.insert(k.text.as_str()))
        .cloned()
        .collect()
}

/// Title keywords followed by subtitle keywords the title lacks
fn cross_pool(title: &[Keyword], subtitle: &[Keyword]) -> Vec<Keyword> {
    let in_title: FxHashSet<&str> = title.iter().map(|k| k.text.as_str()).collect();
    title
        .iter()
        .chain(subtitle.iter().filter(|k| !in_title.contains(k.text.as_str())))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::tokenizer::Tokenizer;

    fn keywords(text: &str, field: SourceField) -> Vec<Keyword> {
        Tokenizer::new().tokenize(text, field)
    }

    fn numbered(prefix: &str, n: usize) -> String {
        (0..n).map(|i| format!("{prefix}{i} ")).collect()
    }

    fn texts(output: &GenerationOutput) -> Vec<&str> {
        output.candidates.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_title_only_subsequences() {
        let title = keywords("Calm Sleep Sounds", SourceField::Title);
        let options = CombinationOptions::default().with_sources(true, false, false);
        let output = generate(&title, &[], &options);

        assert_eq!(
            texts(&output),
            vec!["calm sleep", "calm sounds", "sleep sounds", "calm sleep sounds"]
        );
        assert!(output.candidates.iter().all(|c| c.source == ComboSource::TitleOnly));
        assert!(!output.truncated);
        assert_eq!(output.scaling_tier, ScalingTier::Full);
    }

    #[test]
    fn test_cross_element_mixes_fields() {
        let title = keywords("Meditation Sleep", SourceField::Title);
        let subtitle = keywords("Mindfulness Timer", SourceField::Subtitle);
        let options = CombinationOptions::default().with_sources(false, false, true);
        let output = generate(&title, &subtitle, &options);

        assert!(output.candidates.iter().all(|c| {
            let words = c.words();
            words.iter().any(|w| *w == "meditation" || *w == "sleep")
                && words.iter().any(|w| *w == "mindfulness" || *w == "timer")
        }));
        let all = texts(&output);
        assert!(all.contains(&"meditation mindfulness"));
        assert!(all.contains(&"sleep timer"));
        assert!(all.contains(&"meditation mindfulness timer"));
        assert!(!all.contains(&"meditation sleep"));
        // 4 mixed pairs, 4 triples, 1 quad
        assert_eq!(all.len(), 9);
    }

    #[test]
    fn test_no_duplicate_texts() {
        let title = keywords("Sleep Sounds Sleep", SourceField::Title);
        let subtitle = keywords("Sleep Sounds Rain", SourceField::Subtitle);
        let output = generate(&title, &subtitle, &CombinationOptions::default());

        let mut seen = FxHashSet::default();
        for combo in &output.candidates {
            assert!(seen.insert(combo.text.clone()), "duplicate {}", combo.text);
        }
        let sleep_sounds = output.candidates.iter().find(|c| c.text == "sleep sounds").unwrap();
        assert_eq!(sleep_sounds.source, ComboSource::TitleOnly);
    }

    #[test]
    fn test_length_range_respected() {
        let title = keywords("one two three four five six", SourceField::Title);
        let options = CombinationOptions::default().with_length_range(3, 3);
        let output = generate(&title, &[], &options);

        assert!(output.candidates.iter().all(|c| c.len() == 3));
        assert_eq!(output.candidates.len(), 20);
    }

    #[test]
    fn test_per_source_cap_stops_search() {
        let title = keywords("alpha bravo charlie delta echo foxtrot", SourceField::Title);
        let options = CombinationOptions::default()
            .with_sources(true, false, false)
            .with_per_source_cap(5);
        let output = generate(&title, &[], &options);

        assert_eq!(output.candidates.len(), 5);
        assert!(output.truncated);
        assert_eq!(output.capped_sources, vec![ComboSource::TitleOnly]);
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn test_exact_cap_is_not_truncation() {
        let title = keywords("Calm Sleep Sounds", SourceField::Title);
        let options = CombinationOptions::default()
            .with_sources(true, false, false)
            .with_per_source_cap(4);
        let output = generate(&title, &[], &options);

        assert_eq!(output.candidates.len(), 4);
        assert!(!output.truncated);
    }

    #[test]
    fn test_budget_is_explicit() {
        let mut budget = Budget::new(1);
        assert!(budget.try_take());
        assert_eq!(budget.remaining(), 0);
        assert!(!budget.is_overflowed());
        assert!(!budget.try_take());
        assert!(budget.is_overflowed());
    }

    #[test]
    fn test_large_input_uses_top_n() {
        let title = numbered("title", 20);
        let subtitle = numbered("sub", 20);
        let output = generate(
            &keywords(&title, SourceField::Title),
            &keywords(&subtitle, SourceField::Subtitle),
            &CombinationOptions::default(),
        );

        assert_eq!(output.keyword_count, 40);
        assert_eq!(output.scaling_tier, ScalingTier::TopN);
        assert!(output.candidates.len() <= 500);
        assert!(output.truncated);
        for pair in output.candidates.windows(2) {
            assert!(pair[0].estimated_value >= pair[1].estimated_value);
        }
    }

    #[test]
    fn test_mid_input_uses_ranked_tier() {
        let title = numbered("title", 10);
        let subtitle = numbered("sub", 10);
        let output = generate(
            &keywords(&title, SourceField::Title),
            &keywords(&subtitle, SourceField::Subtitle),
            &CombinationOptions::default(),
        );

        assert_eq!(output.scaling_tier, ScalingTier::Ranked);
        assert!(output.candidates.len() <= 1500);
        assert!(output.candidates[0].estimated_value >= output.candidates[1].estimated_value);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let title = keywords("Headspace: Meditation & Sleep", SourceField::Title);
        let subtitle = keywords("Mindfulness Timer & Wellness App", SourceField::Subtitle);
        let options = CombinationOptions::default();

        let first = generate(&title, &subtitle, &options);
        let second = generate(&title, &subtitle, &options);
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_limit_stops_walk() {
        let words = keywords(&numbered("word", 30), SourceField::Title);
        let pool = SourcePool::new(ComboSource::TitleOnly, words, (0..30).collect());
        let mut budget = Budget::with_search_limit(usize::MAX, 100);
        let mut sink = CandidateSink::default();

        search(&pool, 0, 4, &mut Vec::new(), &mut budget, &mut sink);

        assert_eq!(budget.visited(), 100);
        assert!(budget.is_exhausted());
        assert!(!budget.is_overflowed());
        assert!(sink.out.len() < 100);
    }

    #[test]
    fn test_cross_search_prunes_single_field_branches() {
        let words = keywords(&numbered("word", 30), SourceField::Title);
        let pool = SourcePool::new(ComboSource::CrossElement, words, (0..30).collect());
        let mut budget = Budget::new(500);
        let mut sink = CandidateSink::default();

        search(&pool, 0, 4, &mut Vec::new(), &mut budget, &mut sink);

        assert_eq!(budget.visited(), 1);
        assert!(sink.out.is_empty());
    }

    #[test]
    fn test_duplicated_fields_stay_bounded() {
        let text = numbered("word", 120);
        let output = generate(
            &keywords(&text, SourceField::Title),
            &keywords(&text, SourceField::Subtitle),
            &CombinationOptions::default(),
        );

        assert_eq!(output.keyword_count, 120);
        assert_eq!(output.scaling_tier, ScalingTier::TopN);
        assert!(output.candidates.len() <= 500);
        assert!(output.truncated);
        assert!(output
            .candidates
            .iter()
            .all(|c| c.source != ComboSource::CrossElement));
        assert!(output.visited <= 2 * search_limit_for(500));
    }

    #[test]
    fn test_cross_pool_skipped_without_subtitle_words() {
        let title = keywords("Calm Sleep Sounds", SourceField::Title);
        let subtitle = keywords("Sleep Sounds", SourceField::Subtitle);
        let options = CombinationOptions::default().with_sources(false, false, true);
        let output = generate(&title, &subtitle, &options);

        assert!(output.candidates.is_empty());
        assert_eq!(output.visited, 0);
        assert!(!output.truncated);
    }

    #[test]
    fn test_oversized_max_length_is_clamped() {
        let title = keywords("Calm Sleep Sounds", SourceField::Title);
        let options = CombinationOptions::default()
            .with_sources(true, false, false)
            .with_length_range(2, usize::MAX);
        let output = generate(&title, &[], &options);

        assert_eq!(output.candidates.len(), 4);
        assert!(!output.truncated);
    }

    #[test]
    fn test_search_limit_scales_with_cap() {
        assert_eq!(search_limit_for(1), MIN_SEARCH_NODES);
        assert_eq!(search_limit_for(500), 500 * SEARCH_NODES_PER_EMISSION);
        assert_eq!(search_limit_for(usize::MAX), MAX_SEARCH_NODES);
    }

    #[test]
    fn test_empty_inputs() {
        let output = generate(&[], &[], &CombinationOptions::default());
        assert!(output.candidates.is_empty());
        assert_eq!(output.keyword_count, 0);
        assert!(!output.truncated);
    }
}
