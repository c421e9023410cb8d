//! Pipeline observer: stage-boundary hooks for timing and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic, and can capture the intermediate keyword and candidate lists.

use std::time::{Duration, Instant};

use super::traits::KeywordLists;
use crate::types::{ClassifiedCombination, Combination};

pub const STAGE_TOKENIZE: &str = "tokenize";
pub const STAGE_PREPROCESS: &str = "preprocess";
pub const STAGE_GENERATE: &str = "generate";
pub const STAGE_CLASSIFY: &str = "classify";
pub const STAGE_AGGREGATE: &str = "aggregate";

/// Every stage, in execution order.
pub const STAGES: [&str; 5] = [
    STAGE_TOKENIZE,
    STAGE_PREPROCESS,
    STAGE_GENERATE,
    STAGE_CLASSIFY,
    STAGE_AGGREGATE,
];

/// Wall-clock timer for one stage.
#[derive(Debug, Clone, Copy)]
pub struct StageClock {
    started: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What happened in one stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    pub duration: Duration,
    /// Items produced by the stage (keywords, candidates, ...).
    pub items: Option<usize>,
    /// Set by the generation stage.
    pub truncated: Option<bool>,
}

impl StageReport {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }
}

/// Fluent builder for [`StageReport`].
#[derive(Debug, Clone, Default)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(duration: Duration) -> Self {
        Self {
            report: StageReport::new(duration),
        }
    }

    pub fn items(mut self, items: usize) -> Self {
        self.report.items = Some(items);
        self
    }

    pub fn truncated(mut self, truncated: bool) -> Self {
        self.report.truncated = Some(truncated);
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

/// Stage-boundary callbacks. Every method has an empty default.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    /// Keyword lists after preprocessing.
    fn on_keywords(&mut self, _keywords: &KeywordLists) {}

    /// Candidates after generation and scaling.
    fn on_candidates(&mut self, _candidates: &[Combination]) {}

    /// Final classified combinations.
    fn on_classified(&mut self, _classified: &[ClassifiedCombination]) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Records each stage's report, in execution order.
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    /// Report for `stage`, if it ran.
    pub fn report(&self, stage: &str) -> Option<&StageReport> {
        self.reports
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, r)| r)
    }

    pub fn total_duration(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.duration).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_builder() {
        let report = StageReportBuilder::new(Duration::from_millis(3))
            .items(12)
            .truncated(true)
            .build();
        assert_eq!(report.duration, Duration::from_millis(3));
        assert_eq!(report.items, Some(12));
        assert_eq!(report.truncated, Some(true));
    }

    #[test]
    fn test_timing_observer_records_in_order() {
        let mut observer = StageTimingObserver::new();
        observer.on_stage_end(STAGE_TOKENIZE, &StageReport::new(Duration::from_millis(1)));
        observer.on_stage_end(STAGE_GENERATE, &StageReport::new(Duration::from_millis(2)));

        let names: Vec<_> = observer.reports().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec![STAGE_TOKENIZE, STAGE_GENERATE]);
        assert_eq!(observer.total_duration(), Duration::from_millis(3));
        assert!(observer.report(STAGE_CLASSIFY).is_none());
    }

    #[test]
    fn test_clock_is_monotonic() {
        let clock = StageClock::start();
        let first = clock.elapsed();
        assert!(clock.elapsed() >= first);
    }
}
