//! Pipeline runner: runs the analysis stages in order.
//!
//! The [`Pipeline`] validates a request, then runs the stages in order:
//!
//! 1. Tokenize title and subtitle into keywords
//! 2. Preprocess keyword lists (brand filtering, ...)
//! 3. Generate candidate combinations under the scaling policy
//! 4. Classify each candidate against the original texts
//! 5. Aggregate statistics
//!
//! Every stage is pure; the only state a pipeline holds is its configured
//! preprocessor and validation rules, so one pipeline can serve many
//! requests concurrently (see [`Pipeline::run_batch`]).

use rayon::prelude::*;

use crate::combos::generator::CombinationGenerator;
use crate::errors::{ComboError, Result};
use crate::nlp::tokenizer::Tokenizer;
use crate::pipeline::observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, StageReportBuilder, STAGE_AGGREGATE,
    STAGE_CLASSIFY, STAGE_GENERATE, STAGE_PREPROCESS, STAGE_TOKENIZE,
};
use crate::pipeline::request::AnalysisRequest;
use crate::pipeline::traits::{KeywordLists, KeywordPreprocessor, NoopPreprocessor};
use crate::pipeline::validation::ValidationEngine;
use crate::stats::aggregator::{summarize, with_generation};
use crate::strength::classifier::StrengthClassifier;
use crate::types::{
    AnalysisResult, ClassifiedCombination, Combination, CombinationOptions, SourceField,
};

/// Enter a tracing span for a pipeline stage; the span closes with the
/// enclosing block.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::debug_span!("pipeline_stage", stage = $name).entered();
    };
}

// ============================================================================
// Pipeline
// ============================================================================

/// A configured analysis pipeline.
///
/// | Part | Default |
/// |------|---------|
/// | keyword preprocessor | [`NoopPreprocessor`] |
/// | validation rules | [`ValidationEngine::with_defaults`] |
#[derive(Debug)]
pub struct Pipeline<Pre = NoopPreprocessor> {
    pub preprocessor: Pre,
    validator: ValidationEngine,
}

impl Pipeline {
    /// Pipeline with no preprocessing and the default rules.
    pub fn new() -> Self {
        Pipeline {
            preprocessor: NoopPreprocessor,
            validator: ValidationEngine::with_defaults(),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl<Pre> Pipeline<Pre> {
    /// Replace the keyword preprocessor.
    pub fn with_preprocessor<P: KeywordPreprocessor>(self, preprocessor: P) -> Pipeline<P> {
        Pipeline {
            preprocessor,
            validator: self.validator,
        }
    }

    /// Replace the validation rules.
    pub fn with_validator(mut self, validator: ValidationEngine) -> Self {
        self.validator = validator;
        self
    }
}

impl<Pre: KeywordPreprocessor> Pipeline<Pre> {
    /// Execute the pipeline for one request.
    ///
    /// The `observer` receives callbacks at each stage boundary. Pass
    /// [`NoopObserver`] for zero-overhead execution.
    pub fn run(
        &self,
        request: &AnalysisRequest,
        observer: &mut impl PipelineObserver,
    ) -> Result<AnalysisResult> {
        let mut warnings = self.validate(request)?;
        let options = &request.options;
        let tokenizer = Tokenizer::for_language(&options.language);

        // Stage 1: Tokenize
        let mut keywords = {
            trace_stage!(STAGE_TOKENIZE);
            observer.on_stage_start(STAGE_TOKENIZE);
            let clock = StageClock::start();
            let keywords = KeywordLists::new(
                tokenizer.tokenize(&request.title_text, SourceField::Title),
                tokenizer.tokenize(&request.subtitle_text, SourceField::Subtitle),
            );
            let report = StageReportBuilder::new(clock.elapsed())
                .items(keywords.len())
                .build();
            observer.on_stage_end(STAGE_TOKENIZE, &report);
            keywords
        };

        // Stage 2: Preprocess
        {
            trace_stage!(STAGE_PREPROCESS);
            observer.on_stage_start(STAGE_PREPROCESS);
            let clock = StageClock::start();
            self.preprocessor.preprocess(&mut keywords, options);
            let report = StageReportBuilder::new(clock.elapsed())
                .items(keywords.len())
                .build();
            observer.on_stage_end(STAGE_PREPROCESS, &report);
            observer.on_keywords(&keywords);
        }

        // Stage 3: Generate
        let generation = {
            trace_stage!(STAGE_GENERATE);
            observer.on_stage_start(STAGE_GENERATE);
            let clock = StageClock::start();
            let generation =
                CombinationGenerator::new(options).generate(&keywords.title, &keywords.subtitle);
            let report = StageReportBuilder::new(clock.elapsed())
                .items(generation.candidates.len())
                .truncated(generation.truncated)
                .build();
            observer.on_stage_end(STAGE_GENERATE, &report);
            observer.on_candidates(&generation.candidates);
            generation
        };

        if generation.truncated {
            tracing::warn!(
                keyword_count = generation.keyword_count,
                tier = ?generation.scaling_tier,
                combinations = generation.candidates.len(),
                "combination analysis is partial"
            );
        }

        // Stage 4: Classify
        let classified = {
            trace_stage!(STAGE_CLASSIFY);
            observer.on_stage_start(STAGE_CLASSIFY);
            let clock = StageClock::start();
            let classifier =
                StrengthClassifier::new(&tokenizer, &request.title_text, &request.subtitle_text);
            let mut classified: Vec<ClassifiedCombination> = generation
                .candidates
                .iter()
                .map(|combo| ClassifiedCombination::new(combo.clone(), classifier.classify(combo)))
                .collect();
            classified.sort_by(|a, b| {
                a.strength
                    .cmp(&b.strength)
                    .then_with(|| b.estimated_value.total_cmp(&a.estimated_value))
                    .then_with(|| a.text.cmp(&b.text))
            });
            let report = StageReportBuilder::new(clock.elapsed())
                .items(classified.len())
                .build();
            observer.on_stage_end(STAGE_CLASSIFY, &report);
            observer.on_classified(&classified);
            classified
        };

        // Stage 5: Aggregate
        let stats = {
            trace_stage!(STAGE_AGGREGATE);
            observer.on_stage_start(STAGE_AGGREGATE);
            let clock = StageClock::start();
            let stats = with_generation(summarize(&classified), &generation);
            observer.on_stage_end(STAGE_AGGREGATE, &StageReport::new(clock.elapsed()));
            stats
        };

        warnings.extend(generation.warnings);

        Ok(AnalysisResult {
            combinations: classified,
            stats,
            warnings,
        })
    }

    /// Run with no observer.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        self.run(request, &mut NoopObserver)
    }

    /// Classify caller-supplied target phrases against the request's fields.
    ///
    /// No generation happens: every phrase is classified as given, which is
    /// how phrases that need new vocabulary show up as
    /// [`StrengthTier::Missing`](crate::types::StrengthTier::Missing).
    /// `source` names the field that can supply every word (see
    /// [`StrengthClassifier::source_of`]) and `estimatedValue` is zero.
    pub fn classify_targets<S: AsRef<str>>(
        &self,
        request: &AnalysisRequest,
        phrases: &[S],
    ) -> Result<Vec<ClassifiedCombination>> {
        self.validate(request)?;
        let tokenizer = Tokenizer::for_language(&request.options.language);
        let classifier =
            StrengthClassifier::new(&tokenizer, &request.title_text, &request.subtitle_text);

        Ok(phrases
            .iter()
            .map(|phrase| {
                let words = tokenizer.phrase_words(phrase.as_ref());
                let classification = classifier.classify_words(&words);
                let combo = Combination {
                    text: words.join(" "),
                    keywords: Vec::new(),
                    source: classifier.source_of(&words),
                    estimated_value: 0.0,
                };
                let mut classified = ClassifiedCombination::new(combo, classification);
                classified.length = words.len();
                classified.keywords = words;
                classified
            })
            .collect())
    }

    /// Validate; errors abort, warnings are returned as messages.
    fn validate(&self, request: &AnalysisRequest) -> Result<Vec<String>> {
        let report = self.validator.validate(request);
        if report.has_errors() {
            return Err(ComboError::InvalidInput(report.errors().cloned().collect()));
        }
        let warnings: Vec<String> = report.warnings().map(|w| w.to_string()).collect();
        for warning in &warnings {
            tracing::debug!(%warning, "request warning");
        }
        Ok(warnings)
    }
}

impl<Pre: KeywordPreprocessor + Sync> Pipeline<Pre> {
    /// Analyze independent requests in parallel.
    ///
    /// Results come back in request order.
    pub fn run_batch(&self, requests: &[AnalysisRequest]) -> Vec<Result<AnalysisResult>> {
        requests.par_iter().map(|r| self.analyze(r)).collect()
    }
}

// ============================================================================
// Convenience entry points
// ============================================================================

/// Analyze a title/subtitle pair with the default pipeline.
pub fn analyze(
    title_text: &str,
    subtitle_text: &str,
    options: &CombinationOptions,
) -> Result<AnalysisResult> {
    let request = AnalysisRequest::new(title_text, subtitle_text).with_options(options.clone());
    Pipeline::new().analyze(&request)
}

/// Analyze a JSON request and return the JSON result.
pub fn analyze_json(json: &str) -> Result<String> {
    let request = AnalysisRequest::from_json(json)?;
    let result = Pipeline::new().analyze(&request)?;
    Ok(serde_json::to_string(&result)?)
}

/// Analyze independent requests in parallel with the default pipeline.
pub fn analyze_batch(requests: &[AnalysisRequest]) -> Vec<Result<AnalysisResult>> {
    Pipeline::new().run_batch(requests)
}
