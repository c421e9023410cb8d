//! # rapid-combos
//!
//! Keyword combination generation and ranking-strength classification for
//! app-store title and subtitle metadata.
//!
//! Given an app's title and subtitle, the crate tokenizes both fields,
//! enumerates every multi-word keyword combination the metadata can express
//! (title-only, subtitle-only, and cross-field), and classifies each
//! combination into one of six strength tiers:
//!
//! | Tier | Meaning |
//! |------|---------|
//! | `title_consecutive` | adjacent, in order, in the title |
//! | `title_non_consecutive` | all words in the title |
//! | `cross_element` | split across title and subtitle |
//! | `subtitle_consecutive` | adjacent, in order, in the subtitle |
//! | `subtitle_non_consecutive` | all words in the subtitle |
//! | `missing` | not formable as written |
//!
//! Large inputs are bounded by a per-source cap and a keyword-count scaling
//! policy; whenever output is cut, `stats.truncated` is set.
//!
//! ## Quick Start
//!
//! ```rust
//! use rapid_combos::{analyze, CombinationOptions, StrengthTier};
//!
//! let result = analyze(
//!     "Headspace: Meditation & Sleep",
//!     "Mindfulness Timer & Wellness App",
//!     &CombinationOptions::default(),
//! )
//! .unwrap();
//!
//! let combo = result.find("meditation sleep").unwrap();
//! assert_eq!(combo.strength, StrengthTier::TitleConsecutive);
//! ```

pub mod combos;
pub mod errors;
pub mod nlp;
pub mod pipeline;
pub mod stats;
pub mod strength;
pub mod types;

pub use errors::{ComboError, Result};
pub use nlp::brand::BrandFilter;
pub use pipeline::request::AnalysisRequest;
pub use pipeline::runner::{analyze, analyze_batch, analyze_json, Pipeline};
pub use types::{
    AnalysisResult, AnalysisStats, ClassifiedCombination, ComboSource, Combination,
    CombinationOptions, Keyword, ScalingPolicy, ScalingTier, SourceField, StrengthTier,
};
