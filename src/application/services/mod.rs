//! # Application Services
//!
//! Scoring, ranking, and caching services used by the pre-qualification
//! use case.
//!
//! - [`CreditScorer`]: Strategy seam; [`RuleBasedScorer`] and [`MlScorer`]
//! - [`RiskAssessor`]: Per-dimension risk breakdown
//! - [`SuggestionGenerator`]: Applicant guidance
//! - [`ranking`]: Match scores, fallbacks, and ordering
//! - [`ResultCache`]: Bounded TTL cache with single-flight slots

pub mod credit_scorer;
pub mod ranking;
pub mod result_cache;
pub mod risk_assessor;
pub mod suggestions;

pub use credit_scorer::{
    AdjustmentCondition, CreditModel, CreditScorer, MlScorer, ModelError, ModelPrediction,
    PartnerAdjustments, RuleBasedScorer, ScoreAdjustment, ScoringFeatures,
};
pub use ranking::{Candidate, FALLBACK_RATE, ProbeOutcome};
pub use result_cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, ResultCache};
pub use risk_assessor::RiskAssessor;
pub use suggestions::{MAX_SUGGESTIONS, SuggestionGenerator};
