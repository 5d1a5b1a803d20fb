//! # Application Layer
//!
//! Use case orchestration and application services.
//!
//! ## Use Cases
//!
//! - [`PreQualificationOrchestrator`]: Score, probe, rank, and cache
//!
//! ## Services
//!
//! - [`CreditScorer`]: Rule-based or model-backed scoring
//! - [`RiskAssessor`], [`SuggestionGenerator`]: Explanations for the applicant
//! - [`ResultCache`]: Bounded TTL cache shared by identical requests

pub mod dto;
pub mod error;
pub mod services;
pub mod use_cases;

pub use dto::PreQualificationRequest;
pub use error::{ApplicationError, ApplicationResult};
pub use services::{
    CreditModel, CreditScorer, MlScorer, ModelError, ModelPrediction, PartnerAdjustments,
    ResultCache, RiskAssessor, RuleBasedScorer, SuggestionGenerator,
};
pub use use_cases::{
    CacheKey, OrchestratorConfig, PreQualificationOrchestrator, PreQualifyOptions,
};
