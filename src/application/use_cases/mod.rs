//! # Use Cases
//!
//! Application workflows.
//!
//! - [`PreQualificationOrchestrator`]: Scores an application, probes the
//!   matching partners, and returns a ranked, cached result

pub mod pre_qualify;

pub use pre_qualify::{
    CacheKey, DEFAULT_APPROVAL_PROBABILITY, DEFAULT_PROBE_TIMEOUT_MS, OrchestratorConfig,
    PreQualificationCache, PreQualificationOrchestrator, PreQualifyOptions,
};
