//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`AssessmentId`]: UUID-based identifier for a pre-qualification result
//! - [`PartnerId`], [`TenantId`], [`UserId`]: String-based identifiers
//!
//! ## Numeric Types
//!
//! - [`Amount`]: Non-negative decimal currency amount
//! - [`ApprovalTime`]: Estimated approval window
//!
//! ## Domain Enums
//!
//! - [`PartnerType`], [`FinancingProduct`], [`Urgency`]
//! - [`Recommendation`], [`FactorImpact`], [`RiskLevel`], [`ScoreSource`]

pub mod amount;
pub mod approval_time;
pub mod enums;
pub mod ids;

pub use amount::Amount;
pub use approval_time::ApprovalTime;
pub use enums::{
    FactorImpact, FinancingProduct, ParseEnumError, PartnerType, Recommendation, RiskLevel,
    ScoreSource, Urgency,
};
pub use ids::{AssessmentId, PartnerId, TenantId, UserId};
