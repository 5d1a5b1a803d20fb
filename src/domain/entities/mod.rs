//! # Domain Entities
//!
//! Request, decision, and result shapes for pre-qualification.
//!
//! ## Inputs
//!
//! - [`BusinessProfile`]: Applicant snapshot with defaulting accessors
//! - [`FinancingRequest`], [`FinancingApplication`]: What is requested and by whom
//!
//! ## Outputs
//!
//! - [`CreditDecision`], [`DecisionFactor`]: Scorer output
//! - [`RiskAssessment`], [`PartnerRecommendation`], [`PreQualificationResult`]
//!
//! ## Partners
//!
//! - [`PartnerSummary`], [`PartnerTerms`], [`PartnerCriteria`], [`PartnerListing`]

pub mod application;
pub mod business_profile;
pub mod decision;
pub mod partner;
pub mod prequalification;

pub use application::{FinancingApplication, FinancingRequest};
pub use business_profile::{BusinessProfile, BusinessProfileBuilder, DEFAULT_CREDIT_SCORE};
pub use decision::{CreditDecision, DecisionFactor, MAX_RECOMMENDED_PARTNERS};
pub use partner::{PartnerCriteria, PartnerListing, PartnerSummary, PartnerTerms};
pub use prequalification::{
    PartnerRecommendation, PreQualificationResult, RiskAssessment, RiskFactor,
};
