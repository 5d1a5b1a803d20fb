//! # Pre-Qualification Result
//!
//! The assembled, explainable answer returned to callers and held in the
//! result cache.

use crate::domain::entities::DecisionFactor;
use crate::domain::value_objects::{
    Amount, ApprovalTime, AssessmentId, PartnerId, Recommendation, RiskLevel, ScoreSource,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A partner ranked for one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerRecommendation {
    /// Partner ID.
    pub partner_id: PartnerId,
    /// Display name.
    pub partner_name: String,
    /// Adjusted approval probability, 0-100.
    pub approval_probability: u8,
    /// Approval probability less the amount-coverage penalty.
    pub match_score: f64,
    /// Indicative annual interest rate, in percent.
    pub estimated_rate: Decimal,
    /// Amount the partner is expected to fund.
    pub estimated_amount: Amount,
    /// Expected approval window.
    pub estimated_approval_time: ApprovalTime,
    /// Why this partner was matched.
    pub reasons: Vec<String>,
    /// What the partner does well for this application.
    pub strengths: Vec<String>,
    /// Caveats the applicant should weigh.
    pub considerations: Vec<String>,
    /// 1-based position after ranking; 0 until ranked.
    pub rank: usize,
}

impl PartnerRecommendation {
    /// Returns true if this is the top-ranked partner.
    #[must_use]
    pub fn is_best(&self) -> bool {
        self.rank == 1
    }
}

/// Score and level for one risk dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Creditworthiness on this dimension, 0-100 (higher is safer).
    pub score: u8,
    /// Level implied by the score.
    pub risk: RiskLevel,
}

/// Aggregate risk view of an applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Overall level.
    pub level: RiskLevel,
    /// Average of the factor scores, 0-100.
    pub score: u8,
    /// Per-dimension breakdown keyed by factor name.
    pub factors: BTreeMap<String, RiskFactor>,
    /// Steps that would improve the profile.
    pub recommendations: Vec<String>,
}

/// Full pre-qualification outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreQualificationResult {
    /// Identifier of this assessment.
    pub assessment_id: AssessmentId,
    /// Final recommendation. Forced to `decline` when no partner qualifies.
    pub decision: Recommendation,
    /// Overall approval probability, 0-100.
    pub approval_probability: u8,
    /// Risk score, 0-100.
    pub risk_score: u8,
    /// Bureau credit score used, if reported.
    pub credit_score: Option<u16>,
    /// Ranked partners, best first.
    pub recommended_partners: Vec<PartnerRecommendation>,
    /// Adjusted score for every partner considered by the scorer.
    pub partner_scores: BTreeMap<PartnerId, u8>,
    /// Factors behind the decision.
    pub factors: Vec<DecisionFactor>,
    /// Risk breakdown.
    pub risk_assessment: RiskAssessment,
    /// Guidance for the applicant, at most five entries.
    pub suggestions: Vec<String>,
    /// When the assessment was computed.
    pub assessed_at: DateTime<Utc>,
    /// Scoring strategy used.
    pub source: ScoreSource,
    /// Confidence, 0-100.
    pub confidence: u8,
}

impl PreQualificationResult {
    /// Returns true if at least one partner was recommended.
    #[must_use]
    pub fn has_partners(&self) -> bool {
        !self.recommended_partners.is_empty()
    }

    /// Returns the top-ranked partner, if any.
    #[must_use]
    pub fn best_partner(&self) -> Option<&PartnerRecommendation> {
        self.recommended_partners.first()
    }
}
