//! # Credit Decision
//!
//! Output of a credit scorer: an overall score, its complement as risk,
//! per-partner adjusted scores, and the factors that explain them.

use crate::domain::value_objects::{FactorImpact, PartnerId, Recommendation, ScoreSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound on `recommended_partner_ids`.
pub const MAX_RECOMMENDED_PARTNERS: usize = 5;

/// One explanatory input to a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionFactor {
    /// Short factor name, e.g. `business_age`.
    pub factor: String,
    /// Direction of the effect.
    pub impact: FactorImpact,
    /// Relative weight, 0-100.
    pub weight: u8,
    /// Human-readable explanation including the observed figure.
    pub description: String,
}

impl DecisionFactor {
    /// Creates a factor, clamping the weight to 100.
    #[must_use]
    pub fn new(
        factor: impl Into<String>,
        impact: FactorImpact,
        weight: u8,
        description: impl Into<String>,
    ) -> Self {
        Self {
            factor: factor.into(),
            impact,
            weight: weight.min(100),
            description: description.into(),
        }
    }
}

/// A scored credit decision.
///
/// # Invariants
///
/// - `overall_score + risk_score == 100`
/// - `recommended_partner_ids.len() <= 5`, ordered by adjusted partner
///   score descending then partner ID ascending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditDecision {
    recommendation: Recommendation,
    overall_score: u8,
    risk_score: u8,
    credit_score: Option<u16>,
    partner_scores: BTreeMap<PartnerId, u8>,
    recommended_partner_ids: Vec<PartnerId>,
    factors: Vec<DecisionFactor>,
    confidence: u8,
    source: ScoreSource,
}

impl CreditDecision {
    /// Builds a decision from an overall score.
    ///
    /// The recommendation and risk score are derived from `overall_score`
    /// and the partner shortlist from `partner_scores`, so the invariants
    /// hold by construction.
    #[must_use]
    pub fn new(
        overall_score: u8,
        credit_score: Option<u16>,
        partner_scores: BTreeMap<PartnerId, u8>,
        factors: Vec<DecisionFactor>,
        confidence: u8,
        source: ScoreSource,
    ) -> Self {
        let overall_score = overall_score.min(100);
        let recommended_partner_ids = shortlist(&partner_scores, MAX_RECOMMENDED_PARTNERS);
        Self {
            recommendation: Recommendation::from_score(overall_score),
            overall_score,
            risk_score: 100 - overall_score,
            credit_score,
            partner_scores,
            recommended_partner_ids,
            factors,
            confidence: confidence.min(100),
            source,
        }
    }

    /// The recommendation.
    #[inline]
    #[must_use]
    pub fn recommendation(&self) -> Recommendation {
        self.recommendation
    }

    /// Overall score, 0-100.
    #[inline]
    #[must_use]
    pub fn overall_score(&self) -> u8 {
        self.overall_score
    }

    /// Risk score, `100 - overall_score`.
    #[inline]
    #[must_use]
    pub fn risk_score(&self) -> u8 {
        self.risk_score
    }

    /// Bureau credit score used, if one was reported.
    #[inline]
    #[must_use]
    pub fn credit_score(&self) -> Option<u16> {
        self.credit_score
    }

    /// Adjusted score per partner.
    #[must_use]
    pub fn partner_scores(&self) -> &BTreeMap<PartnerId, u8> {
        &self.partner_scores
    }

    /// Adjusted score for one partner.
    #[must_use]
    pub fn partner_score(&self, partner_id: &PartnerId) -> Option<u8> {
        self.partner_scores.get(partner_id).copied()
    }

    /// Up to five best partners.
    #[must_use]
    pub fn recommended_partner_ids(&self) -> &[PartnerId] {
        &self.recommended_partner_ids
    }

    /// Explanatory factors.
    #[must_use]
    pub fn factors(&self) -> &[DecisionFactor] {
        &self.factors
    }

    /// Confidence, 0-100.
    #[inline]
    #[must_use]
    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    /// Strategy that produced this decision.
    #[inline]
    #[must_use]
    pub fn source(&self) -> ScoreSource {
        self.source
    }
}

/// Top `limit` partner IDs by score descending, ties by ID ascending.
#[must_use]
pub fn shortlist(scores: &BTreeMap<PartnerId, u8>, limit: usize) -> Vec<PartnerId> {
    let mut entries: Vec<(&PartnerId, u8)> = scores.iter().map(|(id, s)| (id, *s)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(limit)
        .map(|(id, _)| id.clone())
        .collect()
}
