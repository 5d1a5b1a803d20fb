//! # Partner Ranking
//!
//! Turns eligibility probe outcomes into ranked [`PartnerRecommendation`]s.
//!
//! # Match Score
//!
//! `match_score` starts at the partner's approval probability. When the
//! partner can fund less than requested, half the uncovered percentage is
//! subtracted:
//!
//! ```text
//! coverage = estimated / requested * 100
//! match    = probability - (100 - coverage) / 2
//! ```
//!
//! # Ordering
//!
//! Match score descending, ties broken by partner ID ascending. Ranks are
//! 1-based and contiguous.

use crate::domain::entities::PartnerRecommendation;
use crate::domain::value_objects::{Amount, ApprovalTime, FinancingProduct, PartnerId};
use crate::infrastructure::partners::EligibilityResponse;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Rate assumed when a probe fails, in percent.
pub const FALLBACK_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 0);

/// Probability at or above which approval is called likely.
const HIGH_PROBABILITY: u8 = 80;
/// Probability at or above which approval is called reasonable.
const GOOD_PROBABILITY: u8 = 60;
/// Rates at or below this are competitive.
const LOW_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
/// Rates at or above this are expensive.
const HIGH_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 0);

/// Result of probing one partner.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// The partner answered, eligible or not.
    Answered(EligibilityResponse),
    /// The probe errored or timed out.
    Failed {
        /// What went wrong.
        reason: String,
    },
}

/// A partner that cleared the probability filter, before ranking.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Partner ID.
    pub partner_id: PartnerId,
    /// Display name.
    pub partner_name: String,
    /// Adjusted approval probability, 0-100.
    pub approval_probability: u8,
    /// Probe result.
    pub outcome: ProbeOutcome,
}

/// Amount-coverage adjusted score.
#[must_use]
pub fn match_score(approval_probability: u8, estimated: Amount, requested: Amount) -> f64 {
    let probability = Decimal::from(approval_probability);
    let score = match coverage_percent(estimated, requested) {
        Some(coverage) if coverage < Decimal::ONE_HUNDRED => {
            probability - (Decimal::ONE_HUNDRED - coverage) / Decimal::TWO
        }
        _ => probability,
    };
    score.round_dp(2).to_f64().unwrap_or(0.0)
}

fn coverage_percent(estimated: Amount, requested: Amount) -> Option<Decimal> {
    // Coverage too large to represent is full coverage.
    estimated
        .ratio_to(requested)
        .map(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED).unwrap_or(Decimal::MAX))
}

/// Builds an unranked recommendation from a probe outcome.
///
/// A failed probe keeps the candidate with fallback estimates: rate
/// [`FALLBACK_RATE`], the requested amount, and a 2-3 day approval. Partner
/// estimates above the requested amount are capped at it.
#[must_use]
pub fn build_recommendation(
    candidate: Candidate,
    product: FinancingProduct,
    requested: Amount,
) -> PartnerRecommendation {
    let Candidate {
        partner_id,
        partner_name,
        approval_probability,
        outcome,
    } = candidate;

    let (estimated_amount, estimated_rate, estimated_approval_time) = match &outcome {
        ProbeOutcome::Answered(response) => (
            response.maximum_amount.map_or(requested, |max| max.min(requested)),
            response.estimated_rate.unwrap_or(FALLBACK_RATE),
            response.approval_time.unwrap_or_else(ApprovalTime::fallback),
        ),
        ProbeOutcome::Failed { .. } => (requested, FALLBACK_RATE, ApprovalTime::fallback()),
    };

    let mut reasons = vec![
        format!("Offers {product}"),
        format!("Estimated approval probability of {approval_probability}%"),
    ];
    let mut strengths = Vec::new();
    let mut considerations = Vec::new();

    if approval_probability >= HIGH_PROBABILITY {
        strengths.push("High likelihood of approval".to_string());
    } else if approval_probability >= GOOD_PROBABILITY {
        strengths.push("Good likelihood of approval".to_string());
    } else {
        considerations.push(format!(
            "Approval is uncertain at {approval_probability}% probability"
        ));
    }

    if estimated_rate <= LOW_RATE {
        strengths.push(format!("Competitive rate around {estimated_rate}%"));
    } else if estimated_rate >= HIGH_RATE {
        considerations.push(format!("Higher rate around {estimated_rate}%"));
    }

    if estimated_approval_time.is_fast() {
        strengths.push(format!("Fast approval in {estimated_approval_time}"));
    } else if estimated_approval_time.is_slow() {
        considerations.push(format!("Slower approval, about {estimated_approval_time}"));
    }

    match coverage_percent(estimated_amount, requested) {
        Some(coverage) if coverage < Decimal::ONE_HUNDRED => considerations.push(format!(
            "Can fund about {}% of the requested amount",
            coverage.round_dp(0)
        )),
        _ => strengths.push("Can fund the full requested amount".to_string()),
    }

    match &outcome {
        ProbeOutcome::Answered(response) => {
            reasons.extend(response.reasons.iter().cloned());
            if !response.eligible {
                considerations.push("Partner pre-screen did not pass; approval is unlikely without changes".to_string());
            }
        }
        ProbeOutcome::Failed { reason } => {
            considerations.push(format!(
                "Live estimate unavailable ({reason}); figures are indicative"
            ));
        }
    }

    PartnerRecommendation {
        match_score: match_score(approval_probability, estimated_amount, requested),
        partner_id,
        partner_name,
        approval_probability,
        estimated_rate,
        estimated_amount,
        estimated_approval_time,
        reasons,
        strengths,
        considerations,
        rank: 0,
    }
}

/// Sorts by match score (ties by partner ID), assigns ranks, and keeps at
/// most `max_partners`.
#[must_use]
pub fn rank(mut recommendations: Vec<PartnerRecommendation>, max_partners: usize) -> Vec<PartnerRecommendation> {
    recommendations.sort_by(|a, b| {
        b.match_score
            .total_cmp(&a.match_score)
            .then_with(|| a.partner_id.cmp(&b.partner_id))
    });
    recommendations.truncate(max_partners);
    for (index, recommendation) in recommendations.iter_mut().enumerate() {
        recommendation.rank = index + 1;
    }
    recommendations
}
