//! # Risk Assessor
//!
//! Per-dimension risk breakdown of an applicant.
//!
//! Uses the same tier boundaries as the credit scorer but its own 0-100
//! scale, so risk wording can evolve without touching the scores. Higher
//! factor scores mean lower risk.

use crate::domain::entities::{BusinessProfile, CreditDecision, RiskAssessment, RiskFactor};
use crate::domain::value_objects::{Amount, RiskLevel};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Business age tiers in years and their factor scores.
const AGE_SCORES: [(f64, u8); 4] = [(5.0, 100), (3.0, 80), (2.0, 60), (1.0, 40)];
const AGE_FLOOR: u8 = 20;

/// Annual revenue tiers and their factor scores.
const REVENUE_SCORES: [(u64, u8); 5] = [
    (50_000_000, 100),
    (20_000_000, 85),
    (10_000_000, 70),
    (5_000_000, 55),
    (1_000_000, 40),
];
const REVENUE_FLOOR: u8 = 25;

/// Credit score tiers and their factor scores.
const CREDIT_SCORES: [(u16, u8); 4] = [(750, 100), (700, 85), (650, 70), (600, 50)];
const CREDIT_FLOOR: u8 = 30;

/// Business age below which a recommendation is emitted.
const MIN_COMFORTABLE_YEARS: f64 = 2.0;
/// Credit score below which a recommendation is emitted.
const MIN_COMFORTABLE_CREDIT: u16 = 700;
/// Revenue below which a recommendation is emitted.
const MIN_COMFORTABLE_REVENUE: u64 = 10_000_000;
/// Decision risk score at or above which a smaller request is suggested.
const HIGH_DECISION_RISK: u8 = 50;

/// Factor key for business age.
pub const FACTOR_BUSINESS_AGE: &str = "business_age";
/// Factor key for revenue.
pub const FACTOR_REVENUE: &str = "revenue";
/// Factor key for credit history.
pub const FACTOR_CREDIT_HISTORY: &str = "credit_history";

/// Derives a [`RiskAssessment`] from a profile and its credit decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAssessor;

impl RiskAssessor {
    /// Creates an assessor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Assesses the profile.
    ///
    /// Missing profile values take the same defaults the scorer uses.
    #[must_use]
    pub fn assess(&self, profile: &BusinessProfile, decision: &CreditDecision) -> RiskAssessment {
        let years = profile.years_in_business_or_default();
        let revenue = profile.annual_revenue_or_default();
        let credit = profile.credit_score_or_default();

        let scores = [
            (FACTOR_BUSINESS_AGE, tier_score(years, &AGE_SCORES, AGE_FLOOR)),
            (FACTOR_REVENUE, revenue_score(revenue)),
            (FACTOR_CREDIT_HISTORY, tier_score(credit, &CREDIT_SCORES, CREDIT_FLOOR)),
        ];

        let total: u32 = scores.iter().map(|(_, s)| u32::from(*s)).sum();
        let average = f64::from(total) / scores.len() as f64;

        let factors: BTreeMap<String, RiskFactor> = scores
            .iter()
            .map(|(name, score)| {
                (
                    (*name).to_string(),
                    RiskFactor {
                        score: *score,
                        risk: RiskLevel::from_average(f64::from(*score)),
                    },
                )
            })
            .collect();

        let mut recommendations = Vec::new();
        if years < MIN_COMFORTABLE_YEARS {
            recommendations.push(
                "Build at least two years of operating history to widen partner eligibility"
                    .to_string(),
            );
        }
        if credit < MIN_COMFORTABLE_CREDIT {
            recommendations.push(
                "Raise your credit score above 700 by clearing overdue dues and lowering utilization"
                    .to_string(),
            );
        }
        if revenue.get() < Decimal::from(MIN_COMFORTABLE_REVENUE) {
            recommendations.push(
                "Keep audited revenue records up to date to support higher limits".to_string(),
            );
        }
        if decision.risk_score() >= HIGH_DECISION_RISK {
            recommendations.push(
                "Consider a smaller amount or offering collateral to lower lender risk".to_string(),
            );
        }

        RiskAssessment {
            level: RiskLevel::from_average(average),
            score: u8::try_from(average.round() as u32).unwrap_or(100),
            factors,
            recommendations,
        }
    }
}

fn tier_score<T: PartialOrd + Copy>(value: T, tiers: &[(T, u8)], floor: u8) -> u8 {
    tiers
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map_or(floor, |(_, score)| *score)
}

fn revenue_score(revenue: Amount) -> u8 {
    REVENUE_SCORES
        .iter()
        .find(|(threshold, _)| revenue.get() >= Decimal::from(*threshold))
        .map_or(REVENUE_FLOOR, |(_, score)| *score)
}
