//! # Credit Scorer
//!
//! Scoring strategies that turn a business profile and a request into a
//! [`CreditDecision`].
//!
//! # Rule-Based Scoring
//!
//! Four additive buckets, capped at 100:
//!
//! | Dimension | Max | Tiers |
//! |-----------|-----|-------|
//! | Business age | 25 | ≥5y 25, ≥3y 20, ≥2y 15, ≥1y 10, else 5 |
//! | Annual revenue | 30 | ≥5cr 30, ≥2cr 25, ≥1cr 20, ≥50L 15, ≥10L 10, else 5 |
//! | Credit score | 30 | ≥750 30, ≥700 25, ≥650 20, ≥600 15, else 10 |
//! | Requested / revenue | 15 | ≤0.1 15, ≤0.2 12, ≤0.3 9, ≤0.5 6, else 3 |
//!
//! The ratio bucket scores a flat 3 when no revenue is reported.
//!
//! # Partner Adjustments
//!
//! Each partner's score starts from the overall score and receives the
//! additive adjustments configured for its [`PartnerType`], clamped to
//! `[0, 100]`. See [`PartnerAdjustments::standard`].
//!
//! # Strategies
//!
//! - [`RuleBasedScorer`]: deterministic and total; never fails.
//! - [`MlScorer`]: delegates the overall score to an injected
//!   [`CreditModel`] and falls back to the rules when the model errors.

use crate::domain::entities::{
    BusinessProfile, CreditDecision, DecisionFactor, FinancingRequest, PartnerSummary,
};
use crate::domain::value_objects::{Amount, FactorImpact, PartnerId, PartnerType, ScoreSource, Urgency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

// ============================================================================
// Bucket tables
// ============================================================================

/// Business age tiers in years, best first.
const AGE_TIERS: [(f64, u8); 4] = [(5.0, 25), (3.0, 20), (2.0, 15), (1.0, 10)];
const AGE_FLOOR: u8 = 5;

/// Annual revenue tiers in currency units, best first.
const REVENUE_TIERS: [(u64, u8); 5] = [
    (50_000_000, 30),
    (20_000_000, 25),
    (10_000_000, 20),
    (5_000_000, 15),
    (1_000_000, 10),
];
const REVENUE_FLOOR: u8 = 5;

/// Credit score tiers, best first.
const CREDIT_TIERS: [(u16, u8); 4] = [(750, 30), (700, 25), (650, 20), (600, 15)];
const CREDIT_FLOOR: u8 = 10;

/// Requested-to-revenue ratio ceilings, best first.
const RATIO_TIERS: [(Decimal, u8); 4] = [
    (Decimal::from_parts(1, 0, 0, false, 1), 15),
    (Decimal::from_parts(2, 0, 0, false, 1), 12),
    (Decimal::from_parts(3, 0, 0, false, 1), 9),
    (Decimal::from_parts(5, 0, 0, false, 1), 6),
];
const RATIO_FLOOR: u8 = 3;

/// Upper bound of the combined score.
const MAX_SCORE: u8 = 100;

/// Confidence with a complete profile.
const BASE_CONFIDENCE: u8 = 80;
/// Confidence lost per defaulted profile field.
const CONFIDENCE_PENALTY_PER_DEFAULT: u8 = 15;
/// Lowest confidence reported.
const MIN_CONFIDENCE: u8 = 20;

/// Points earned on one dimension and the tier they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bucket {
    points: u8,
    max_points: u8,
    /// 0 is the best tier.
    tier: usize,
    tier_count: usize,
}

impl Bucket {
    fn is_strength(&self) -> bool {
        self.tier < 2
    }

    fn is_weakness(&self) -> bool {
        self.tier + 1 == self.tier_count
    }

    fn impact(&self) -> Option<FactorImpact> {
        if self.is_strength() {
            Some(FactorImpact::Positive)
        } else if self.is_weakness() {
            Some(FactorImpact::Negative)
        } else {
            None
        }
    }
}

fn bucket<T: Copy>(value: T, tiers: &[(T, u8)], floor: u8, meets: impl Fn(T, T) -> bool) -> Bucket {
    let max_points = tiers.first().map_or(floor, |(_, points)| *points);
    let tier_count = tiers.len() + 1;
    tiers
        .iter()
        .position(|(threshold, _)| meets(value, *threshold))
        .and_then(|tier| tiers.get(tier).map(|(_, points)| (tier, *points)))
        .map_or(
            Bucket {
                points: floor,
                max_points,
                tier: tiers.len(),
                tier_count,
            },
            |(tier, points)| Bucket {
                points,
                max_points,
                tier,
                tier_count,
            },
        )
}

fn age_bucket(years: f64) -> Bucket {
    bucket(years, &AGE_TIERS, AGE_FLOOR, |v, t| v >= t)
}

fn revenue_bucket(revenue: Amount) -> Bucket {
    bucket(revenue.get(), &revenue_tiers(), REVENUE_FLOOR, |v, t| v >= t)
}

fn revenue_tiers() -> [(Decimal, u8); 5] {
    REVENUE_TIERS.map(|(threshold, points)| (Decimal::from(threshold), points))
}

fn credit_bucket(score: u16) -> Bucket {
    bucket(score, &CREDIT_TIERS, CREDIT_FLOOR, |v, t| v >= t)
}

fn ratio_bucket(ratio: Option<Decimal>) -> Bucket {
    match ratio {
        Some(ratio) => bucket(ratio, &RATIO_TIERS, RATIO_FLOOR, |v, t| v <= t),
        None => Bucket {
            points: RATIO_FLOOR,
            max_points: RATIO_TIERS[0].1,
            tier: RATIO_TIERS.len(),
            tier_count: RATIO_TIERS.len() + 1,
        },
    }
}

// ============================================================================
// Features
// ============================================================================

/// Normalized scoring inputs.
///
/// Missing or invalid profile values are already replaced by their
/// defaults, so every strategy sees the same numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringFeatures {
    /// Years in business.
    pub years_in_business: f64,
    /// Annual revenue.
    pub annual_revenue: Amount,
    /// Credit score.
    pub credit_score: u16,
    /// Requested amount.
    pub requested_amount: Amount,
    /// Requested amount divided by revenue; `None` without revenue or when
    /// the ratio is too large to represent.
    pub amount_to_revenue: Option<Decimal>,
    /// Stated purpose.
    pub purpose: Option<String>,
    /// Stated urgency.
    pub urgency: Option<Urgency>,
    /// How many profile fields fell back to defaults.
    pub defaulted_fields: u8,
}

impl ScoringFeatures {
    /// Extracts features from a profile and request.
    #[must_use]
    pub fn extract(profile: &BusinessProfile, request: &FinancingRequest) -> Self {
        let annual_revenue = profile.annual_revenue_or_default();
        let requested_amount = request.requested_amount();
        Self {
            years_in_business: profile.years_in_business_or_default(),
            annual_revenue,
            credit_score: profile.credit_score_or_default(),
            requested_amount,
            amount_to_revenue: requested_amount.ratio_to(annual_revenue),
            purpose: request.purpose().map(str::to_string),
            urgency: request.urgency(),
            defaulted_fields: profile.defaulted_fields(),
        }
    }
}

// ============================================================================
// Partner adjustments
// ============================================================================

/// Condition gating a score adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "when", content = "value")]
pub enum AdjustmentCondition {
    /// Years in business at or above the value.
    MinYears(f64),
    /// Years in business below the value.
    BelowYears(f64),
    /// Annual revenue at or above the value.
    MinRevenue(u64),
    /// Credit score at or above the value.
    MinCreditScore(u16),
}

impl AdjustmentCondition {
    fn holds(&self, features: &ScoringFeatures) -> bool {
        match *self {
            Self::MinYears(years) => features.years_in_business >= years,
            Self::BelowYears(years) => features.years_in_business < years,
            Self::MinRevenue(revenue) => features.annual_revenue.get() >= Decimal::from(revenue),
            Self::MinCreditScore(score) => features.credit_score >= score,
        }
    }
}

/// One additive adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    /// When it applies.
    pub condition: AdjustmentCondition,
    /// Points added (negative to subtract).
    pub delta: i16,
}

impl ScoreAdjustment {
    /// Creates an adjustment.
    #[must_use]
    pub const fn new(condition: AdjustmentCondition, delta: i16) -> Self {
        Self { condition, delta }
    }
}

/// Adjustment table keyed by partner type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartnerAdjustments {
    rules: HashMap<PartnerType, Vec<ScoreAdjustment>>,
}

impl PartnerAdjustments {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard table.
    ///
    /// | Type | Adjustments |
    /// |------|-------------|
    /// | conservative_nbfc | +5 if years ≥ 2 else −10; +5 if revenue ≥ 1cr |
    /// | flexible_nbfc | +5 if years ≥ 1; +10 if credit ≥ 720 |
    /// | bank | −5 if years < 3; +5 if credit ≥ 750 |
    /// | fintech, marketplace | none |
    #[must_use]
    pub fn standard() -> Self {
        use AdjustmentCondition::{BelowYears, MinCreditScore, MinRevenue, MinYears};

        Self::new()
            .with_rules(
                PartnerType::ConservativeNbfc,
                vec![
                    ScoreAdjustment::new(MinYears(2.0), 5),
                    ScoreAdjustment::new(BelowYears(2.0), -10),
                    ScoreAdjustment::new(MinRevenue(10_000_000), 5),
                ],
            )
            .with_rules(
                PartnerType::FlexibleNbfc,
                vec![
                    ScoreAdjustment::new(MinYears(1.0), 5),
                    ScoreAdjustment::new(MinCreditScore(720), 10),
                ],
            )
            .with_rules(
                PartnerType::Bank,
                vec![
                    ScoreAdjustment::new(BelowYears(3.0), -5),
                    ScoreAdjustment::new(MinCreditScore(750), 5),
                ],
            )
    }

    /// Replaces the rules for a partner type.
    #[must_use]
    pub fn with_rules(mut self, partner_type: PartnerType, rules: Vec<ScoreAdjustment>) -> Self {
        self.rules.insert(partner_type, rules);
        self
    }

    /// Rules for a partner type.
    #[must_use]
    pub fn rules_for(&self, partner_type: PartnerType) -> &[ScoreAdjustment] {
        self.rules.get(&partner_type).map_or(&[], Vec::as_slice)
    }

    /// Applies the rules for `partner_type` to `base`, clamped to `[0, 100]`.
    #[must_use]
    pub fn apply(&self, partner_type: PartnerType, features: &ScoringFeatures, base: u8) -> u8 {
        let delta: i16 = self
            .rules_for(partner_type)
            .iter()
            .filter(|rule| rule.condition.holds(features))
            .map(|rule| rule.delta)
            .sum();
        let adjusted = (i16::from(base) + delta).clamp(0, i16::from(MAX_SCORE));
        u8::try_from(adjusted).unwrap_or(MAX_SCORE)
    }

    fn score_partners(
        &self,
        partners: &[PartnerSummary],
        features: &ScoringFeatures,
        base: u8,
    ) -> BTreeMap<PartnerId, u8> {
        partners
            .iter()
            .map(|partner| {
                let score = self.apply(partner.partner_type, features, base);
                debug!(
                    partner_id = %partner.partner_id,
                    partner_type = %partner.partner_type,
                    base,
                    score,
                    "scored partner"
                );
                (partner.partner_id.clone(), score)
            })
            .collect()
    }
}

// ============================================================================
// Strategy trait
// ============================================================================

/// Scoring strategy.
///
/// Implementations must be total: they never fail, whatever the profile
/// holds, because missing values are defaulted upstream.
pub trait CreditScorer: Send + Sync + fmt::Debug {
    /// Scores an application against the given partners.
    ///
    /// `partners` determines which entries appear in the decision's
    /// partner scores.
    fn assess_application(
        &self,
        profile: &BusinessProfile,
        request: &FinancingRequest,
        partners: &[PartnerSummary],
    ) -> CreditDecision;

    /// Strategy name for logs.
    fn name(&self) -> &'static str;
}

// ============================================================================
// Rule-based scorer
// ============================================================================

/// Overall score and explanation from the bucket rules.
#[derive(Debug, Clone, PartialEq)]
struct RuleEvaluation {
    overall: u8,
    factors: Vec<DecisionFactor>,
}

/// Deterministic bucket scorer.
#[derive(Debug, Clone)]
pub struct RuleBasedScorer {
    adjustments: PartnerAdjustments,
}

impl RuleBasedScorer {
    /// Creates a scorer with the standard adjustment table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_adjustments(PartnerAdjustments::standard())
    }

    /// Creates a scorer with a custom adjustment table.
    #[must_use]
    pub fn with_adjustments(adjustments: PartnerAdjustments) -> Self {
        Self { adjustments }
    }

    /// Returns the adjustment table.
    #[inline]
    #[must_use]
    pub fn adjustments(&self) -> &PartnerAdjustments {
        &self.adjustments
    }

    /// Overall score for the given features, without partner adjustments.
    #[must_use]
    pub fn overall_score(features: &ScoringFeatures) -> u8 {
        Self::evaluate(features).overall
    }

    /// Confidence for a profile with `defaulted_fields` missing values.
    #[must_use]
    pub fn confidence(defaulted_fields: u8) -> u8 {
        BASE_CONFIDENCE
            .saturating_sub(defaulted_fields.saturating_mul(CONFIDENCE_PENALTY_PER_DEFAULT))
            .max(MIN_CONFIDENCE)
    }

    fn evaluate(features: &ScoringFeatures) -> RuleEvaluation {
        let age = age_bucket(features.years_in_business);
        let revenue = revenue_bucket(features.annual_revenue);
        let credit = credit_bucket(features.credit_score);
        let ratio = ratio_bucket(features.amount_to_revenue);

        let sum: u16 = [age, revenue, credit, ratio]
            .iter()
            .map(|b| u16::from(b.points))
            .sum();
        let overall = u8::try_from(sum.min(u16::from(MAX_SCORE))).unwrap_or(MAX_SCORE);

        let mut factors = Vec::new();
        if let Some(impact) = age.impact() {
            factors.push(DecisionFactor::new(
                "business_age",
                impact,
                age.max_points,
                format!("{:.1} years in business", features.years_in_business),
            ));
        }
        if let Some(impact) = revenue.impact() {
            factors.push(DecisionFactor::new(
                "annual_revenue",
                impact,
                revenue.max_points,
                format!("annual revenue of {}", features.annual_revenue),
            ));
        }
        if let Some(impact) = credit.impact() {
            factors.push(DecisionFactor::new(
                "credit_score",
                impact,
                credit.max_points,
                format!("credit score of {}", features.credit_score),
            ));
        }
        if let Some(impact) = ratio.impact() {
            let percent = features
                .amount_to_revenue
                .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED));
            let description = match percent {
                Some(p) => format!("requested amount is {}% of annual revenue", p.round_dp(1)),
                None if features.annual_revenue.is_zero() => {
                    "no annual revenue reported to size the request against".to_string()
                }
                None => "requested amount exceeds annual revenue many times over".to_string(),
            };
            factors.push(DecisionFactor::new(
                "amount_to_revenue",
                impact,
                ratio.max_points,
                description,
            ));
        }

        RuleEvaluation { overall, factors }
    }
}

impl Default for RuleBasedScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl CreditScorer for RuleBasedScorer {
    fn assess_application(
        &self,
        profile: &BusinessProfile,
        request: &FinancingRequest,
        partners: &[PartnerSummary],
    ) -> CreditDecision {
        let features = ScoringFeatures::extract(profile, request);
        let evaluation = Self::evaluate(&features);
        let partner_scores =
            self.adjustments
                .score_partners(partners, &features, evaluation.overall);

        CreditDecision::new(
            evaluation.overall,
            profile.reported_credit_score(),
            partner_scores,
            evaluation.factors,
            Self::confidence(features.defaulted_fields),
            ScoreSource::RuleBased,
        )
    }

    fn name(&self) -> &'static str {
        "rule_based"
    }
}

// ============================================================================
// Model-backed scorer
// ============================================================================

/// Output of a credit model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPrediction {
    /// Overall creditworthiness, 0-100.
    pub score: u8,
    /// Model confidence, 0-100.
    pub confidence: u8,
}

/// Credit model failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The model could not be reached or loaded.
    #[error("model unavailable: {0}")]
    Unavailable(String),

    /// The model answered outside its contract.
    #[error("invalid model output: {0}")]
    InvalidOutput(String),
}

/// A trained credit model.
pub trait CreditModel: Send + Sync + fmt::Debug {
    /// Predicts a score for the features.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if no usable prediction is available.
    fn predict(&self, features: &ScoringFeatures) -> Result<ModelPrediction, ModelError>;

    /// Model name for logs.
    fn name(&self) -> &str {
        "credit_model"
    }
}

/// Scorer that asks a [`CreditModel`] for the overall score.
///
/// Factors and partner adjustments come from the rules so decisions stay
/// explainable. Any model error or out-of-range output yields the plain
/// rule-based decision.
#[derive(Debug, Clone)]
pub struct MlScorer {
    model: Arc<dyn CreditModel>,
    rules: RuleBasedScorer,
}

impl MlScorer {
    /// Creates a model scorer with the standard adjustment table.
    #[must_use]
    pub fn new(model: Arc<dyn CreditModel>) -> Self {
        Self::with_rules(model, RuleBasedScorer::new())
    }

    /// Creates a model scorer with a custom rule-based fallback.
    #[must_use]
    pub fn with_rules(model: Arc<dyn CreditModel>, rules: RuleBasedScorer) -> Self {
        Self { model, rules }
    }

    fn predict(&self, features: &ScoringFeatures) -> Result<ModelPrediction, ModelError> {
        let prediction = self.model.predict(features)?;
        if prediction.score > MAX_SCORE || prediction.confidence > MAX_SCORE {
            return Err(ModelError::InvalidOutput(format!(
                "score {} / confidence {} outside 0-100",
                prediction.score, prediction.confidence
            )));
        }
        Ok(prediction)
    }
}

impl CreditScorer for MlScorer {
    fn assess_application(
        &self,
        profile: &BusinessProfile,
        request: &FinancingRequest,
        partners: &[PartnerSummary],
    ) -> CreditDecision {
        let features = ScoringFeatures::extract(profile, request);

        let prediction = match self.predict(&features) {
            Ok(prediction) => prediction,
            Err(e) => {
                warn!(model = self.model.name(), error = %e, "credit model failed, using rules");
                return self.rules.assess_application(profile, request, partners);
            }
        };

        let evaluation = RuleBasedScorer::evaluate(&features);
        let partner_scores =
            self.rules
                .adjustments()
                .score_partners(partners, &features, prediction.score);

        CreditDecision::new(
            prediction.score,
            profile.reported_credit_score(),
            partner_scores,
            evaluation.factors,
            prediction.confidence,
            ScoreSource::MlModel,
        )
    }

    fn name(&self) -> &'static str {
        "ml_model"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{FinancingProduct, Recommendation};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn profile(years: f64, revenue: u64, credit: u16) -> BusinessProfile {
        BusinessProfile::builder()
            .years_in_business(years)
            .annual_revenue(Amount::from_units(revenue))
            .credit_score(credit)
            .build()
    }

    fn request(amount: u64) -> FinancingRequest {
        FinancingRequest::new(Amount::from_units(amount), FinancingProduct::WorkingCapital).unwrap()
    }

    fn summary(id: &str, partner_type: PartnerType) -> PartnerSummary {
        PartnerSummary::new(PartnerId::new(id), partner_type)
    }

    fn assess(years: f64, revenue: u64, credit: u16, amount: u64) -> CreditDecision {
        RuleBasedScorer::new().assess_application(&profile(years, revenue, credit), &request(amount), &[])
    }

    mod buckets {
        use super::*;

        #[test]
        fn age_tiers() {
            assert_eq!(age_bucket(6.0).points, 25);
            assert_eq!(age_bucket(5.0).points, 25);
            assert_eq!(age_bucket(3.5).points, 20);
            assert_eq!(age_bucket(2.0).points, 15);
            assert_eq!(age_bucket(1.0).points, 10);
            assert_eq!(age_bucket(0.5).points, 5);
        }

        #[test]
        fn revenue_tiers() {
            assert_eq!(revenue_bucket(Amount::from_units(60_000_000)).points, 30);
            assert_eq!(revenue_bucket(Amount::from_units(20_000_000)).points, 25);
            assert_eq!(revenue_bucket(Amount::from_units(10_000_000)).points, 20);
            assert_eq!(revenue_bucket(Amount::from_units(5_000_000)).points, 15);
            assert_eq!(revenue_bucket(Amount::from_units(2_000_000)).points, 10);
            assert_eq!(revenue_bucket(Amount::ZERO).points, 5);
        }

        #[test]
        fn credit_tiers() {
            assert_eq!(credit_bucket(800).points, 30);
            assert_eq!(credit_bucket(700).points, 25);
            assert_eq!(credit_bucket(650).points, 20);
            assert_eq!(credit_bucket(600).points, 15);
            assert_eq!(credit_bucket(550).points, 10);
        }

        #[test]
        fn ratio_tiers() {
            let ratio = |s: &str| Some(s.parse::<Decimal>().unwrap());
            assert_eq!(ratio_bucket(ratio("0.1")).points, 15);
            assert_eq!(ratio_bucket(ratio("0.15")).points, 12);
            assert_eq!(ratio_bucket(ratio("0.25")).points, 9);
            assert_eq!(ratio_bucket(ratio("0.5")).points, 6);
            assert_eq!(ratio_bucket(ratio("0.9")).points, 3);
            assert_eq!(ratio_bucket(None).points, 3);
        }

        #[test]
        fn tier_classification() {
            assert!(age_bucket(3.0).is_strength());
            assert!(!age_bucket(2.0).is_strength());
            assert!(!age_bucket(2.0).is_weakness());
            assert!(age_bucket(0.0).is_weakness());
            assert_eq!(age_bucket(0.0).max_points, 25);
        }
    }

    mod rule_based {
        use super::*;

        #[test]
        fn strong_profile_scores_full_marks() {
            let decision = assess(6.0, 60_000_000, 780, 5_000_000);
            assert_eq!(decision.overall_score(), 100);
            assert_eq!(decision.risk_score(), 0);
            assert_eq!(decision.recommendation(), Recommendation::Approve);
        }

        #[test]
        fn one_year_small_business_is_declined() {
            // 10 (age) + 10 (revenue) + 15 (credit) + 9 (ratio 0.25)
            let decision = assess(1.0, 2_000_000, 600, 500_000);
            assert_eq!(decision.overall_score(), 44);
            assert_eq!(decision.risk_score(), 56);
            assert_eq!(decision.recommendation(), Recommendation::Decline);
        }

        #[test]
        fn recommendation_boundaries() {
            // 20 + 20 + 20 + 12
            let decision = assess(3.0, 10_000_000, 650, 1_500_000);
            assert_eq!(decision.overall_score(), 72);
            assert_eq!(decision.recommendation(), Recommendation::Approve);

            // 15 + 15 + 15 + 6
            let decision = assess(2.0, 5_000_000, 600, 2_000_000);
            assert_eq!(decision.overall_score(), 51);
            assert_eq!(decision.recommendation(), Recommendation::Review);
        }

        #[test]
        fn empty_profile_uses_defaults() {
            let decision = RuleBasedScorer::new().assess_application(
                &BusinessProfile::default(),
                &request(100_000),
                &[],
            );
            // 5 (age) + 5 (revenue) + 20 (credit 650) + 3 (no revenue)
            assert_eq!(decision.overall_score(), 33);
            assert_eq!(decision.credit_score(), None);
            assert_eq!(decision.confidence(), 35);
            assert_eq!(decision.source(), ScoreSource::RuleBased);
        }

        #[test]
        fn factors_explain_extremes() {
            let decision = assess(0.5, 60_000_000, 620, 40_000_000);
            let by_name: HashMap<_, _> = decision
                .factors()
                .iter()
                .map(|f| (f.factor.as_str(), f))
                .collect();

            assert_eq!(by_name["business_age"].impact, FactorImpact::Negative);
            assert_eq!(by_name["business_age"].weight, 25);
            assert!(by_name["business_age"].description.contains("0.5"));
            assert_eq!(by_name["annual_revenue"].impact, FactorImpact::Positive);
            assert!(by_name["annual_revenue"].description.contains("60000000"));
            assert_eq!(by_name["amount_to_revenue"].impact, FactorImpact::Negative);
            assert!(!by_name.contains_key("credit_score"));
        }

        #[test]
        fn huge_request_against_tiny_revenue_stays_total() {
            let requested = FinancingRequest::new(
                Amount::from_decimal(Decimal::from_i128_with_scale(10i128.pow(27), 0)).unwrap(),
                FinancingProduct::WorkingCapital,
            )
            .unwrap();
            let decision =
                RuleBasedScorer::new().assess_application(&profile(3.0, 1, 700), &requested, &[]);
            // 20 (age) + 5 (revenue) + 25 (credit) + 3 (ratio floor)
            assert_eq!(decision.overall_score(), 53);

            let ratio = decision
                .factors()
                .iter()
                .find(|f| f.factor == "amount_to_revenue")
                .unwrap();
            assert_eq!(ratio.impact, FactorImpact::Negative);
            assert!(ratio.description.contains("many times over"));
        }

        #[test]
        fn missing_revenue_is_described_as_missing() {
            let decision = assess(3.0, 0, 700, 100_000);
            let ratio = decision
                .factors()
                .iter()
                .find(|f| f.factor == "amount_to_revenue")
                .unwrap();
            assert!(ratio.description.contains("no annual revenue"));
        }

        #[test]
        fn confidence_floor() {
            assert_eq!(RuleBasedScorer::confidence(0), 80);
            assert_eq!(RuleBasedScorer::confidence(1), 65);
            assert_eq!(RuleBasedScorer::confidence(3), 35);
            assert_eq!(RuleBasedScorer::confidence(10), 20);
        }
    }

    mod adjustments {
        use super::*;

        fn partners() -> Vec<PartnerSummary> {
            vec![
                summary("bank", PartnerType::Bank),
                summary("conservative", PartnerType::ConservativeNbfc),
                summary("fintech", PartnerType::Fintech),
                summary("flexible", PartnerType::FlexibleNbfc),
            ]
        }

        #[test]
        fn standard_table() {
            // overall 20 + 20 + 25 + 15 = 80
            let decision = RuleBasedScorer::new().assess_application(
                &profile(4.0, 12_000_000, 730),
                &request(1_000_000),
                &partners(),
            );
            assert_eq!(decision.overall_score(), 80);
            assert_eq!(decision.partner_score(&PartnerId::new("bank")), Some(80));
            assert_eq!(decision.partner_score(&PartnerId::new("conservative")), Some(90));
            assert_eq!(decision.partner_score(&PartnerId::new("fintech")), Some(80));
            assert_eq!(decision.partner_score(&PartnerId::new("flexible")), Some(95));
        }

        #[test]
        fn young_business_is_penalized() {
            // overall 5 + 10 + 30 + 15 = 60
            let decision = RuleBasedScorer::new().assess_application(
                &profile(0.5, 3_000_000, 780),
                &request(100_000),
                &partners(),
            );
            assert_eq!(decision.overall_score(), 60);
            assert_eq!(decision.partner_score(&PartnerId::new("conservative")), Some(50));
            assert_eq!(decision.partner_score(&PartnerId::new("bank")), Some(60));
            assert_eq!(decision.partner_score(&PartnerId::new("flexible")), Some(70));
        }

        #[test]
        fn scores_are_clamped() {
            let features = ScoringFeatures::extract(&profile(6.0, 60_000_000, 800), &request(1));
            let table = PartnerAdjustments::standard();
            assert_eq!(table.apply(PartnerType::FlexibleNbfc, &features, 100), 100);

            let low = ScoringFeatures::extract(&profile(0.0, 0, 500), &request(1));
            assert_eq!(table.apply(PartnerType::ConservativeNbfc, &low, 4), 0);
        }

        #[test]
        fn custom_table() {
            let table = PartnerAdjustments::new().with_rules(
                PartnerType::Marketplace,
                vec![ScoreAdjustment::new(AdjustmentCondition::MinCreditScore(0), 7)],
            );
            let scorer = RuleBasedScorer::with_adjustments(table);
            let decision = scorer.assess_application(
                &profile(4.0, 12_000_000, 730),
                &request(1_000_000),
                &[summary("m", PartnerType::Marketplace), summary("b", PartnerType::Bank)],
            );
            assert_eq!(decision.partner_score(&PartnerId::new("m")), Some(87));
            assert_eq!(decision.partner_score(&PartnerId::new("b")), Some(80));
        }

        #[test]
        fn shortlist_follows_adjusted_scores() {
            let decision = RuleBasedScorer::new().assess_application(
                &profile(4.0, 12_000_000, 730),
                &request(1_000_000),
                &partners(),
            );
            let ids: Vec<_> = decision
                .recommended_partner_ids()
                .iter()
                .map(PartnerId::as_str)
                .collect();
            assert_eq!(ids, vec!["flexible", "conservative", "bank", "fintech"]);
        }
    }

    mod model {
        use super::*;

        #[derive(Debug)]
        struct FixedModel {
            result: Result<ModelPrediction, ModelError>,
            calls: AtomicUsize,
        }

        impl FixedModel {
            fn new(result: Result<ModelPrediction, ModelError>) -> Arc<Self> {
                Arc::new(Self {
                    result,
                    calls: AtomicUsize::new(0),
                })
            }
        }

        impl CreditModel for FixedModel {
            fn predict(&self, _features: &ScoringFeatures) -> Result<ModelPrediction, ModelError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.result.clone()
            }
        }

        #[test]
        fn uses_model_score() {
            let model = FixedModel::new(Ok(ModelPrediction {
                score: 64,
                confidence: 90,
            }));
            let scorer = MlScorer::new(model.clone());
            let decision = scorer.assess_application(
                &profile(4.0, 12_000_000, 730),
                &request(1_000_000),
                &[summary("flexible", PartnerType::FlexibleNbfc)],
            );
            assert_eq!(model.calls.load(Ordering::SeqCst), 1);
            assert_eq!(decision.overall_score(), 64);
            assert_eq!(decision.risk_score(), 36);
            assert_eq!(decision.recommendation(), Recommendation::Review);
            assert_eq!(decision.confidence(), 90);
            assert_eq!(decision.source(), ScoreSource::MlModel);
            assert_eq!(decision.partner_score(&PartnerId::new("flexible")), Some(79));
            assert!(!decision.factors().is_empty());
        }

        #[test]
        fn falls_back_on_error() {
            let model = FixedModel::new(Err(ModelError::Unavailable("offline".to_string())));
            let scorer = MlScorer::new(model);
            let decision = scorer.assess_application(
                &profile(4.0, 12_000_000, 730),
                &request(1_000_000),
                &[],
            );
            assert_eq!(decision.overall_score(), 80);
            assert_eq!(decision.source(), ScoreSource::RuleBased);
        }

        #[test]
        fn falls_back_on_out_of_range_output() {
            let model = FixedModel::new(Ok(ModelPrediction {
                score: 140,
                confidence: 50,
            }));
            let decision = MlScorer::new(model).assess_application(
                &profile(4.0, 12_000_000, 730),
                &request(1_000_000),
                &[],
            );
            assert_eq!(decision.source(), ScoreSource::RuleBased);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn score(years: f64, revenue: u64, credit: u16, amount: u64) -> u8 {
            assess(years, revenue, credit, amount).overall_score()
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn overall_plus_risk_is_100(
                years in 0.0f64..20.0,
                revenue in 0u64..100_000_000,
                credit in 300u16..=900,
                amount in 1u64..50_000_000,
            ) {
                let decision = assess(years, revenue, credit, amount);
                prop_assert_eq!(
                    u16::from(decision.overall_score()) + u16::from(decision.risk_score()),
                    100
                );
                prop_assert!(decision.overall_score() <= 100);
            }

            #[test]
            fn strong_profiles_always_approve(
                years in 5.0f64..30.0,
                revenue in 50_000_000u64..500_000_000,
                credit in 750u16..=900,
                share in 1u64..=10,
            ) {
                let amount = (revenue / 100 * share).max(1);
                let decision = assess(years, revenue, credit, amount);
                prop_assert_eq!(decision.overall_score(), 100);
                prop_assert_eq!(decision.recommendation(), Recommendation::Approve);
            }

            #[test]
            fn monotonic_in_years(
                a in 0.0f64..10.0, b in 0.0f64..10.0,
                revenue in 0u64..100_000_000, credit in 300u16..=900, amount in 1u64..10_000_000,
            ) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(score(lo, revenue, credit, amount) <= score(hi, revenue, credit, amount));
            }

            #[test]
            fn monotonic_in_credit(
                a in 300u16..=900, b in 300u16..=900,
                years in 0.0f64..10.0, revenue in 0u64..100_000_000, amount in 1u64..10_000_000,
            ) {
                let (lo, hi) = (a.min(b), a.max(b));
                prop_assert!(score(years, revenue, lo, amount) <= score(years, revenue, hi, amount));
            }

            #[test]
            fn monotonic_in_requested_amount(
                a in 1u64..50_000_000, b in 1u64..50_000_000,
                years in 0.0f64..10.0, revenue in 1u64..100_000_000, credit in 300u16..=900,
            ) {
                let (small, large) = (a.min(b), a.max(b));
                prop_assert!(score(years, revenue, credit, large) <= score(years, revenue, credit, small));
            }

            #[test]
            fn scorer_is_total_for_extreme_amounts(
                revenue in 1u64..1_000,
                mantissa in 1i128..1_000,
                exponent in 20u32..=25,
            ) {
                let amount = Amount::from_decimal(Decimal::from_i128_with_scale(
                    mantissa * 10i128.pow(exponent),
                    0,
                ))
                .unwrap();
                let requested = FinancingRequest::new(amount, FinancingProduct::WorkingCapital).unwrap();
                let decision = RuleBasedScorer::new()
                    .assess_application(&profile(3.0, revenue, 700), &requested, &[]);
                prop_assert_eq!(
                    u16::from(decision.overall_score()) + u16::from(decision.risk_score()),
                    100
                );
            }

            #[test]
            fn monotonic_in_revenue_bucket(
                years in 0.0f64..10.0, credit in 300u16..=900,
                a in 1u64..100_000_000, b in 1u64..100_000_000,
            ) {
                // Hold the ratio bucket fixed so only the revenue bucket moves.
                let (lo, hi) = (a.min(b), a.max(b));
                let lo_ratio = ratio_bucket(Amount::from_units(1).ratio_to(Amount::from_units(lo)));
                let hi_ratio = ratio_bucket(Amount::from_units(1).ratio_to(Amount::from_units(hi)));
                prop_assume!(lo_ratio == hi_ratio);
                prop_assert!(score(years, lo, credit, 1) <= score(years, hi, credit, 1));
            }
        }
    }
}
