//! # Domain Enums
//!
//! Closed vocabularies used across scoring, matching, and results.
//!
//! Every enum serializes as `snake_case`, displays as the same tag, and
//! parses back from it via [`FromStr`], returning [`ParseEnumError`] for
//! unknown tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an unknown enum tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    /// Name of the enum being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

macro_rules! tagged_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the canonical tag.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $tag),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
                    $($tag => Ok(Self::$variant),)+
                    _ => Err(ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

tagged_enum! {
    /// Kind of financing institution.
    ///
    /// The partner type selects the score adjustment rules applied on top
    /// of the base credit score.
    PartnerType, "partner type" {
        /// Scheduled commercial bank.
        Bank => "bank",
        /// Non-bank lender with strict vintage and revenue requirements.
        ConservativeNbfc => "conservative_nbfc",
        /// Non-bank lender favouring young businesses with good credit.
        FlexibleNbfc => "flexible_nbfc",
        /// Technology-led lender.
        Fintech => "fintech",
        /// Multi-lender marketplace.
        Marketplace => "marketplace",
    }
}

tagged_enum! {
    /// Financing product a partner may offer.
    FinancingProduct, "financing product" {
        /// Advance against outstanding invoices.
        InvoiceFinancing => "invoice_financing",
        /// Short-term working capital loan.
        WorkingCapital => "working_capital",
        /// Revolving credit line.
        CreditLine => "credit_line",
        /// Asset-backed equipment loan.
        EquipmentFinancing => "equipment_financing",
        /// Fixed-tenor term loan.
        TermLoan => "term_loan",
        /// Buyer-led supply chain finance.
        SupplyChainFinance => "supply_chain_finance",
    }
}

tagged_enum! {
    /// How quickly the applicant needs funds.
    Urgency, "urgency" {
        /// No particular rush.
        Low => "low",
        /// Within a couple of weeks.
        Medium => "medium",
        /// As soon as possible.
        High => "high",
    }
}

tagged_enum! {
    /// Overall credit recommendation.
    Recommendation, "recommendation" {
        /// Likely to be approved.
        Approve => "approve",
        /// Needs manual review.
        Review => "review",
        /// Unlikely to be approved.
        Decline => "decline",
    }
}

tagged_enum! {
    /// Direction in which a factor moves the decision.
    FactorImpact, "factor impact" {
        /// Improves the decision.
        Positive => "positive",
        /// Worsens the decision.
        Negative => "negative",
        /// No material effect.
        Neutral => "neutral",
    }
}

tagged_enum! {
    /// Aggregate risk level.
    RiskLevel, "risk level" {
        /// Low risk.
        Low => "low",
        /// Medium risk.
        Medium => "medium",
        /// High risk.
        High => "high",
        /// Very high risk.
        VeryHigh => "very_high",
    }
}

tagged_enum! {
    /// Which scoring strategy produced a decision.
    ScoreSource, "score source" {
        /// Machine-learning model.
        MlModel => "ml_model",
        /// Deterministic rule-based scorer.
        RuleBased => "rule_based",
    }
}

impl Recommendation {
    /// Maps an overall score (0-100) to a recommendation.
    ///
    /// `>= 70` approves, `>= 50` reviews, anything lower declines.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        if score >= 70 {
            Self::Approve
        } else if score >= 50 {
            Self::Review
        } else {
            Self::Decline
        }
    }
}

impl RiskLevel {
    /// Maps an average creditworthiness score (0-100) to a risk level.
    #[must_use]
    pub fn from_average(score: f64) -> Self {
        if score >= 75.0 {
            Self::Low
        } else if score >= 60.0 {
            Self::Medium
        } else if score >= 40.0 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_tags() {
        for product in FinancingProduct::ALL {
            assert_eq!(product.as_str().parse::<FinancingProduct>().unwrap(), *product);
        }
        for partner_type in PartnerType::ALL {
            assert_eq!(partner_type.to_string().parse::<PartnerType>().unwrap(), *partner_type);
        }
    }

    #[test]
    fn parse_is_lenient_on_case_and_separators() {
        assert_eq!(
            "Invoice-Financing".parse::<FinancingProduct>().unwrap(),
            FinancingProduct::InvoiceFinancing
        );
        assert_eq!("VERY HIGH".parse::<RiskLevel>().unwrap(), RiskLevel::VeryHigh);
    }

    #[test]
    fn parse_unknown_tag() {
        let err = "crypto_loan".parse::<FinancingProduct>().unwrap_err();
        assert_eq!(err.kind, "financing product");
        assert!(err.to_string().contains("crypto_loan"));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ScoreSource::RuleBased).unwrap();
        assert_eq!(json, "\"rule_based\"");
    }

    #[test]
    fn recommendation_thresholds() {
        assert_eq!(Recommendation::from_score(100), Recommendation::Approve);
        assert_eq!(Recommendation::from_score(70), Recommendation::Approve);
        assert_eq!(Recommendation::from_score(69), Recommendation::Review);
        assert_eq!(Recommendation::from_score(50), Recommendation::Review);
        assert_eq!(Recommendation::from_score(49), Recommendation::Decline);
    }

    #[test]
    fn risk_level_thresholds() {
        assert_eq!(RiskLevel::from_average(75.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_average(74.9), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_average(60.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_average(40.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_average(39.9), RiskLevel::VeryHigh);
    }
}
