//! # Suggestion Generator
//!
//! Short guidance for the applicant, bucketed by recommendation and
//! extended with the risk assessor's recommendations.

use crate::domain::entities::RiskAssessment;
use crate::domain::value_objects::Recommendation;

/// Most suggestions returned.
pub const MAX_SUGGESTIONS: usize = 5;

const APPROVE_SUGGESTIONS: &[&str] = &[
    "Compare the top-ranked offers on rate and tenure before accepting",
    "Keep KYC and financial documents ready to speed up disbursal",
];

const REVIEW_SUGGESTIONS: &[&str] = &[
    "Share the last six months of bank statements to strengthen the application",
    "Expect partners to ask for additional documents during review",
];

const DECLINE_SUGGESTIONS: &[&str] = &[
    "Consider applying for a smaller amount",
    "Improve your credit profile before reapplying",
    "Explore secured financing options backed by invoices or collateral",
];

/// Builds applicant guidance.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionGenerator;

impl SuggestionGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Suggestions for the final recommendation, then the risk
    /// recommendations, de-duplicated and capped at [`MAX_SUGGESTIONS`].
    #[must_use]
    pub fn generate(&self, recommendation: Recommendation, risk: &RiskAssessment) -> Vec<String> {
        let bucket = match recommendation {
            Recommendation::Approve => APPROVE_SUGGESTIONS,
            Recommendation::Review => REVIEW_SUGGESTIONS,
            Recommendation::Decline => DECLINE_SUGGESTIONS,
        };

        let mut suggestions: Vec<String> = Vec::with_capacity(MAX_SUGGESTIONS);
        let candidates = bucket
            .iter()
            .map(|s| (*s).to_string())
            .chain(risk.recommendations.iter().cloned());
        for suggestion in candidates {
            if suggestions.len() == MAX_SUGGESTIONS {
                break;
            }
            if !suggestions.contains(&suggestion) {
                suggestions.push(suggestion);
            }
        }
        suggestions
    }
}
