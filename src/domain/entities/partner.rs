//! # Partner Summaries
//!
//! Plain-data views of registered partners, used where the domain needs to
//! reason about partners without holding their live adapters.

use crate::domain::value_objects::{Amount, ApprovalTime, FinancingProduct, PartnerId, PartnerType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity and type of a partner, as seen by the credit scorer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartnerSummary {
    /// Partner ID.
    pub partner_id: PartnerId,
    /// Partner type, selecting score adjustments.
    pub partner_type: PartnerType,
}

impl PartnerSummary {
    /// Creates a summary.
    #[must_use]
    pub fn new(partner_id: PartnerId, partner_type: PartnerType) -> Self {
        Self {
            partner_id,
            partner_type,
        }
    }
}

/// Advertised lending terms, independent of any applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerTerms {
    /// Largest ticket the partner writes.
    pub max_amount: Amount,
    /// Lowest annual rate offered, in percent.
    pub min_rate: Decimal,
    /// Typical approval window.
    pub typical_approval: ApprovalTime,
}

/// Filters for picking a single best partner for a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartnerCriteria {
    /// Partner must be able to fund at least this much.
    pub min_amount: Option<Amount>,
    /// Partner's lowest rate must not exceed this.
    pub max_rate: Option<Decimal>,
    /// Restrict to one partner type.
    pub partner_type: Option<PartnerType>,
    /// Partner's typical approval must finish within this many hours.
    pub max_approval_hours: Option<u32>,
}

impl PartnerCriteria {
    /// Returns true if a partner with the given type and terms qualifies.
    #[must_use]
    pub fn accepts(&self, partner_type: PartnerType, terms: &PartnerTerms) -> bool {
        self.min_amount.is_none_or(|min| terms.max_amount >= min)
            && self.max_rate.is_none_or(|max| terms.min_rate <= max)
            && self.partner_type.is_none_or(|t| t == partner_type)
            && self
                .max_approval_hours
                .is_none_or(|hours| terms.typical_approval.max_hours() <= hours)
    }
}

/// A partner's advertised product coverage, used for discovery listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerListing {
    /// Partner ID.
    pub partner_id: PartnerId,
    /// Display name.
    pub partner_name: String,
    /// Partner type.
    pub partner_type: PartnerType,
    /// Supported products.
    pub supported_products: Vec<FinancingProduct>,
    /// Advertised terms.
    pub terms: PartnerTerms,
}
