//! # Business Profile
//!
//! Snapshot of the applicant business supplied with each request.
//!
//! Numeric fields are optional. Scoring never fails on a missing or
//! nonsensical value; the `*_or_default` accessors coerce them to the
//! documented defaults instead (0 years, zero revenue, credit score 650).

use crate::domain::value_objects::Amount;
use serde::{Deserialize, Serialize};

/// Credit score assumed when none (or an out-of-range one) is supplied.
pub const DEFAULT_CREDIT_SCORE: u16 = 650;

/// Lowest bureau score accepted as genuine.
pub const MIN_CREDIT_SCORE: u16 = 300;

/// Highest bureau score accepted as genuine.
pub const MAX_CREDIT_SCORE: u16 = 900;

/// Applicant business profile.
///
/// # Examples
///
/// ```
/// use financing_prequal::domain::entities::BusinessProfile;
/// use financing_prequal::domain::value_objects::Amount;
///
/// let profile = BusinessProfile::builder()
///     .years_in_business(4.0)
///     .annual_revenue(Amount::from_units(12_000_000))
///     .credit_score(720)
///     .build();
///
/// assert_eq!(profile.credit_score_or_default(), 720);
/// assert_eq!(BusinessProfile::default().credit_score_or_default(), 650);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessProfile {
    /// Years the business has operated.
    pub years_in_business: Option<f64>,
    /// Annual revenue.
    pub annual_revenue: Option<Amount>,
    /// Bureau credit score.
    pub credit_score: Option<u16>,
    /// Registered business name.
    pub business_name: Option<String>,
    /// Industry or sector.
    pub industry: Option<String>,
    /// Contact email.
    pub contact_email: Option<String>,
    /// Contact phone.
    pub contact_phone: Option<String>,
}

impl BusinessProfile {
    /// Starts building a profile.
    #[must_use]
    pub fn builder() -> BusinessProfileBuilder {
        BusinessProfileBuilder::default()
    }

    /// Years in business, or 0 if missing, negative, or not finite.
    #[must_use]
    pub fn years_in_business_or_default(&self) -> f64 {
        match self.years_in_business {
            Some(years) if years.is_finite() && years >= 0.0 => years,
            _ => 0.0,
        }
    }

    /// Annual revenue, or zero if missing.
    #[must_use]
    pub fn annual_revenue_or_default(&self) -> Amount {
        self.annual_revenue.unwrap_or(Amount::ZERO)
    }

    /// Credit score, or 650 if missing or outside the 300-900 bureau range.
    #[must_use]
    pub fn credit_score_or_default(&self) -> u16 {
        match self.credit_score {
            Some(score) if (MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&score) => score,
            _ => DEFAULT_CREDIT_SCORE,
        }
    }

    /// Credit score as supplied, if it is within the bureau range.
    #[must_use]
    pub fn reported_credit_score(&self) -> Option<u16> {
        self.credit_score
            .filter(|score| (MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(score))
    }

    /// Number of scoring inputs that fell back to their default.
    #[must_use]
    pub fn defaulted_fields(&self) -> u8 {
        let years_missing = !matches!(self.years_in_business, Some(y) if y.is_finite() && y >= 0.0);
        let revenue_missing = self.annual_revenue.is_none();
        let score_missing = self.reported_credit_score().is_none();
        u8::from(years_missing) + u8::from(revenue_missing) + u8::from(score_missing)
    }
}

/// Builder for [`BusinessProfile`].
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct BusinessProfileBuilder {
    profile: BusinessProfile,
}

impl BusinessProfileBuilder {
    /// Sets years in business.
    pub fn years_in_business(mut self, years: f64) -> Self {
        self.profile.years_in_business = Some(years);
        self
    }

    /// Sets annual revenue.
    pub fn annual_revenue(mut self, revenue: Amount) -> Self {
        self.profile.annual_revenue = Some(revenue);
        self
    }

    /// Sets the bureau credit score.
    pub fn credit_score(mut self, score: u16) -> Self {
        self.profile.credit_score = Some(score);
        self
    }

    /// Sets the business name.
    pub fn business_name(mut self, name: impl Into<String>) -> Self {
        self.profile.business_name = Some(name.into());
        self
    }

    /// Sets the industry.
    pub fn industry(mut self, industry: impl Into<String>) -> Self {
        self.profile.industry = Some(industry.into());
        self
    }

    /// Sets the contact email.
    pub fn contact_email(mut self, email: impl Into<String>) -> Self {
        self.profile.contact_email = Some(email.into());
        self
    }

    /// Finishes the profile.
    #[must_use]
    pub fn build(self) -> BusinessProfile {
        self.profile
    }
}
