//! # Simulated Partner
//!
//! Config-driven, in-process stand-in for a financing partner.
//!
//! [`SimulatedPartner`] implements the full [`FinancingPartner`] contract
//! without network calls. Eligibility answers are deterministic functions
//! of the applicant profile and the partner's configured policy, which
//! makes it suitable for the demo binary, local development, and tests.
//!
//! # Policy
//!
//! - Applicants below `min_years_in_business` or `min_credit_score` are
//!   ineligible.
//! - Maximum amount is annual revenue times `revenue_multiple`, capped at
//!   the advertised `max_amount`.
//! - Rate is `min_rate` plus a spread that widens as the credit score drops.
//!
//! # Examples
//!
//! ```ignore
//! use financing_prequal::infrastructure::partners::{SimulatedPartner, SimulatedPartnerConfig};
//!
//! let config = SimulatedPartnerConfig::new("lendingkart", "Lendingkart")
//!     .with_partner_type(PartnerType::FlexibleNbfc)
//!     .with_products(vec![FinancingProduct::WorkingCapital])
//!     .with_min_rate(dec!(15));
//!
//! let partner = SimulatedPartner::new(config);
//! ```

use crate::domain::entities::{BusinessProfile, FinancingApplication, PartnerTerms};
use crate::domain::value_objects::{
    Amount, ApprovalTime, FinancingProduct, PartnerId, PartnerType,
};
use crate::infrastructure::partners::error::{PartnerError, PartnerResult};
use crate::infrastructure::partners::traits::{
    ApplicationStatus, EligibilityResponse, FinancingPartner, PartnerOffer, SubmissionReceipt,
    WebhookOutcome, WebhookPayload,
};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Default advertised ticket size.
const DEFAULT_MAX_AMOUNT: u64 = 5_000_000;

/// Default minimum rate in percent.
const DEFAULT_MIN_RATE: Decimal = Decimal::from_parts(14, 0, 0, false, 0);

/// Default revenue multiple for the funding limit (0.5x).
const DEFAULT_REVENUE_MULTIPLE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Default offer tenure in months.
const DEFAULT_TENURE_MONTHS: u16 = 12;

/// Rate spread in percent by credit score tier, best tier first.
const CREDIT_SPREADS: &[(u16, Decimal)] = &[
    (750, Decimal::ZERO),
    (700, Decimal::from_parts(15, 0, 0, false, 1)),
    (650, Decimal::from_parts(3, 0, 0, false, 0)),
];

/// Spread below the lowest tier.
const FLOOR_SPREAD: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Configuration for a simulated partner.
///
/// Deserializes from a `[[partners]]` table; omitted fields take the
/// defaults of [`SimulatedPartnerConfig::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedPartnerConfig {
    partner_id: PartnerId,
    partner_name: String,
    partner_type: PartnerType,
    products: Vec<FinancingProduct>,
    max_amount: Amount,
    min_rate: Decimal,
    approval_min_hours: u32,
    approval_max_hours: u32,
    min_years_in_business: f64,
    min_credit_score: u16,
    revenue_multiple: Decimal,
    timeout_ms: u64,
    enabled: bool,
}

impl SimulatedPartnerConfig {
    /// Creates a configuration with default policy.
    #[must_use]
    pub fn new(partner_id: impl Into<String>, partner_name: impl Into<String>) -> Self {
        let approval = ApprovalTime::fallback();
        Self {
            partner_id: PartnerId::new(partner_id),
            partner_name: partner_name.into(),
            partner_type: PartnerType::Fintech,
            products: vec![FinancingProduct::WorkingCapital],
            max_amount: Amount::from_units(DEFAULT_MAX_AMOUNT),
            min_rate: DEFAULT_MIN_RATE,
            approval_min_hours: approval.min_hours(),
            approval_max_hours: approval.max_hours(),
            min_years_in_business: 0.0,
            min_credit_score: 0,
            revenue_multiple: DEFAULT_REVENUE_MULTIPLE,
            timeout_ms: 0,
            enabled: true,
        }
    }

    /// Sets the partner type.
    #[must_use]
    pub fn with_partner_type(mut self, partner_type: PartnerType) -> Self {
        self.partner_type = partner_type;
        self
    }

    /// Sets the supported products.
    #[must_use]
    pub fn with_products(mut self, products: Vec<FinancingProduct>) -> Self {
        self.products = products;
        self
    }

    /// Sets the advertised maximum ticket.
    #[must_use]
    pub fn with_max_amount(mut self, max_amount: Amount) -> Self {
        self.max_amount = max_amount;
        self
    }

    /// Sets the minimum rate in percent.
    #[must_use]
    pub fn with_min_rate(mut self, min_rate: Decimal) -> Self {
        self.min_rate = min_rate;
        self
    }

    /// Sets the typical approval window in hours.
    #[must_use]
    pub fn with_approval_hours(mut self, min_hours: u32, max_hours: u32) -> Self {
        self.approval_min_hours = min_hours;
        self.approval_max_hours = max_hours;
        self
    }

    /// Sets the minimum business age for eligibility.
    #[must_use]
    pub fn with_min_years_in_business(mut self, years: f64) -> Self {
        self.min_years_in_business = years;
        self
    }

    /// Sets the minimum credit score for eligibility.
    #[must_use]
    pub fn with_min_credit_score(mut self, score: u16) -> Self {
        self.min_credit_score = score;
        self
    }

    /// Sets the revenue multiple used for the funding limit.
    #[must_use]
    pub fn with_revenue_multiple(mut self, multiple: Decimal) -> Self {
        self.revenue_multiple = multiple;
        self
    }

    /// Sets the probe timeout in milliseconds (0 = engine default).
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Enables or disables the partner. A disabled partner is unavailable.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns the partner ID.
    #[inline]
    #[must_use]
    pub fn partner_id(&self) -> &PartnerId {
        &self.partner_id
    }

    /// Returns the supported products.
    #[inline]
    #[must_use]
    pub fn products(&self) -> &[FinancingProduct] {
        &self.products
    }

    /// Returns whether the partner answers probes.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Checks the policy values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.partner_id.is_blank() {
            return Err("partner_id is required".to_string());
        }
        if self.products.is_empty() {
            return Err(format!("partner '{}': products must not be empty", self.partner_id));
        }
        if self.approval_min_hours > self.approval_max_hours {
            return Err(format!(
                "partner '{}': approval_min_hours exceeds approval_max_hours",
                self.partner_id
            ));
        }
        if self.min_rate.is_sign_negative() {
            return Err(format!("partner '{}': min_rate must not be negative", self.partner_id));
        }
        if self.revenue_multiple.is_sign_negative() {
            return Err(format!(
                "partner '{}': revenue_multiple must not be negative",
                self.partner_id
            ));
        }
        if !self.min_years_in_business.is_finite() || self.min_years_in_business < 0.0 {
            return Err(format!(
                "partner '{}': min_years_in_business must be a non-negative number",
                self.partner_id
            ));
        }
        Ok(())
    }

    fn approval_time(&self) -> ApprovalTime {
        ApprovalTime::from_hours(self.approval_min_hours, self.approval_max_hours)
    }
}

impl Default for SimulatedPartnerConfig {
    fn default() -> Self {
        Self::new("", "")
    }
}

/// In-process partner driven by [`SimulatedPartnerConfig`].
pub struct SimulatedPartner {
    config: SimulatedPartnerConfig,
}

impl SimulatedPartner {
    /// Creates a simulated partner.
    #[must_use]
    pub fn new(config: SimulatedPartnerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SimulatedPartnerConfig {
        &self.config
    }

    fn ensure_enabled(&self) -> PartnerResult<()> {
        if self.config.enabled {
            Ok(())
        } else {
            Err(PartnerError::unavailable(format!(
                "{} is disabled",
                self.config.partner_name
            )))
        }
    }

    fn rate_for(&self, credit_score: u16) -> Decimal {
        let spread = CREDIT_SPREADS
            .iter()
            .find(|(floor, _)| credit_score >= *floor)
            .map_or(FLOOR_SPREAD, |(_, spread)| *spread);
        self.config.min_rate.saturating_add(spread)
    }

    fn funding_limit(&self, revenue: Amount) -> Amount {
        // Past the representable range the advertised cap applies.
        revenue
            .get()
            .checked_mul(self.config.revenue_multiple)
            .map_or(self.config.max_amount, |by_revenue| {
                Amount::from_decimal(by_revenue)
                    .unwrap_or(Amount::ZERO)
                    .min(self.config.max_amount)
            })
    }

    fn owns_reference(&self, reference: &str) -> bool {
        reference
            .strip_prefix(self.config.partner_id.as_str())
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

impl fmt::Debug for SimulatedPartner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedPartner")
            .field("partner_id", &self.config.partner_id)
            .field("partner_type", &self.config.partner_type)
            .field("enabled", &self.config.enabled)
            .finish()
    }
}

#[async_trait]
impl FinancingPartner for SimulatedPartner {
    fn partner_id(&self) -> &PartnerId {
        &self.config.partner_id
    }

    fn partner_name(&self) -> &str {
        &self.config.partner_name
    }

    fn partner_type(&self) -> PartnerType {
        self.config.partner_type
    }

    fn supported_products(&self) -> &[FinancingProduct] {
        &self.config.products
    }

    fn terms(&self) -> PartnerTerms {
        PartnerTerms {
            max_amount: self.config.max_amount,
            min_rate: self.config.min_rate,
            typical_approval: self.config.approval_time(),
        }
    }

    fn timeout_ms(&self) -> u64 {
        self.config.timeout_ms
    }

    async fn check_eligibility(
        &self,
        profile: &BusinessProfile,
    ) -> PartnerResult<EligibilityResponse> {
        self.ensure_enabled()?;

        let years = profile.years_in_business_or_default();
        let credit_score = profile.credit_score_or_default();

        if years < self.config.min_years_in_business {
            return Ok(EligibilityResponse::ineligible(format!(
                "requires at least {} years in business",
                self.config.min_years_in_business
            )));
        }
        if credit_score < self.config.min_credit_score {
            return Ok(EligibilityResponse::ineligible(format!(
                "requires a credit score of at least {}",
                self.config.min_credit_score
            )));
        }

        let maximum = self.funding_limit(profile.annual_revenue_or_default());
        let rate = self.rate_for(credit_score);
        debug!(
            partner_id = %self.config.partner_id,
            maximum_amount = %maximum,
            estimated_rate = %rate,
            "simulated eligibility check"
        );

        Ok(EligibilityResponse::eligible()
            .with_maximum_amount(maximum)
            .with_estimated_rate(rate)
            .with_approval_time(self.config.approval_time()))
    }

    async fn submit_application(
        &self,
        application: &FinancingApplication,
    ) -> PartnerResult<SubmissionReceipt> {
        self.ensure_enabled()?;

        let product = application.request.financing_type();
        if !self.supports_product(product) {
            return Err(PartnerError::rejected(format!("{product} is not offered")));
        }

        Ok(SubmissionReceipt {
            reference: format!("{}-{}", self.config.partner_id, uuid::Uuid::new_v4()),
            submitted_at: Utc::now(),
        })
    }

    async fn get_offers(&self, reference: &str) -> PartnerResult<Vec<PartnerOffer>> {
        self.ensure_enabled()?;

        if !self.owns_reference(reference) {
            return Err(PartnerError::rejected(format!("unknown reference '{reference}'")));
        }

        Ok(vec![PartnerOffer {
            offer_id: format!("{reference}-offer-1"),
            amount: self.config.max_amount,
            rate: self.config.min_rate,
            tenure_months: DEFAULT_TENURE_MONTHS,
        }])
    }

    async fn track_status(&self, reference: &str) -> PartnerResult<ApplicationStatus> {
        self.ensure_enabled()?;

        if self.owns_reference(reference) {
            Ok(ApplicationStatus::UnderReview)
        } else {
            Err(PartnerError::rejected(format!("unknown reference '{reference}'")))
        }
    }

    async fn handle_webhook(&self, payload: &WebhookPayload) -> PartnerResult<WebhookOutcome> {
        if payload.event.trim().is_empty() {
            return Err(PartnerError::rejected("webhook event is missing"));
        }

        let reference = payload
            .body
            .get("reference")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);
        let status = match payload.body.get("status") {
            Some(value) => Some(
                serde_json::from_value::<ApplicationStatus>(value.clone())
                    .map_err(|e| PartnerError::rejected(format!("invalid status: {e}")))?,
            ),
            None => None,
        };

        Ok(WebhookOutcome { reference, status })
    }
}
