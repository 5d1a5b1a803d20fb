//! # Partner Capability Contract
//!
//! The [`FinancingPartner`] trait every partner integration implements.
//!
//! The pre-qualification engine only calls
//! [`check_eligibility`](FinancingPartner::check_eligibility). The other
//! four capabilities serve the application-submission flows and are part
//! of the contract so that a registered partner is usable end to end.

use crate::domain::entities::{
    BusinessProfile, FinancingApplication, PartnerListing, PartnerSummary, PartnerTerms,
};
use crate::domain::value_objects::{
    Amount, ApprovalTime, FinancingProduct, PartnerId, PartnerType,
};
use crate::infrastructure::partners::error::PartnerResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One method of the partner contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerCapability {
    /// Pre-screen an applicant.
    CheckEligibility,
    /// Submit a full application.
    SubmitApplication,
    /// Fetch offers for a submitted application.
    GetOffers,
    /// Poll application status.
    TrackStatus,
    /// Accept partner callbacks.
    HandleWebhook,
}

impl PartnerCapability {
    /// Every capability a partner must provide.
    pub const REQUIRED: &'static [Self] = &[
        Self::CheckEligibility,
        Self::SubmitApplication,
        Self::GetOffers,
        Self::TrackStatus,
        Self::HandleWebhook,
    ];

    /// Method name in the contract.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::CheckEligibility => "check_eligibility",
            Self::SubmitApplication => "submit_application",
            Self::GetOffers => "get_offers",
            Self::TrackStatus => "track_status",
            Self::HandleWebhook => "handle_webhook",
        }
    }
}

impl fmt::Display for PartnerCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Answer to an eligibility probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResponse {
    /// Whether the partner's pre-screen passed.
    pub eligible: bool,
    /// Largest amount the partner would fund for this applicant.
    pub maximum_amount: Option<Amount>,
    /// Indicative annual rate, in percent.
    pub estimated_rate: Option<Decimal>,
    /// Expected approval window.
    pub approval_time: Option<ApprovalTime>,
    /// Partner-supplied remarks.
    pub reasons: Vec<String>,
}

impl EligibilityResponse {
    /// An eligible answer with no estimates.
    #[must_use]
    pub fn eligible() -> Self {
        Self {
            eligible: true,
            maximum_amount: None,
            estimated_rate: None,
            approval_time: None,
            reasons: Vec::new(),
        }
    }

    /// An ineligible answer with a reason.
    #[must_use]
    pub fn ineligible(reason: impl Into<String>) -> Self {
        Self {
            eligible: false,
            reasons: vec![reason.into()],
            ..Self::eligible()
        }
    }

    /// Sets the maximum amount.
    #[must_use]
    pub fn with_maximum_amount(mut self, amount: Amount) -> Self {
        self.maximum_amount = Some(amount);
        self
    }

    /// Sets the estimated rate.
    #[must_use]
    pub fn with_estimated_rate(mut self, rate: Decimal) -> Self {
        self.estimated_rate = Some(rate);
        self
    }

    /// Sets the approval window.
    #[must_use]
    pub fn with_approval_time(mut self, approval_time: ApprovalTime) -> Self {
        self.approval_time = Some(approval_time);
        self
    }
}

/// Partner's acknowledgement of a submitted application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Partner-side reference.
    pub reference: String,
    /// When the partner accepted the submission.
    pub submitted_at: DateTime<Utc>,
}

/// A concrete offer from a partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerOffer {
    /// Partner-side offer ID.
    pub offer_id: String,
    /// Offered amount.
    pub amount: Amount,
    /// Annual rate, in percent.
    pub rate: Decimal,
    /// Tenure in months.
    pub tenure_months: u16,
}

/// Lifecycle of a submitted application on the partner side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Received, not yet reviewed.
    Submitted,
    /// Under credit review.
    UnderReview,
    /// Sanctioned.
    Approved,
    /// Declined.
    Rejected,
    /// Funds released.
    Disbursed,
}

/// Raw callback from a partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Event name.
    pub event: String,
    /// Event body.
    pub body: serde_json::Value,
}

/// What a webhook told us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookOutcome {
    /// Application reference the event concerns.
    pub reference: Option<String>,
    /// New status, if the event carried one.
    pub status: Option<ApplicationStatus>,
}

/// Contract implemented once per financing partner.
///
/// Implementations must be cheap to share (`Arc<dyn FinancingPartner>`)
/// and safe to call concurrently.
#[async_trait]
pub trait FinancingPartner: Send + Sync + fmt::Debug {
    /// Unique partner ID.
    fn partner_id(&self) -> &PartnerId;

    /// Display name.
    fn partner_name(&self) -> &str;

    /// Partner type.
    fn partner_type(&self) -> PartnerType;

    /// Products this partner offers.
    fn supported_products(&self) -> &[FinancingProduct];

    /// Advertised lending terms.
    fn terms(&self) -> PartnerTerms;

    /// Probe timeout this partner needs, in milliseconds. 0 means use the
    /// engine default.
    fn timeout_ms(&self) -> u64 {
        0
    }

    /// Capabilities this integration provides.
    fn capabilities(&self) -> &[PartnerCapability] {
        PartnerCapability::REQUIRED
    }

    /// Returns true if the partner offers `product`.
    fn supports_product(&self, product: FinancingProduct) -> bool {
        self.supported_products().contains(&product)
    }

    /// Identity and type for the credit scorer.
    fn summary(&self) -> PartnerSummary {
        PartnerSummary::new(self.partner_id().clone(), self.partner_type())
    }

    /// Plain-data listing for discovery tooling.
    fn listing(&self) -> PartnerListing {
        PartnerListing {
            partner_id: self.partner_id().clone(),
            partner_name: self.partner_name().to_string(),
            partner_type: self.partner_type(),
            supported_products: self.supported_products().to_vec(),
            terms: self.terms(),
        }
    }

    /// Pre-screens an applicant.
    ///
    /// # Errors
    ///
    /// Returns a [`PartnerError`](super::error::PartnerError) if the partner
    /// cannot be reached or answers with garbage.
    async fn check_eligibility(&self, profile: &BusinessProfile)
    -> PartnerResult<EligibilityResponse>;

    /// Submits a full application.
    ///
    /// # Errors
    ///
    /// Returns an error if the partner refuses the submission.
    async fn submit_application(
        &self,
        application: &FinancingApplication,
    ) -> PartnerResult<SubmissionReceipt>;

    /// Lists offers for a submitted application.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is unknown to the partner.
    async fn get_offers(&self, reference: &str) -> PartnerResult<Vec<PartnerOffer>>;

    /// Reports application status.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is unknown to the partner.
    async fn track_status(&self, reference: &str) -> PartnerResult<ApplicationStatus>;

    /// Interprets a partner callback.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not understood.
    async fn handle_webhook(&self, payload: &WebhookPayload) -> PartnerResult<WebhookOutcome>;
}
