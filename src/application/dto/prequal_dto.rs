//! # Pre-Qualification DTOs
//!
//! Raw inbound shape of a pre-qualification request.
//!
//! [`PreQualificationRequest`] is what callers deserialize from JSON. It
//! is checked once by [`PreQualificationRequest::validate`] and turned
//! into a [`FinancingApplication`] before anything is scored.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::use_cases::PreQualifyOptions;
use crate::domain::entities::{BusinessProfile, FinancingApplication, FinancingRequest};
use crate::domain::value_objects::{Amount, FinancingProduct, TenantId, Urgency, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request to pre-qualify an applicant.
///
/// # Examples
///
/// ```
/// use financing_prequal::application::dto::PreQualificationRequest;
///
/// let request: PreQualificationRequest = serde_json::from_str(r#"{
///     "tenant_id": "acme",
///     "user_id": "u-42",
///     "profile": { "years_in_business": 4, "annual_revenue": 12000000, "credit_score": 730 },
///     "requested_amount": 1000000,
///     "financing_type": "invoice_financing"
/// }"#).unwrap();
///
/// let (application, options) = request.into_application().unwrap();
/// assert_eq!(application.tenant_id.as_str(), "acme");
/// assert!(options.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreQualificationRequest {
    /// Tenant the applicant belongs to.
    pub tenant_id: String,
    /// Requesting user.
    pub user_id: String,
    /// Business snapshot. Missing numeric fields are defaulted by the scorer.
    #[serde(default)]
    pub profile: BusinessProfile,
    /// Requested amount.
    pub requested_amount: Decimal,
    /// Requested product.
    pub financing_type: FinancingProduct,
    /// Stated purpose.
    #[serde(default)]
    pub purpose: Option<String>,
    /// Urgency.
    #[serde(default)]
    pub urgency: Option<Urgency>,
    /// Per-call options; engine defaults apply when absent.
    #[serde(default)]
    pub options: Option<PreQualifyOptions>,
}

impl PreQualificationRequest {
    /// Creates a request with no purpose, urgency, or options.
    #[must_use]
    pub fn new(
        tenant_id: impl Into<String>,
        user_id: impl Into<String>,
        profile: BusinessProfile,
        requested_amount: Decimal,
        financing_type: FinancingProduct,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
            profile,
            requested_amount,
            financing_type,
            purpose: None,
            urgency: None,
            options: None,
        }
    }

    /// Validates the request fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Validation`] for a blank tenant or user,
    /// a non-positive amount, or out-of-range options.
    pub fn validate(&self) -> ApplicationResult<()> {
        if self.tenant_id.trim().is_empty() {
            return Err(ApplicationError::validation("tenant_id cannot be empty"));
        }
        if self.user_id.trim().is_empty() {
            return Err(ApplicationError::validation("user_id cannot be empty"));
        }
        if self.requested_amount <= Decimal::ZERO {
            return Err(ApplicationError::validation(format!(
                "requested_amount must be positive, got {}",
                self.requested_amount
            )));
        }
        if let Some(options) = &self.options {
            options.validate()?;
        }
        Ok(())
    }

    /// Validates and converts into a domain application plus the
    /// per-call options, if any.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn into_application(
        self,
    ) -> ApplicationResult<(FinancingApplication, Option<PreQualifyOptions>)> {
        self.validate()?;

        let amount = Amount::from_decimal(self.requested_amount)?;
        let mut request = FinancingRequest::new(amount, self.financing_type)?;
        if let Some(purpose) = self.purpose {
            request = request.with_purpose(purpose);
        }
        if let Some(urgency) = self.urgency {
            request = request.with_urgency(urgency);
        }

        let application = FinancingApplication::new(
            TenantId::new(self.tenant_id),
            UserId::new(self.user_id),
            self.profile,
            request,
        );
        Ok((application, self.options))
    }
}
