//! # Financing Application
//!
//! The request side of a pre-qualification: what is being asked for, and
//! on whose behalf.

use crate::domain::entities::BusinessProfile;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Amount, FinancingProduct, TenantId, Urgency, UserId};
use serde::{Deserialize, Serialize};

/// Financing being requested.
///
/// # Invariants
///
/// - `requested_amount` is strictly positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingRequest {
    requested_amount: Amount,
    financing_type: FinancingProduct,
    purpose: Option<String>,
    urgency: Option<Urgency>,
}

impl FinancingRequest {
    /// Creates a request for the given amount and product.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the amount is zero.
    pub fn new(requested_amount: Amount, financing_type: FinancingProduct) -> DomainResult<Self> {
        if !requested_amount.is_positive() {
            return Err(DomainError::InvalidAmount(
                "requested amount must be positive".to_string(),
            ));
        }
        Ok(Self {
            requested_amount,
            financing_type,
            purpose: None,
            urgency: None,
        })
    }

    /// Sets the stated purpose.
    #[must_use]
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Sets the urgency.
    #[must_use]
    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }

    /// Requested amount.
    #[inline]
    #[must_use]
    pub fn requested_amount(&self) -> Amount {
        self.requested_amount
    }

    /// Requested product.
    #[inline]
    #[must_use]
    pub fn financing_type(&self) -> FinancingProduct {
        self.financing_type
    }

    /// Stated purpose, if any.
    #[must_use]
    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref()
    }

    /// Urgency, if any.
    #[must_use]
    pub fn urgency(&self) -> Option<Urgency> {
        self.urgency
    }
}

/// A complete pre-qualification input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingApplication {
    /// Tenant submitting the application.
    pub tenant_id: TenantId,
    /// User within the tenant.
    pub user_id: UserId,
    /// Applicant business snapshot.
    pub profile: BusinessProfile,
    /// What is being requested.
    pub request: FinancingRequest,
}

impl FinancingApplication {
    /// Creates a new application.
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        user_id: UserId,
        profile: BusinessProfile,
        request: FinancingRequest,
    ) -> Self {
        Self {
            tenant_id,
            user_id,
            profile,
            request,
        }
    }
}
