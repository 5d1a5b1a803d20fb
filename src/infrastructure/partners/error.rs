//! # Partner Errors
//!
//! Failures raised by partner adapters and the partner registry.

use crate::domain::value_objects::PartnerId;
use thiserror::Error;

/// Error from a partner adapter or the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartnerError {
    /// No partner registered under this ID.
    #[error("partner '{}' not found; available partners: [{}]", partner_id, available.join(", "))]
    NotFound {
        /// The requested ID.
        partner_id: PartnerId,
        /// IDs currently registered, sorted.
        available: Vec<String>,
    },

    /// Descriptor failed validation at registration time.
    #[error("partner '{}' rejected: {}", partner_id, errors.join("; "))]
    InvalidDescriptor {
        /// Offending partner ID (may be blank).
        partner_id: PartnerId,
        /// Every validation failure found.
        errors: Vec<String>,
    },

    /// Partner service is unreachable or unhealthy.
    #[error("partner unavailable: {message}")]
    Unavailable {
        /// Detail.
        message: String,
    },

    /// Partner did not answer in time.
    #[error("partner timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// Partner answered with a business rejection or malformed payload.
    #[error("partner rejected request: {message}")]
    Rejected {
        /// Detail.
        message: String,
    },

    /// Partner does not implement the requested capability.
    #[error("capability not supported: {capability}")]
    NotSupported {
        /// Capability name.
        capability: String,
    },

    /// Unexpected adapter failure.
    #[error("partner internal error: {message}")]
    Internal {
        /// Detail.
        message: String,
    },
}

impl PartnerError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a rejected error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true for failures of an eligibility probe that the
    /// orchestrator absorbs with fallback estimates.
    #[must_use]
    pub fn is_probe_failure(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. }
                | Self::Timeout { .. }
                | Self::Rejected { .. }
                | Self::NotSupported { .. }
                | Self::Internal { .. }
        )
    }
}

/// Result type for partner operations.
pub type PartnerResult<T> = Result<T, PartnerError>;
