//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Only invalid input and misconfiguration surface to callers. Per-partner
//! probe failures are absorbed by the orchestrator and never appear here.

use crate::domain::errors::DomainError;
use crate::infrastructure::partners::PartnerError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Partner or registry error.
    #[error("partner error: {0}")]
    Partner(#[from] PartnerError),

    /// Domain error.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Engine wiring is inconsistent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the caller supplied bad input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Domain(err) => err.is_validation_error(),
            _ => false,
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
