//! # Domain Errors
//!
//! Typed domain error definitions.
//!
//! This module provides the [`DomainError`] enum for representing
//! domain-level errors with numeric error codes.
//!
//! # Error Code Ranges
//!
//! - **1000-1999**: Validation errors
//! - **2000-2999**: Lookup errors
//! - **3000-3999**: Configuration errors
//!
//! # Examples
//!
//! ```
//! use financing_prequal::domain::errors::DomainError;
//!
//! let error = DomainError::InvalidAmount("amount must be positive".to_string());
//! assert_eq!(error.code(), 1001);
//! ```

use thiserror::Error;

/// Domain-level error with numeric error codes.
///
/// # Error Code Ranges
///
/// | Range | Category |
/// |-------|----------|
/// | 1000-1999 | Validation errors |
/// | 2000-2999 | Lookup errors |
/// | 3000-3999 | Configuration errors |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (1000-1999)
    // ========================================================================
    /// Invalid currency amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Invalid business profile.
    #[error("invalid business profile: {0}")]
    InvalidProfile(String),

    /// Invalid enum or tag value.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Generic validation error.
    #[error("validation error: {0}")]
    ValidationError(String),

    // ========================================================================
    // Lookup Errors (2000-2999)
    // ========================================================================
    /// Partner not found.
    #[error("partner not found: {0}")]
    PartnerNotFound(String),

    /// Entity already exists.
    #[error("entity already exists: {0}")]
    AlreadyExists(String),

    // ========================================================================
    // Configuration Errors (3000-3999)
    // ========================================================================
    /// Partner descriptor is incomplete or inconsistent.
    #[error("invalid partner descriptor: {0}")]
    InvalidPartnerDescriptor(String),

    /// Scoring strategy is misconfigured.
    #[error("scorer misconfigured: {0}")]
    ScorerMisconfigured(String),
}

impl DomainError {
    /// Returns the numeric error code.
    ///
    /// # Examples
    ///
    /// ```
    /// use financing_prequal::domain::errors::DomainError;
    ///
    /// assert_eq!(DomainError::InvalidAmount("test".to_string()).code(), 1001);
    /// assert_eq!(DomainError::PartnerNotFound("p1".to_string()).code(), 2001);
    /// ```
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            // Validation errors (1000-1999)
            Self::InvalidAmount(_) => 1001,
            Self::InvalidId(_) => 1002,
            Self::InvalidProfile(_) => 1003,
            Self::InvalidValue(_) => 1004,
            Self::ValidationError(_) => 1099,

            // Lookup errors (2000-2999)
            Self::PartnerNotFound(_) => 2001,
            Self::AlreadyExists(_) => 2002,

            // Configuration errors (3000-3999)
            Self::InvalidPartnerDescriptor(_) => 3001,
            Self::ScorerMisconfigured(_) => 3002,
        }
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.code() {
            1000..=1999 => "validation",
            2000..=2999 => "lookup",
            3000..=3999 => "configuration",
            _ => "unknown",
        }
    }

    /// Returns true if this is a validation error.
    #[inline]
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self.code(), 1000..=1999)
    }

    /// Returns true if this is a configuration error.
    #[inline]
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self.code(), 3000..=3999)
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    mod error_codes {
        use super::*;

        #[test]
        fn validation_errors_in_range() {
            let errors = [
                DomainError::InvalidAmount("test".to_string()),
                DomainError::InvalidId("test".to_string()),
                DomainError::InvalidProfile("test".to_string()),
                DomainError::InvalidValue("test".to_string()),
                DomainError::ValidationError("test".to_string()),
            ];

            for error in errors {
                let code = error.code();
                assert!(
                    (1000..2000).contains(&code),
                    "Expected validation error code 1000-1999, got {}",
                    code
                );
                assert!(error.is_validation_error());
                assert_eq!(error.category(), "validation");
            }
        }

        #[test]
        fn lookup_errors_in_range() {
            for error in [
                DomainError::PartnerNotFound("p".to_string()),
                DomainError::AlreadyExists("p".to_string()),
            ] {
                assert!((2000..3000).contains(&error.code()));
                assert_eq!(error.category(), "lookup");
            }
        }

        #[test]
        fn configuration_errors_in_range() {
            for error in [
                DomainError::InvalidPartnerDescriptor("p".to_string()),
                DomainError::ScorerMisconfigured("ml".to_string()),
            ] {
                assert!(error.is_configuration_error());
                assert_eq!(error.category(), "configuration");
            }
        }
    }

    #[test]
    fn display_includes_detail() {
        let error = DomainError::InvalidAmount("must be positive".to_string());
        assert_eq!(error.to_string(), "invalid amount: must be positive");
    }
}
