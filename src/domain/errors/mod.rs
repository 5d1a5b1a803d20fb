//! # Domain Errors
//!
//! Typed error types for domain operations.
//!
//! Error codes are organized by category:
//! - 1000-1999: Validation errors
//! - 2000-2999: Lookup errors
//! - 3000-3999: Configuration errors
//!
//! # Examples
//!
//! ```
//! use financing_prequal::domain::errors::{DomainError, DomainResult};
//!
//! fn validate_amount(amount: f64) -> DomainResult<f64> {
//!     if amount <= 0.0 {
//!         return Err(DomainError::InvalidAmount("amount must be positive".to_string()));
//!     }
//!     Ok(amount)
//! }
//! ```

pub mod domain_error;

pub use domain_error::{DomainError, DomainResult};
