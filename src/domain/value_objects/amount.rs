//! # Amount Value Object
//!
//! Non-negative currency amount backed by [`Decimal`].
//!
//! # Examples
//!
//! ```
//! use financing_prequal::domain::value_objects::amount::Amount;
//!
//! let revenue = Amount::new(2_000_000.0).unwrap();
//! let requested = Amount::new(500_000.0).unwrap();
//!
//! let ratio = requested.ratio_to(revenue).unwrap();
//! assert_eq!(ratio.to_string(), "0.25");
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated currency amount.
///
/// # Invariants
///
/// - Amount is always >= 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Zero amount constant.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new amount from an f64 value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the value is negative or not
    /// representable (NaN, infinite).
    pub fn new(value: f64) -> DomainResult<Self> {
        let decimal = Decimal::try_from(value)
            .map_err(|_| DomainError::InvalidAmount(format!("{value} is not a finite number")))?;
        Self::from_decimal(decimal)
    }

    /// Creates a new amount from a Decimal value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the value is negative.
    pub fn from_decimal(value: Decimal) -> DomainResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::InvalidAmount(format!(
                "{value} cannot be negative"
            )));
        }
        Ok(Self(value.normalize()))
    }

    /// Creates an amount from whole currency units.
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns the inner Decimal value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive.
    #[inline]
    #[must_use]
    pub fn is_positive(self) -> bool {
        !self.0.is_zero()
    }

    /// Returns `self / other`, or `None` when `other` is zero.
    #[must_use]
    pub fn ratio_to(self, other: Self) -> Option<Decimal> {
        self.0.checked_div(other.0).map(|r| r.normalize())
    }

    /// Returns the amount as an f64, saturating to zero if unrepresentable.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}
