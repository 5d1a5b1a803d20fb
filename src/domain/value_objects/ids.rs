//! # Identity Value Objects
//!
//! Type-safe identity wrappers for domain identifiers.
//!
//! This module provides newtype wrappers for all domain identifiers,
//! ensuring type safety and preventing accidental mixing of different ID types.
//!
//! ## UUID-based Identifiers
//!
//! - [`AssessmentId`] - Pre-qualification assessment identifier
//!
//! ## String-based Identifiers
//!
//! - [`PartnerId`] - Financing partner identifier
//! - [`TenantId`] - Tenant (organisation) identifier
//! - [`UserId`] - User identifier within a tenant

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Pre-qualification assessment identifier.
///
/// A UUID-based identifier stamped on every freshly computed
/// pre-qualification result. Cached results keep the identifier they
/// were created with.
///
/// # Examples
///
/// ```
/// use financing_prequal::domain::value_objects::ids::AssessmentId;
///
/// let id = AssessmentId::new_v4();
/// println!("Assessment: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(Uuid);

impl AssessmentId {
    /// Creates a new assessment ID from an existing UUID.
    #[inline]
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a new random assessment ID using UUID v4.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for AssessmentId {
    #[inline]
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Declares a string-backed identifier newtype.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from a string.
            #[inline]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is empty or whitespace only.
            #[inline]
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// Consumes the identifier and returns the inner String.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Financing partner identifier.
    ///
    /// Partner IDs are unique within a registry and order lexically, which
    /// is what ranking tie-breaks rely on.
    ///
    /// # Examples
    ///
    /// ```
    /// use financing_prequal::domain::value_objects::ids::PartnerId;
    ///
    /// let partner_id = PartnerId::new("lendingkart");
    /// assert_eq!(partner_id.as_str(), "lendingkart");
    /// ```
    PartnerId
}

string_id! {
    /// Tenant identifier.
    TenantId
}

string_id! {
    /// User identifier.
    UserId
}
