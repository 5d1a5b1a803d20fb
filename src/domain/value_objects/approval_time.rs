//! # Approval Time
//!
//! Estimated turnaround for a partner's credit decision.
//!
//! Stored as an hour range and rendered the way applicants read it:
//! ranges up to two days print in hours, longer ones in whole days.
//!
//! ```
//! use financing_prequal::domain::value_objects::ApprovalTime;
//!
//! assert_eq!(ApprovalTime::from_hours(24, 48).to_string(), "24-48 hours");
//! assert_eq!(ApprovalTime::from_days(2, 3).to_string(), "2-3 days");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hours in a day.
const HOURS_PER_DAY: u32 = 24;

/// Upper bound (inclusive) for an approval window to count as fast.
pub const FAST_APPROVAL_MAX_HOURS: u32 = 48;

/// Lower bound (inclusive) for an approval window to count as slow.
pub const SLOW_APPROVAL_MIN_HOURS: u32 = 120;

/// Estimated approval window in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApprovalTime {
    min_hours: u32,
    max_hours: u32,
}

impl ApprovalTime {
    /// Creates a window from an hour range. Bounds are swapped if reversed.
    #[must_use]
    pub const fn from_hours(min_hours: u32, max_hours: u32) -> Self {
        if min_hours <= max_hours {
            Self {
                min_hours,
                max_hours,
            }
        } else {
            Self {
                min_hours: max_hours,
                max_hours: min_hours,
            }
        }
    }

    /// Creates a window from a day range.
    #[must_use]
    pub const fn from_days(min_days: u32, max_days: u32) -> Self {
        Self::from_hours(
            min_days.saturating_mul(HOURS_PER_DAY),
            max_days.saturating_mul(HOURS_PER_DAY),
        )
    }

    /// Window substituted when a partner cannot be probed.
    #[must_use]
    pub const fn fallback() -> Self {
        Self::from_days(2, 3)
    }

    /// Lower bound in hours.
    #[inline]
    #[must_use]
    pub const fn min_hours(&self) -> u32 {
        self.min_hours
    }

    /// Upper bound in hours.
    #[inline]
    #[must_use]
    pub const fn max_hours(&self) -> u32 {
        self.max_hours
    }

    /// True when the whole window fits within two days.
    #[must_use]
    pub const fn is_fast(&self) -> bool {
        self.max_hours <= FAST_APPROVAL_MAX_HOURS
    }

    /// True when even the best case takes five days or more.
    #[must_use]
    pub const fn is_slow(&self) -> bool {
        self.min_hours >= SLOW_APPROVAL_MIN_HOURS
    }
}

impl Default for ApprovalTime {
    fn default() -> Self {
        Self::fallback()
    }
}

impl fmt::Display for ApprovalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole_days = self.min_hours % HOURS_PER_DAY == 0 && self.max_hours % HOURS_PER_DAY == 0;
        if self.max_hours <= FAST_APPROVAL_MAX_HOURS || !whole_days {
            if self.min_hours == self.max_hours {
                write!(f, "{} hours", self.max_hours)
            } else {
                write!(f, "{}-{} hours", self.min_hours, self.max_hours)
            }
        } else {
            let (lo, hi) = (self.min_hours / HOURS_PER_DAY, self.max_hours / HOURS_PER_DAY);
            if lo == hi {
                write!(f, "{hi} days")
            } else {
                write!(f, "{lo}-{hi} days")
            }
        }
    }
}
