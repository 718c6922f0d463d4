//! Closed integer intervals for cumulative values.

use serde::{Deserialize, Serialize};

/// A closed interval `[min, max]` of feasible cumulative values.
///
/// # Examples
///
/// ```
/// use u_cvrptw::dimension::CumulRange;
///
/// let a = CumulRange::new(0, 10);
/// let b = CumulRange::new(5, 20);
/// assert_eq!(a.intersect(b), CumulRange::new(5, 10));
/// assert!(CumulRange::new(3, 1).is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CumulRange {
    /// Smallest feasible value.
    pub min: i64,
    /// Largest feasible value.
    pub max: i64,
}

impl CumulRange {
    /// Upper bound used for "unbounded"; leaves headroom for additions.
    pub const UNBOUNDED_MAX: i64 = i64::MAX / 4;

    /// `[0, UNBOUNDED_MAX]`.
    pub const UNBOUNDED: Self = Self {
        min: 0,
        max: Self::UNBOUNDED_MAX,
    };

    /// Creates `[min, max]`; may be empty.
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// A single value.
    pub const fn point(value: i64) -> Self {
        Self::new(value, value)
    }

    /// Returns `true` if no value satisfies the range.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns `true` if `value` lies in the range.
    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Intersection of two ranges; may be empty.
    #[inline]
    pub fn intersect(self, other: Self) -> Self {
        Self::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// Width `max - min` (0 for a point).
    pub fn width(&self) -> i64 {
        self.max.saturating_sub(self.min)
    }
}

impl Default for CumulRange {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}
