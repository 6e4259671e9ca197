//! The interval abstract domain over extended values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::ExtendedValue;

/// A closed interval `[lo, hi]` over extended values.
///
/// `lower_bound`/`upper_bound` optionally record the original declared range
/// a `Filter` attribute was parsed from, so pretty-printing and diagnostics
/// can refer back to it even after the working bounds have been tightened by
/// discharge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: ExtendedValue,
    pub upper: ExtendedValue,
    pub lower_bound: Option<ExtendedValue>,
    pub upper_bound: Option<ExtendedValue>,
}

impl Interval {
    pub fn new(lower: ExtendedValue, upper: ExtendedValue) -> Self {
        Interval {
            lower,
            upper,
            lower_bound: None,
            upper_bound: None,
        }
    }

    pub fn with_outer_bounds(
        lower: ExtendedValue,
        upper: ExtendedValue,
        lower_bound: Option<ExtendedValue>,
        upper_bound: Option<ExtendedValue>,
    ) -> Self {
        Interval {
            lower,
            upper,
            lower_bound,
            upper_bound,
        }
    }

    /// `self ⊑ other` iff `other.lower <= self.lower && self.upper <= other.upper`.
    pub fn is_subset_of(&self, other: &Interval) -> bool {
        other.lower <= self.lower && self.upper <= other.upper
    }

    /// Greatest lower bound: narrows to the overlap of both intervals.
    pub fn meet(&self, other: &Interval) -> Interval {
        Interval::with_outer_bounds(
            self.lower.clone().max(other.lower.clone()),
            self.upper.clone().min(other.upper.clone()),
            self.lower_bound.clone(),
            self.upper_bound.clone(),
        )
    }

    /// Least upper bound: widens to cover both intervals.
    pub fn join(&self, other: &Interval) -> Interval {
        Interval::with_outer_bounds(
            self.lower.clone().min(other.lower.clone()),
            self.upper.clone().max(other.upper.clone()),
            self.lower_bound.clone(),
            self.upper_bound.clone(),
        )
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(lo: i64, hi: i64) -> Interval {
        Interval::new(ExtendedValue::integer(lo), ExtendedValue::integer(hi))
    }

    #[test]
    fn subset_requires_narrower_bounds() {
        assert!(iv(10, 20).is_subset_of(&iv(0, 30)));
        assert!(!iv(0, 30).is_subset_of(&iv(10, 20)));
    }

    #[test]
    fn meet_is_a_lower_bound_of_both_operands() {
        let a = iv(0, 10);
        let b = iv(5, 20);
        let m = a.meet(&b);
        assert!(m.is_subset_of(&a));
        assert!(m.is_subset_of(&b));
        assert_eq!(m, iv(5, 10));
    }

    #[test]
    fn join_contains_both_operands() {
        let a = iv(0, 10);
        let b = iv(5, 20);
        let j = a.join(&b);
        assert!(a.is_subset_of(&j));
        assert!(b.is_subset_of(&j));
        assert_eq!(j, iv(0, 20));
    }

    #[test]
    fn unbounded_sides_participate_correctly() {
        let unbounded = Interval::new(ExtendedValue::neg_infinity(), ExtendedValue::integer(90));
        let bounded = iv(18, 65);
        assert!(bounded.is_subset_of(&unbounded));
        assert!(!unbounded.is_subset_of(&bounded));
    }
}
