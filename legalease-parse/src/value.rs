//! Extended values and the totally ordered scalar carrier beneath them.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use legalease_error::{legalease_bail, LegaleaseResult};
use serde::{Deserialize, Serialize};

/// A concrete value that can appear in a policy's filter or redaction bounds.
///
/// Cross-variant comparisons fall back to a fixed rank so the type remains
/// totally ordered even though the source data is loosely typed; in practice
/// every comparison that matters is between two values parsed for the same
/// column and so shares a variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarValue {
    Integer(i64),
    Str(String),
    Date(NaiveDate),
}

impl ScalarValue {
    fn rank(&self) -> u8 {
        match self {
            ScalarValue::Integer(_) => 0,
            ScalarValue::Str(_) => 1,
            ScalarValue::Date(_) => 2,
        }
    }
}

impl PartialOrd for ScalarValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScalarValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use ScalarValue::*;
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Str(a), Str(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Integer(v) => write!(f, "{v}"),
            ScalarValue::Str(v) => write!(f, "'{v}'"),
            ScalarValue::Date(v) => write!(f, "{v}"),
        }
    }
}

/// A totally ordered value extended with the sentinels `-inf`/`+inf`.
///
/// `-inf < x < +inf` holds for every non-sentinel `x`; comparison is total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtendedValue {
    NegInfinity,
    Finite(ScalarValue),
    PosInfinity,
}

impl ExtendedValue {
    pub fn finite(v: ScalarValue) -> Self {
        ExtendedValue::Finite(v)
    }

    pub fn integer(v: i64) -> Self {
        ExtendedValue::Finite(ScalarValue::Integer(v))
    }

    pub fn string(v: impl Into<String>) -> Self {
        ExtendedValue::Finite(ScalarValue::Str(v.into()))
    }

    pub fn date(v: NaiveDate) -> Self {
        ExtendedValue::Finite(ScalarValue::Date(v))
    }

    pub fn neg_infinity() -> Self {
        ExtendedValue::NegInfinity
    }

    pub fn pos_infinity() -> Self {
        ExtendedValue::PosInfinity
    }

    pub fn is_neg_infinity(&self) -> bool {
        matches!(self, ExtendedValue::NegInfinity)
    }

    pub fn is_pos_infinity(&self) -> bool {
        matches!(self, ExtendedValue::PosInfinity)
    }

    /// Re-extending a value that is already extended is a modeling error: in
    /// the source material, values were loosely typed and a caller could
    /// accidentally wrap an already-extended value a second time. Since our
    /// types make that state impossible to construct any other way, this
    /// always fails; it exists so callers that thread values through
    /// dynamically-typed boundaries (the parser, mainly) have a single place
    /// to report the mistake instead of silently nesting sentinels.
    pub fn extend(self) -> LegaleaseResult<Self> {
        legalease_bail!(InvariantViolation: "cannot extend a value that is already extended: {self}")
    }
}

impl PartialOrd for ExtendedValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExtendedValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use ExtendedValue::*;
        match (self, other) {
            (NegInfinity, NegInfinity) => Ordering::Equal,
            (PosInfinity, PosInfinity) => Ordering::Equal,
            (NegInfinity, _) => Ordering::Less,
            (_, NegInfinity) => Ordering::Greater,
            (PosInfinity, _) => Ordering::Greater,
            (_, PosInfinity) => Ordering::Less,
            (Finite(a), Finite(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for ExtendedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtendedValue::NegInfinity => write!(f, "-inf"),
            ExtendedValue::PosInfinity => write!(f, "+inf"),
            ExtendedValue::Finite(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_bound_every_finite_value() {
        let v = ExtendedValue::integer(42);
        assert!(ExtendedValue::neg_infinity() < v);
        assert!(v < ExtendedValue::pos_infinity());
    }

    #[test]
    fn infinities_compare_equal_to_themselves() {
        assert_eq!(ExtendedValue::neg_infinity(), ExtendedValue::neg_infinity());
        assert_eq!(ExtendedValue::pos_infinity(), ExtendedValue::pos_infinity());
    }

    #[test]
    fn string_ordering_is_lexicographic() {
        assert!(ExtendedValue::string("M") < ExtendedValue::string("Z"));
    }

    #[test]
    fn double_extension_is_an_invariant_violation() {
        let v = ExtendedValue::integer(1);
        assert!(v.extend().is_err());
    }
}
