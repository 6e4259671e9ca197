//! The schema abstract domain: a set of column names.
//!
//! Note on naming: the original PrivGuard source calls intersection
//! "disjunct" and union "conjunct" on this lattice, which is backwards from
//! every other use of those words in the policy algebra. We keep the
//! standard `meet`/`join` names with the semantics that actually make this a
//! lattice (meet = intersection, join = union) rather than carry the swapped
//! names forward.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSet(pub BTreeSet<String>);

impl ColumnSet {
    pub fn new(cols: impl IntoIterator<Item = String>) -> Self {
        ColumnSet(cols.into_iter().collect())
    }

    pub fn contains(&self, col: &str) -> bool {
        self.0.contains(col)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_subset_of(&self, other: &ColumnSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn meet(&self, other: &ColumnSet) -> ColumnSet {
        ColumnSet(self.0.intersection(&other.0).cloned().collect())
    }

    pub fn join(&self, other: &ColumnSet) -> ColumnSet {
        ColumnSet(self.0.union(&other.0).cloned().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl fmt::Display for ColumnSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.iter().cloned().collect::<Vec<_>>().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cs(cols: &[&str]) -> ColumnSet {
        ColumnSet::new(cols.iter().map(|s| s.to_string()))
    }

    #[test]
    fn subset_is_set_inclusion() {
        assert!(cs(&["age"]).is_subset_of(&cs(&["age", "gender"])));
        assert!(!cs(&["age", "gender"]).is_subset_of(&cs(&["age"])));
    }

    #[test]
    fn meet_is_intersection_join_is_union() {
        let a = cs(&["age", "gender"]);
        let b = cs(&["age", "race"]);
        assert_eq!(a.meet(&b), cs(&["age"]));
        assert_eq!(a.join(&b), cs(&["age", "gender", "race"]));
    }
}
