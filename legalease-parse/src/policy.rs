//! The policy tree: conjunct clauses, DNF, join, and discharge.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, PrivacyTechnique};
use crate::domain::Interval;
use crate::value::ExtendedValue;

/// A list of attributes interpreted as AND.
///
/// Invariant: no attribute in the clause is strictly weaker than another;
/// the stricter one always wins, so the clause never grows redundantly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConjunctClause(pub Vec<Attribute>);

impl ConjunctClause {
    pub fn new(attrs: Vec<Attribute>) -> Self {
        ConjunctClause(attrs)
    }

    /// Appends `attr` unless some attribute already present dominates it.
    /// Does not remove attributes `attr` itself dominates: over-approximating
    /// in that direction is safe and keeps `add` cheap.
    pub fn add(&self, attr: Attribute) -> ConjunctClause {
        if self.0.iter().any(|existing| existing.is_stricter_than(&attr)) {
            return self.clone();
        }
        let mut attrs = self.0.clone();
        attrs.push(attr);
        ConjunctClause(attrs)
    }

    pub fn contains_unsatisfiable(&self) -> bool {
        self.0.iter().any(|a| matches!(a, Attribute::Unsatisfiable))
    }

    /// Drops every `Satisfied` attribute; an empty result collapses to
    /// `[Satisfied]` (the clause is vacuously true).
    pub fn deal_sat(&self) -> ConjunctClause {
        let kept: Vec<Attribute> = self
            .0
            .iter()
            .filter(|a| !matches!(a, Attribute::Satisfied))
            .cloned()
            .collect();
        if kept.is_empty() {
            ConjunctClause(vec![Attribute::Satisfied])
        } else {
            ConjunctClause(kept)
        }
    }

    /// `self` subsumes `other` iff every attribute of `other` has a
    /// stricter-or-equal counterpart in `self`.
    pub fn subsumes(&self, other: &ConjunctClause) -> bool {
        other.0.iter().all(|o| self.0.iter().any(|s| s.is_stricter_than(o)))
    }

    /// Unions with `other` by folding every attribute of `other` through `add`.
    pub fn union(&self, other: &ConjunctClause) -> ConjunctClause {
        other.0.iter().fold(self.clone(), |acc, a| acc.add(a.clone()))
    }
}

impl fmt::Display for ConjunctClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|a| a.to_string()).collect();
        write!(f, "{}", parts.join(" AND "))
    }
}

/// A list of conjunct clauses interpreted as OR.
///
/// Invariant: no clause subsumes another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dnf(pub Vec<ConjunctClause>);

impl Dnf {
    pub fn new(clauses: Vec<ConjunctClause>) -> Self {
        Dnf(clauses)
    }

    pub fn top() -> Self {
        Dnf(vec![ConjunctClause(vec![Attribute::Satisfied])])
    }

    pub fn bottom() -> Self {
        Dnf(vec![ConjunctClause(vec![Attribute::Unsatisfiable])])
    }

    /// Appends `clause` unless an existing clause already subsumes it.
    pub fn add(&self, clause: ConjunctClause) -> Dnf {
        if self.0.iter().any(|existing| existing.subsumes(&clause)) {
            return self.clone();
        }
        let mut clauses = self.0.clone();
        clauses.push(clause);
        Dnf(clauses)
    }

    pub fn deal_sat(&self) -> Dnf {
        let clauses: Vec<ConjunctClause> = self.0.iter().map(|c| c.deal_sat()).collect();
        if clauses.iter().any(|c| c.0 == [Attribute::Satisfied]) {
            Dnf::top()
        } else {
            Dnf(clauses)
        }
    }

    pub fn deal_unsat(&self) -> Dnf {
        let clauses: Vec<ConjunctClause> = self
            .0
            .iter()
            .filter(|c| !c.contains_unsatisfiable())
            .cloned()
            .collect();
        if clauses.is_empty() {
            Dnf::bottom()
        } else {
            Dnf(clauses)
        }
    }

    fn canonicalize(&self) -> Dnf {
        self.deal_sat().deal_unsat()
    }

    fn map_attrs(&self, f: impl Fn(&Attribute) -> Attribute) -> Dnf {
        Dnf(self
            .0
            .iter()
            .map(|c| ConjunctClause(c.0.iter().map(&f).collect()))
            .collect())
    }
}

impl fmt::Display for Dnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| format!("[{c}]")).collect();
        write!(f, "{}", parts.join(" OR "))
    }
}

/// A comparison operator usable in `run_filter`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Le,
    Ge,
}

/// A canonicalized DNF policy: persistent, value-typed, every operation
/// returns a new `Policy`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Policy(pub Dnf);

impl Policy {
    /// The top policy `[[Satisfied]]`: no obligations remain.
    pub fn top() -> Self {
        Policy(Dnf::top())
    }

    /// The bottom policy `[[Unsatisfiable]]`: no way to discharge remains.
    pub fn bottom() -> Self {
        Policy(Dnf::bottom())
    }

    /// Folds every clause through `Dnf::add` before canonicalizing, so a
    /// subsumed clause never survives construction, matching how the
    /// original routes every clause through `DNF.add` on the way in.
    pub fn from_dnf(dnf: Dnf) -> Self {
        let deduped = dnf.0.into_iter().fold(Dnf(Vec::new()), |acc, c| acc.add(c));
        Policy(deduped.canonicalize())
    }

    pub fn is_sat(&self) -> bool {
        self.0 .0 == [ConjunctClause(vec![Attribute::Satisfied])]
    }

    pub fn is_unsat(&self) -> bool {
        self.0 .0 == [ConjunctClause(vec![Attribute::Unsatisfiable])]
    }

    /// Least upper bound: `⋁ᵢ (Cᵢ ∧ (⋁ⱼ Dⱼ))`, expanded as the cross product
    /// of clauses unioned pairwise, folded through `Dnf::add` as they're
    /// assembled so a subsumed clause is dropped immediately rather than
    /// carried through to canonicalization, then canonicalized.
    pub fn join(&self, other: &Policy) -> Policy {
        let mut joined = Dnf(Vec::new());
        for c in &self.0 .0 {
            for d in &other.0 .0 {
                joined = joined.add(c.union(d));
            }
        }
        Policy::from_dnf(joined)
    }

    fn rewrite(&self, f: impl Fn(&Attribute) -> Attribute) -> Policy {
        Policy::from_dnf(self.0.map_attrs(f))
    }

    /// Discharges every `Filter(col, ·)` attribute against one comparison.
    pub fn run_filter(&self, col: &str, value: ExtendedValue, op: FilterOp) -> Policy {
        self.rewrite(|attr| match attr {
            Attribute::Filter { col: c, interval } if c == col => {
                discharge_filter(col, interval, &value, op)
            },
            other => other.clone(),
        })
    }

    /// `Schema`/`Filter`/`Redact` attributes react to a projection onto `cols`.
    pub fn run_project(&self, cols: &[String]) -> Policy {
        self.rewrite(|attr| match attr {
            Attribute::Schema(s) => {
                let kept: std::collections::BTreeSet<String> =
                    s.iter().filter(|c| cols.contains(*c)).cloned().collect();
                if kept.is_empty() {
                    Attribute::Unsatisfiable
                } else if s.iter().all(|c| cols.contains(c)) {
                    Attribute::Satisfied
                } else {
                    Attribute::Schema(crate::domain::ColumnSet(kept))
                }
            },
            Attribute::Filter { col, .. } if !cols.contains(col) => Attribute::Unsatisfiable,
            Attribute::Redact { col, .. } if !cols.contains(col) => Attribute::Satisfied,
            other => other.clone(),
        })
    }

    /// Discharges a matching `Redact(col, ·)` when the applied bounds cover it.
    pub fn run_redact(&self, col: &str, left: Option<i64>, right: Option<i64>) -> Policy {
        self.rewrite(|attr| match attr {
            Attribute::Redact { col: c, left: l, right: r } if c == col => {
                let left_covers = left.is_none() || l.map_or(true, |l| left.unwrap() <= l);
                let right_covers = right.is_none() || r.map_or(true, |r| right.unwrap() >= r);
                if left_covers && right_covers {
                    Attribute::Satisfied
                } else {
                    attr.clone()
                }
            },
            other => other.clone(),
        })
    }

    /// Discharges a matching `Privacy(tech, ·)` when `applied` dominates it.
    pub fn run_privacy(&self, applied: &PrivacyTechnique) -> Policy {
        self.rewrite(|attr| match attr {
            Attribute::Privacy(required) if required.same_kind(applied) => {
                if applied.is_stricter_than(required) {
                    Attribute::Satisfied
                } else {
                    attr.clone()
                }
            },
            other => other.clone(),
        })
    }

    /// Forcibly marks every attribute matching `pred` as `Unsatisfiable`.
    /// Used when an operation (e.g. `groupby`) makes a whole class of
    /// obligations impossible to discharge downstream.
    pub fn un_sat(&self, pred: impl Fn(&Attribute) -> bool) -> Policy {
        self.rewrite(|attr| if pred(attr) { Attribute::Unsatisfiable } else { attr.clone() })
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn discharge_filter(col: &str, interval: &Interval, v: &ExtendedValue, op: FilterOp) -> Attribute {
    let (l, u) = (&interval.lower, &interval.upper);
    let unchanged = || Attribute::Filter { col: col.to_string(), interval: interval.clone() };
    match op {
        FilterOp::Eq => {
            if l <= v && v <= u {
                Attribute::Satisfied
            } else {
                Attribute::Unsatisfiable
            }
        },
        FilterOp::Le => {
            if v <= u {
                if l.is_neg_infinity() {
                    Attribute::Satisfied
                } else if v < l {
                    Attribute::Unsatisfiable
                } else {
                    Attribute::Filter {
                        col: col.to_string(),
                        interval: Interval::with_outer_bounds(
                            l.clone(),
                            ExtendedValue::pos_infinity(),
                            interval.lower_bound.clone(),
                            interval.upper_bound.clone(),
                        ),
                    }
                }
            } else {
                // v > u: the applied filter does not cover this obligation,
                // so the analysis deliberately over-approximates by leaving
                // it unchanged rather than guessing.
                unchanged()
            }
        },
        FilterOp::Ge => {
            if v >= l {
                if u.is_pos_infinity() {
                    Attribute::Satisfied
                } else if v > u {
                    Attribute::Unsatisfiable
                } else {
                    Attribute::Filter {
                        col: col.to_string(),
                        interval: Interval::with_outer_bounds(
                            ExtendedValue::neg_infinity(),
                            u.clone(),
                            interval.lower_bound.clone(),
                            interval.upper_bound.clone(),
                        ),
                    }
                }
            } else {
                unchanged()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(lo: i64, hi: i64) -> Interval {
        Interval::new(ExtendedValue::integer(lo), ExtendedValue::integer(hi))
    }

    fn age_filter(lo: i64, hi: i64) -> ConjunctClause {
        ConjunctClause(vec![Attribute::Filter { col: "age".into(), interval: iv(lo, hi) }])
    }

    #[test]
    fn deal_sat_collapses_empty_clause_to_satisfied() {
        let clause = ConjunctClause(vec![Attribute::Satisfied]);
        assert_eq!(clause.deal_sat(), ConjunctClause(vec![Attribute::Satisfied]));
    }

    #[test]
    fn deal_unsat_drops_offending_clauses() {
        let dnf = Dnf(vec![
            ConjunctClause(vec![Attribute::Unsatisfiable]),
            age_filter(18, 65),
        ]);
        let result = dnf.deal_unsat();
        assert_eq!(result.0.len(), 1);
        assert_eq!(result.0[0], age_filter(18, 65));
    }

    #[test]
    fn deal_unsat_everything_dropped_is_bottom() {
        let dnf = Dnf(vec![ConjunctClause(vec![Attribute::Unsatisfiable])]);
        assert_eq!(dnf.deal_unsat(), Dnf::bottom());
    }

    #[test]
    fn clause_add_is_idempotent_when_dominated() {
        let clause = age_filter(20, 30);
        let weaker = Attribute::Filter { col: "age".into(), interval: iv(0, 100) };
        assert_eq!(clause.add(weaker), clause);
    }

    #[test]
    fn is_sat_and_is_unsat_recognize_top_and_bottom() {
        assert!(Policy::top().is_sat());
        assert!(Policy::bottom().is_unsat());
        assert!(!Policy::top().is_unsat());
    }

    #[test]
    fn run_filter_ge_discharges_fully_open_filter() {
        let interval = Interval::new(ExtendedValue::integer(18), ExtendedValue::pos_infinity());
        let policy = Policy::from_dnf(Dnf(vec![ConjunctClause(vec![Attribute::Filter {
            col: "age".into(),
            interval,
        }])]));
        let result = policy.run_filter("age", ExtendedValue::integer(18), FilterOp::Ge);
        assert!(result.is_sat());
    }

    #[test]
    fn run_filter_le_on_a_lower_value_is_unsat() {
        let interval = iv(18, 90);
        let policy = Policy::from_dnf(Dnf(vec![ConjunctClause(vec![Attribute::Filter {
            col: "age".into(),
            interval,
        }])]));
        let result = policy.run_filter("age", ExtendedValue::integer(17), FilterOp::Le);
        assert!(result.is_unsat());
    }

    #[test]
    fn run_filter_le_above_upper_bound_leaves_attribute_unchanged() {
        let interval = iv(18, 65);
        let policy = Policy::from_dnf(Dnf(vec![ConjunctClause(vec![Attribute::Filter {
            col: "age".into(),
            interval: interval.clone(),
        }])]));
        let result = policy.run_filter("age", ExtendedValue::integer(100), FilterOp::Le);
        assert_eq!(
            result.0 .0[0],
            ConjunctClause(vec![Attribute::Filter { col: "age".into(), interval }])
        );
    }

    #[test]
    fn join_is_commutative_up_to_canonical_form() {
        let p = Policy::from_dnf(Dnf(vec![ConjunctClause(vec![Attribute::Role("A".into())])]));
        let q = Policy::from_dnf(Dnf(vec![ConjunctClause(vec![Attribute::Role("B".into())])]));
        assert_eq!(p.join(&q).0 .0.len(), q.join(&p).0 .0.len());
    }

    #[test]
    fn run_project_drops_required_column() {
        let schema = Attribute::Schema(crate::domain::ColumnSet::new(["age".to_string()]));
        let policy = Policy::from_dnf(Dnf(vec![ConjunctClause(vec![schema])]));
        let result = policy.run_project(&["gender".to_string()]);
        assert!(result.is_unsat());
    }

    #[test]
    fn from_dnf_drops_a_clause_subsumed_by_an_earlier_one() {
        let policy = Policy::from_dnf(Dnf(vec![
            ConjunctClause(vec![Attribute::Role("A".into()), Attribute::Role("B".into())]),
            ConjunctClause(vec![Attribute::Role("A".into())]),
        ]));
        assert_eq!(policy.0 .0.len(), 1);
        assert_eq!(policy.0 .0[0].0.len(), 2);
    }

    #[test]
    fn join_with_top_preserves_a_subsumption_collapsed_clause() {
        // P = (ROLE A AND ROLE B) OR ROLE A collapses to one clause on
        // construction; joining with top (a no-op clause) must not let the
        // subsumed ROLE A clause reappear.
        let p = Policy::from_dnf(Dnf(vec![
            ConjunctClause(vec![Attribute::Role("A".into()), Attribute::Role("B".into())]),
            ConjunctClause(vec![Attribute::Role("A".into())]),
        ]));
        assert_eq!(p.0 .0.len(), 1);
        let joined = p.join(&Policy::top());
        assert_eq!(joined.0 .0.len(), 1);
        assert_eq!(joined.0 .0[0].0.len(), 2);
    }
}
