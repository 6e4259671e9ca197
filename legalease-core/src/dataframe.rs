//! Abstract tabular surrogate values: `DataFrame`, `Series`, `NdArray`, and
//! `Blackbox`. None of these carry real data, only a policy and just enough
//! shape to let the operation library reason about it.

use legalease_error::{legalease_bail, LegaleaseResult};
use legalease_parse::{ColumnSet, ExtendedValue, FilterOp, Interval, Policy};
use uuid::Uuid;

/// The capability shared by every surrogate value: it carries a residual
/// policy. Arithmetic, merges, and model fitting are all expressed against
/// this trait instead of against any one concrete variant.
pub trait PolicyBearing {
    fn policy(&self) -> &Policy;
}

impl PolicyBearing for DataFrame {
    fn policy(&self) -> &Policy {
        &self.policy
    }
}

impl PolicyBearing for Series {
    fn policy(&self) -> &Policy {
        &self.policy
    }
}

impl PolicyBearing for NdArray {
    fn policy(&self) -> &Policy {
        &self.policy
    }
}

impl PolicyBearing for Blackbox {
    fn policy(&self) -> &Policy {
        &self.policy
    }
}

/// A named-column abstract table.
#[derive(Clone, Debug)]
pub struct DataFrame {
    pub id: Uuid,
    pub schema: ColumnSet,
    pub policy: Policy,
    pub shape: (usize, usize),
}

impl DataFrame {
    pub fn new(schema: ColumnSet, policy: Policy, shape: (usize, usize)) -> Self {
        DataFrame {
            id: Uuid::new_v4(),
            schema,
            policy,
            shape,
        }
    }

    /// `df[col]`: projects the policy onto a single column and returns the
    /// indicator `Series` for it.
    pub fn column(&self, col: &str) -> LegaleaseResult<Series> {
        if !self.schema.contains(col) {
            legalease_bail!(SchemaError: "column '{col}' not found in dataframe");
        }
        Ok(Series {
            column: col.to_string(),
            parent_ref: self.id,
            policy: self.policy.run_project(&[col.to_string()]),
            interval: None,
        })
    }

    /// `df[list[str]]`: projects the policy onto a subset of columns.
    pub fn select(&self, cols: &[String]) -> LegaleaseResult<DataFrame> {
        for c in cols {
            if !self.schema.contains(c) {
                legalease_bail!(SchemaError: "column '{c}' not found in dataframe");
            }
        }
        Ok(DataFrame {
            id: self.id,
            schema: ColumnSet::new(cols.iter().cloned()),
            policy: self.policy.run_project(cols),
            shape: self.shape,
        })
    }

    /// `df.drop(labels)`: removes columns from the schema and re-projects.
    pub fn drop(&self, labels: &[String]) -> DataFrame {
        let kept: Vec<String> = self.schema.iter().filter(|c| !labels.contains(c)).cloned().collect();
        DataFrame {
            id: Uuid::new_v4(),
            schema: ColumnSet::new(kept.clone()),
            policy: self.policy.run_project(&kept),
            shape: self.shape,
        }
    }

    /// `df[series]`: indexes by a same-origin indicator `Series`, running
    /// the filter(s) implied by its interval.
    pub fn index_by_series(&self, series: &Series) -> LegaleaseResult<DataFrame> {
        if series.parent_ref != self.id {
            legalease_bail!(CrossFrameSeries: "series on column '{}' was not derived from this dataframe", series.column);
        }
        let Some(interval) = &series.interval else {
            legalease_bail!(InvariantViolation: "series on column '{}' has no comparison interval to filter by", series.column);
        };
        let mut policy = self.policy.clone();
        if !interval.lower.is_neg_infinity() {
            policy = policy.run_filter(&series.column, interval.lower.clone(), FilterOp::Ge);
        }
        if !interval.upper.is_pos_infinity() {
            policy = policy.run_filter(&series.column, interval.upper.clone(), FilterOp::Le);
        }
        Ok(DataFrame {
            id: self.id,
            schema: self.schema.clone(),
            policy,
            shape: self.shape,
        })
    }

    /// `df.groupby(...)`: grouping is itself the aggregation act, so it
    /// discharges `Privacy(Aggregation)`; but once rows are grouped no other
    /// obligation can be demonstrated anymore (there are no more individual
    /// rows to filter, project, or redact), so anything left over after that
    /// discharge is sealed as permanently unsatisfiable. See DESIGN.md for
    /// why this reads the source's `unSat` call this way rather than
    /// literally (which would make every grouped aggregation unsatisfiable).
    pub fn groupby(&self) -> Blackbox {
        let discharged = self.policy.run_privacy(&legalease_parse::PrivacyTechnique::Aggregation);
        let sealed = discharged.un_sat(|a| !matches!(a, legalease_parse::Attribute::Satisfied));
        Blackbox { policy: sealed }
    }

    /// `df.sum(axis=0)`: column-wise sum discharges the aggregation obligation.
    pub fn sum_axis0(&self) -> DataFrame {
        DataFrame {
            id: Uuid::new_v4(),
            schema: self.schema.clone(),
            policy: self
                .policy
                .run_privacy(&legalease_parse::PrivacyTechnique::Aggregation),
            shape: (self.shape.0, 1),
        }
    }

    /// `df.sum(axis=1)`: row-wise sum produces an opaque scalar per row.
    pub fn sum_axis1(&self) -> Blackbox {
        Blackbox { policy: self.policy.clone() }
    }

    /// `df.merge(other)`: union the schemas, join the policies; the result
    /// must satisfy whatever either input owed.
    pub fn merge(&self, other: &DataFrame) -> DataFrame {
        merge(self, other)
    }
}

/// Top-level `merge(a, b)`: schema union, policy join. Combining two data
/// sources means the result owes both sets of obligations.
pub fn merge(lhs: &DataFrame, rhs: &DataFrame) -> DataFrame {
    DataFrame {
        id: Uuid::new_v4(),
        schema: lhs.schema.join(&rhs.schema),
        policy: lhs.policy.join(&rhs.policy),
        shape: (lhs.schema.join(&rhs.schema).iter().count(), lhs.shape.1.max(rhs.shape.1)),
    }
}

/// One column of a `DataFrame`. When `interval` is set, the Series instead
/// represents the truth-set of a comparison and can be used to filter its
/// parent frame; such a Series cannot be compared again.
#[derive(Clone, Debug)]
pub struct Series {
    pub column: String,
    pub parent_ref: Uuid,
    pub policy: Policy,
    pub interval: Option<Interval>,
}

impl Series {
    fn compare(&self, interval: Interval) -> LegaleaseResult<Series> {
        if self.interval.is_some() {
            legalease_bail!(InvalidReuse: "series on column '{}' already carries a comparison interval", self.column);
        }
        Ok(Series {
            column: self.column.clone(),
            parent_ref: self.parent_ref,
            policy: Policy::bottom(),
            interval: Some(interval),
        })
    }

    pub fn ge(&self, value: ExtendedValue) -> LegaleaseResult<Series> {
        self.compare(Interval::new(value, ExtendedValue::pos_infinity()))
    }

    pub fn le(&self, value: ExtendedValue) -> LegaleaseResult<Series> {
        self.compare(Interval::new(ExtendedValue::neg_infinity(), value))
    }

    pub fn eq_value(&self, value: ExtendedValue) -> LegaleaseResult<Series> {
        self.compare(Interval::new(value.clone(), value))
    }

    /// Any operation not otherwise modeled (`map`, arithmetic with a non-Series
    /// scalar, …) sinks into an opaque `Blackbox` carrying this series' policy.
    pub fn into_blackbox(&self) -> Blackbox {
        Blackbox { policy: self.policy.clone() }
    }
}

/// Shape-less numeric tensor surrogate; behaves like a `Blackbox` but keeps a
/// distinct type so callers can tell a modeled numeric result from a fully
/// opaque one.
#[derive(Clone, Debug)]
pub struct NdArray {
    pub policy: Policy,
}

impl NdArray {
    pub fn new(policy: Policy) -> Self {
        NdArray { policy }
    }

    /// Duplicates the policy reference; no deep copy is needed since `Policy`
    /// is already an immutable, persistent value.
    pub fn copy(&self) -> NdArray {
        self.clone()
    }
}

/// The opaque result of any operation not modeled in detail. A sink: it
/// absorbs every surrogate value passed through it by joining policies.
#[derive(Clone, Debug)]
pub struct Blackbox {
    pub policy: Policy,
}

impl Blackbox {
    /// Joins the policies of every argument that carries one, starting from
    /// the identity policy `[[Satisfied]]` (joining with it is a no-op, so an
    /// operation with zero policy-carrying arguments yields a harmless
    /// `Blackbox`).
    pub fn apply(policies: impl IntoIterator<Item = Policy>) -> Blackbox {
        let joined = policies.into_iter().fold(Policy::top(), |acc, p| acc.join(&p));
        Blackbox { policy: joined }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legalease_parse::parse_policy;

    fn frame(policy_src: &str, cols: &[&str]) -> DataFrame {
        let policy = parse_policy(policy_src).unwrap();
        DataFrame::new(
            ColumnSet::new(cols.iter().map(|c| c.to_string())),
            policy,
            (cols.len(), 10),
        )
    }

    #[test]
    fn column_projects_onto_a_single_series() {
        let df = frame("ALLOW FILTER age >= 18", &["age", "gender"]);
        let series = df.column("age").unwrap();
        assert_eq!(series.parent_ref, df.id);
        assert!(series.interval.is_none());
    }

    #[test]
    fn cross_frame_series_is_rejected() {
        let df1 = frame("ALLOW FILTER age >= 18", &["age"]);
        let df2 = frame("ALLOW FILTER age >= 18", &["age"]);
        let series = df1.column("age").unwrap().ge(ExtendedValue::integer(18)).unwrap();
        assert!(df2.index_by_series(&series).is_err());
    }

    #[test]
    fn reusing_an_indicator_series_fails() {
        let df = frame("ALLOW FILTER age >= 18", &["age"]);
        let series = df.column("age").unwrap().ge(ExtendedValue::integer(18)).unwrap();
        assert!(series.ge(ExtendedValue::integer(20)).is_err());
    }

    #[test]
    fn filtering_by_series_discharges_the_matching_obligation() {
        let df = frame("ALLOW FILTER age >= 18", &["age"]);
        let series = df.column("age").unwrap().ge(ExtendedValue::integer(18)).unwrap();
        let filtered = df.index_by_series(&series).unwrap();
        assert!(filtered.policy.is_sat());
    }

    #[test]
    fn groupby_discharges_aggregation_on_its_own() {
        let df = frame("ALLOW PRIVACY Aggregation", &["race"]);
        let result = df.groupby();
        assert!(result.policy.is_sat());
    }

    #[test]
    fn groupby_seals_obligations_it_cannot_itself_discharge() {
        let df = frame("ALLOW PRIVACY Aggregation AND ROLE MANAGER", &["race"]);
        let result = df.groupby();
        assert!(result.policy.is_unsat());
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[test]
    fn ehr_scenario_resolves_to_sat_end_to_end() {
        init_tracing();
        let df = frame("ALLOW FILTER age >= 18 AND PRIVACY Aggregation", &["age", "race"]);
        let series = df.column("age").unwrap().ge(ExtendedValue::integer(18)).unwrap();
        let filtered = df.index_by_series(&series).unwrap();
        let grouped = filtered.groupby();
        assert!(grouped.policy.is_sat());
    }

    #[test]
    fn blackbox_apply_with_no_policies_is_harmless() {
        let bb = Blackbox::apply(std::iter::empty());
        assert!(bb.policy.is_sat());
    }

    #[test]
    fn blackbox_apply_joins_every_argument() {
        let a = parse_policy("ALLOW ROLE A").unwrap();
        let b = parse_policy("ALLOW ROLE B").unwrap();
        let bb = Blackbox::apply([a, b]);
        assert_eq!(bb.policy.0 .0.len(), 1);
        assert_eq!(bb.policy.0 .0[0].0.len(), 2);
    }
}
