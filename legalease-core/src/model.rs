//! The modeled surrogate for `lightgbm`/`xgboost`/`sklearn`-shaped estimators:
//! `fit` and `predict` are policy effects only, no numeric kernel runs. A
//! single training call followed by any number of predictions against the
//! fitted policy.

use legalease_parse::{Policy, PrivacyTechnique};

use crate::dataframe::{Blackbox, NdArray, PolicyBearing};

/// A model surrogate. Training discharges the Aggregation privacy obligation
/// (fitting a model over a dataset is itself an aggregate computation);
/// every subsequent `predict` owes the join of the training policy and
/// whatever policy the new input carries.
#[derive(Clone, Debug, Default)]
pub struct Model {
    train_policy: Option<Policy>,
}

impl Model {
    pub fn new() -> Self {
        Model { train_policy: None }
    }

    /// `model.fit(X, y)` → `Blackbox((X.policy ⊔ y.policy).run_privacy(Aggregation))`.
    /// Remembers the discharged policy so later `predict` calls can join
    /// against it.
    pub fn fit(&mut self, x: &impl PolicyBearing, y: &impl PolicyBearing) -> Blackbox {
        let joined = x.policy().join(y.policy());
        let discharged = joined.run_privacy(&PrivacyTechnique::Aggregation);
        self.train_policy = Some(discharged.clone());
        Blackbox { policy: discharged }
    }

    /// `model.predict(X)` → `NdArray(self.train_policy ⊔ X.policy)`. Calling
    /// `predict` before `fit` is a modeling error in the analyzed program, not
    /// in the analyzer: an un-fitted model owes nothing yet, so the top
    /// policy stands in for "no training obligation recorded".
    pub fn predict(&self, x: &impl PolicyBearing) -> NdArray {
        let train = self.train_policy.clone().unwrap_or_else(Policy::top);
        NdArray::new(train.join(x.policy()))
    }
}
