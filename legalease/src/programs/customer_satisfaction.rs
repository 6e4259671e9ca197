//! Customer-satisfaction classifier: select a feature subset, split the
//! label out, fit an `xgboost`-shaped classifier, then score it against the
//! training labels. Grounded on
//! `examples/program/4_customer_satisfaction_prediction.py`.

use std::path::Path;

use legalease_core::{Blackbox, Model, PolicyBearing};
use legalease_error::LegaleaseResult;
use legalease_parse::Policy;

pub fn run(data_folder: &Path) -> LegaleaseResult<Policy> {
    let df_train = legalease_core::read_csv(data_folder.join("train/data.csv"))?.select(&[
        "ID".to_string(),
        "var3".to_string(),
        "var15".to_string(),
        "TARGET".to_string(),
    ])?;

    let y_train = df_train.column("TARGET")?;
    let x_train = df_train.drop(&["ID".to_string(), "TARGET".to_string()]);

    let mut clf = Model::new();
    let fit_result = clf.fit(&x_train, &y_train);
    let prediction = clf.predict(&x_train);

    // roc_auc_score(y_train, clf.predict_proba(X_train)) sinks everything
    // that flowed into the score into one opaque result.
    let score = Blackbox::apply([y_train.policy().clone(), prediction.policy().clone(), fit_result.policy().clone()]);
    Ok(score.policy)
}
