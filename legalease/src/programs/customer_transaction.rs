//! Customer-transaction classifier: drop identifier/label columns from a
//! training table, cross-validate an `lgb.LGBMClassifier`-shaped model across
//! folds, and score predictions on a held-out test table. The fold loop and
//! row-shuffling augmentation in the original script only rearrange which
//! rows a numeric kernel sees, irrelevant to the policy effect, since every
//! fold discharges the same `Aggregation` obligation the same way, so one
//! representative fit/predict stands in for all of them here. Grounded on
//! `examples/program/5_customer_transaction_prediction.py`.

use std::path::Path;

use legalease_core::{Blackbox, Model, PolicyBearing};
use legalease_error::LegaleaseResult;
use legalease_parse::Policy;

pub fn run(data_folder: &Path) -> LegaleaseResult<Policy> {
    let train = legalease_core::read_csv(data_folder.join("train/data.csv"))?;
    let test = legalease_core::read_csv(data_folder.join("test/data.csv"))?;

    let target = train.column("target")?;
    let features = train.drop(&["ID_code".to_string(), "target".to_string()]);

    let mut clf = Model::new();
    let fit_result = clf.fit(&features, &target);
    let oof = clf.predict(&features);
    let test_predictions = clf.predict(&test);

    let score = Blackbox::apply([
        target.policy().clone(),
        oof.policy().clone(),
        test_predictions.policy().clone(),
        fit_result.policy().clone(),
    ]);
    Ok(score.policy)
}
