//! Synthea-style electronic health record pipeline: merge two tables, filter
//! down to consenting adult male patients with one diagnosis, then aggregate
//! by race. Grounded on `examples/program/ehr_example.py` in the original
//! source tree.

use std::path::Path;

use legalease_core::read_csv;
use legalease_error::LegaleaseResult;
use legalease_parse::{ExtendedValue, Policy};

pub fn run(data_folder: &Path) -> LegaleaseResult<Policy> {
    let patients = read_csv(data_folder.join("patients/data.csv"))?;
    let conditions = read_csv(data_folder.join("conditions/data.csv"))?;

    let ehr = patients.merge(&conditions);
    tracing::info!("merged policy: {}", ehr.policy);

    let consent = ehr.column("CONSENT")?.eq_value(ExtendedValue::string("Y"))?;
    let ehr = ehr.index_by_series(&consent)?;

    let description = ehr.column("DESCRIPTION")?.eq_value(ExtendedValue::string("ViralSinusitisDisorder"))?;
    let ehr = ehr.index_by_series(&description)?;

    let gender = ehr.column("GENDER")?.eq_value(ExtendedValue::string("M"))?;
    let ehr = ehr.index_by_series(&gender)?;

    let age = ehr.column("AGE")?.ge(ExtendedValue::integer(18))?;
    let ehr = ehr.index_by_series(&age)?;

    let grouped = ehr.groupby();
    Ok(grouped.policy)
}
