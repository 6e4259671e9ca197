//! The built-in `(program, data folder)` registry `--example_id` selects
//! from. Mirrors the shape of `analyze.py`'s `program_map`/`data_map`/
//! `lib_map`, collapsed into one table since a compiled program already
//! carries its own library bindings.

use std::path::Path;

use legalease_error::LegaleaseResult;
use legalease_parse::Policy;

use crate::programs;

pub struct Example {
    pub id: u32,
    pub name: &'static str,
    /// Relative to `$PRIVGUARD`.
    pub data_folder: &'static str,
    pub run: fn(&Path) -> LegaleaseResult<Policy>,
}

pub const REGISTRY: &[Example] = &[
    Example {
        id: 0,
        name: "ehr_example",
        data_folder: "demos/data/ehr_example",
        run: programs::ehr::run,
    },
    Example {
        id: 4,
        name: "customer_satisfaction_prediction",
        data_folder: "demos/data/customer_satisfaction_prediction",
        run: programs::customer_satisfaction::run,
    },
    Example {
        id: 5,
        name: "customer_transaction_prediction",
        data_folder: "demos/data/customer_transaction_prediction",
        run: programs::customer_transaction::run,
    },
];

pub fn lookup(id: u32) -> Option<&'static Example> {
    REGISTRY.iter().find(|e| e.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_id_is_unique() {
        let mut ids: Vec<u32> = REGISTRY.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), REGISTRY.len());
    }

    #[test]
    fn lookup_finds_a_registered_example() {
        assert!(lookup(0).is_some());
        assert!(lookup(999).is_none());
    }
}
