//! Built-in analysis programs the CLI can select by `--example_id`.
//!
//! The real PrivGuard loads an analyst-supplied Python module at runtime,
//! a dynamic-dispatch frontend this analyzer deliberately treats as an
//! external collaborator, out of scope here. In a statically compiled
//! analyzer the equivalent is a small fixed registry of compiled-in
//! programs; each one below runs the exact sequence of surrogate operations
//! its source `.py` counterpart does.

pub mod customer_satisfaction;
pub mod customer_transaction;
pub mod ehr;
