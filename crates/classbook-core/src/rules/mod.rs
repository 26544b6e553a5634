//! Store-wide consistency checks
//!
//! `invariants` exposes one finder per rule; `validation::validate_store`
//! runs them all and fails on the first finding. Used by tests after every
//! cascade and by the storage crate before accepting a loaded document.

pub mod invariants;
pub mod validation;

pub use validation::validate_store;
