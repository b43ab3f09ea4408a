//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Symbol table tests (key codes, controller outputs)
//! - Bind model and group invariant tests
//! - Record codec tests
//! - Conflict detection tests
//! - Bind validation tests

#[cfg(test)]
mod groups_tests;
#[cfg(test)]
mod model_tests;
#[cfg(test)]
mod symbol_table_tests;
