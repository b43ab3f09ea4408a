//! Session module tests
//!
//! Contains test suites for the editing session:
//! - Load/save through a record store, dirty tracking
//! - Key capture state machine

#[cfg(test)]
mod capture_tests;
