//! Config module tests
//!
//! Contains test suites for file handling:
//! - ConfigManager (opening, defaults, backups)
//! - ConfigTransaction (commit, validation, rollback)
//! - Record stores (file and in-memory)
//! - Model validation reports
