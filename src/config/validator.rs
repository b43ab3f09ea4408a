// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Model-level validation report.
//!
//! Collects every problem in a bind model into a structured report:
//! - **Error**: a bind that cannot be encoded (unset kind, unknown key or
//!   controller action). Blocks commits.
//! - **Warning**: binds that shadow each other in the interception engine
//!   (same input key in the same layer). Allows commits.
//!
//! # Example
//! ```
//! use overbind_keymap::config::validator::ConfigValidator;
//! use overbind_keymap::core::{Codec, PersistedRecord};
//!
//! let records = vec![PersistedRecord::new("51", "keyboard", 0x45)];
//! let model = Codec::default().decode(&records).unwrap();
//!
//! let report = ConfigValidator::new().validate_model(&model);
//! assert!(!report.has_errors());
//! ```

use crate::core::{validate_bind, BindId, BindModel, ConflictDetector, ControllerOutputTable, KeyCodeTable};

/// Validation severity level
///
/// Determines how the transaction system should handle the issue:
/// - **Error**: Blocks commit
/// - **Warning**: Allows commit but warns user
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationLevel {
    /// Blocks commit - bind cannot be persisted
    Error,
    /// Allows commit - suspicious but not fatal
    Warning,
}

/// A single validation issue found in the model
#[derive(Clone, Debug)]
pub struct ValidationIssue {
    /// Bind the issue is attached to
    pub bind_id: BindId,
    /// Severity level (Error/Warning)
    pub validation_level: ValidationLevel,
    /// Human-readable description of the issue
    pub message: String,
    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
}

/// Complete validation report for a bind model
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// All validation issues (errors + warnings), in bind order
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Creates a new empty validation report
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the report contains any Error-level issues
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.validation_level == ValidationLevel::Error)
    }

    /// Returns true if the report contains any Warning-level issues
    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.validation_level == ValidationLevel::Warning)
    }

    /// Adds an Error-level issue to the report
    pub fn add_error(&mut self, bind_id: BindId, message: String, suggestion: Option<String>) {
        self.issues.push(ValidationIssue {
            bind_id,
            validation_level: ValidationLevel::Error,
            message,
            suggestion,
        });
    }

    /// Adds a Warning-level issue to the report
    pub fn add_warning(&mut self, bind_id: BindId, message: String, suggestion: Option<String>) {
        self.issues.push(ValidationIssue {
            bind_id,
            validation_level: ValidationLevel::Warning,
            message,
            suggestion,
        });
    }
}

/// Validator combining per-bind resolution checks and conflict detection
pub struct ConfigValidator {
    keys: &'static KeyCodeTable,
    controller: &'static ControllerOutputTable,
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator {
    /// Creates a validator over the shared symbol tables
    pub fn new() -> Self {
        Self {
            keys: KeyCodeTable::global(),
            controller: ControllerOutputTable::global(),
        }
    }

    /// Validates every bind of a model
    ///
    /// 1. Each bind must resolve through the symbol tables (Error)
    /// 2. Binds sharing an input key in one layer are reported (Warning),
    ///    once per bind after the first
    pub fn validate_model(&self, model: &BindModel) -> ValidationReport {
        let mut report = ValidationReport::new();

        for bind in model.list() {
            if let Err(e) = validate_bind(bind, self.keys, self.controller) {
                report.add_error(
                    bind.id,
                    format!("Bind {} cannot be saved: {}", bind.id, e),
                    Some("Pick a key or action for every side of the bind".to_string()),
                );
            }
        }

        for conflict in ConflictDetector::from_binds(model.list()).find_conflicts() {
            let first = conflict.conflicting_binds.first().map(|b| b.id);

            for bind in conflict.conflicting_binds.iter().skip(1) {
                report.add_warning(
                    bind.id,
                    format!(
                        "Bind {} shares input '{}' with bind {} ({} layer)",
                        bind.id,
                        conflict.input,
                        first.unwrap_or(bind.id),
                        conflict.layer
                    ),
                    Some("Only one of these binds will take effect".to_string()),
                );
            }
        }

        report
    }
}
