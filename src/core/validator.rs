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

//! Bind resolution checks
//!
//! A bind is only persistable when both of its sides resolve through the
//! symbol tables. This module performs that check without touching the
//! model, so the codec can validate every bind before writing any record.
//!
//! # Rules
//! - The kind must be set
//! - `input` must be a key in `KeyCodeTable`
//! - `output` must be a key for keyboard, SOCD and mash-trigger binds, and a
//!   controller action for controller binds
//! - Mash-trigger binds must not remap (`output == input`)

use thiserror::Error;

use crate::core::gamepad::ControllerOutputTable;
use crate::core::keycodes::KeyCodeTable;
use crate::core::types::{Bind, BindKind};

/// Validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// The user never picked a kind for this bind
    #[error("Bind kind is not set")]
    MissingKind,

    /// Input key is empty or not in the key table
    #[error("Input key '{0}' is not a known key")]
    UnresolvedInput(String),

    /// Output is empty or not in the table for the bind's kind
    #[error("Output '{output}' is not a known {kind} target")]
    UnresolvedOutput { kind: BindKind, output: String },

    /// Mash-trigger bind whose output differs from its input
    #[error("Mash-trigger bind remaps '{input}' to '{output}'")]
    MashTriggerRemaps { input: String, output: String },
}

/// Validates a key name against the key table
pub fn validate_key(keys: &KeyCodeTable, name: &str) -> Result<(), ValidationError> {
    match keys.name_to_code(name) {
        Some(_) => Ok(()),
        None => Err(ValidationError::UnresolvedInput(name.to_string())),
    }
}

/// Validates that a bind can be encoded
///
/// Performs all checks listed in the module documentation and reports the
/// first one that fails.
pub fn validate_bind(
    bind: &Bind,
    keys: &KeyCodeTable,
    controller: &ControllerOutputTable,
) -> Result<(), ValidationError> {
    let kind = bind.kind.ok_or(ValidationError::MissingKind)?;

    validate_key(keys, &bind.input)?;

    let output_resolves = match kind {
        BindKind::Controller => controller.action_to_result(&bind.output).is_some(),
        BindKind::Keyboard | BindKind::Socd | BindKind::MashTrigger => {
            keys.name_to_code(&bind.output).is_some()
        }
    };

    if !output_resolves {
        return Err(ValidationError::UnresolvedOutput {
            kind,
            output: bind.output.clone(),
        });
    }

    if kind == BindKind::MashTrigger && bind.output != bind.input {
        return Err(ValidationError::MashTriggerRemaps {
            input: bind.input.clone(),
            output: bind.output.clone(),
        });
    }

    Ok(())
}
