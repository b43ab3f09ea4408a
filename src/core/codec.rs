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

//! src/core/codec.rs
//!
//! Translation between the bind model and persisted records
//!
//! The interception engine reads a flat list of records:
//! ```json
//! { "keycode": "51", "result_type": "keyboard", "result_value": 69 }
//! ```
//! Records carry no group information. SOCD pairs are recovered by
//! inference on decode, and the mash-trigger group is simply "every
//! mash-trigger bind".
//!
//! # Decode
//! 1. `keycode` (base 16) → input key name; unknown codes become `""`
//! 2. `(result_type, result_value)` found in the controller table → controller bind
//! 3. Otherwise `result_type` must be `keyboard`, `socd` or `mash_trigger`,
//!    and `result_value` → output key name (unknown codes become `""`).
//!    A mash-trigger output always takes the input's value
//! 4. SOCD links are inferred and the mash-trigger group size is checked
//!
//! # Encode
//! Every bind is validated first, then records are produced in list order.
//! A single unresolvable bind fails the whole encode.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::gamepad::ControllerOutputTable;
use crate::core::keycodes::KeyCodeTable;
use crate::core::model::{BindError, BindModel};
use crate::core::types::{Bind, BindId, BindKind};
use crate::core::validator::{validate_bind, ValidationError};

/// One bind as stored on disk and read by the interception engine
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PersistedRecord {
    /// Input key code, lowercase hex without prefix or padding
    pub keycode: String,
    /// `keyboard`, `socd`, `mash_trigger` or a controller tag
    pub result_type: String,
    /// Key code for key-producing tags, action value for controller tags
    pub result_value: i32,
}

impl PersistedRecord {
    /// Builds a record from its parts
    pub fn new(keycode: impl Into<String>, result_type: impl Into<String>, result_value: i32) -> Self {
        Self {
            keycode: keycode.into(),
            result_type: result_type.into(),
            result_value,
        }
    }
}

/// Codec errors
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    /// `result_type` is neither a controller tag nor a key-producing tag
    #[error("Record {index}: unknown bind kind '{result_type}'")]
    UnknownBindKind { index: usize, result_type: String },

    /// A bind cannot be expressed as a record
    #[error("Bind {id} cannot be saved: {source}")]
    UnresolvableBind {
        id: BindId,
        #[source]
        source: ValidationError,
    },

    /// A SOCD record has no matching opposite record
    #[error("SOCD bind {id} (input '{input}') has no partner whose input is '{output}'")]
    UnresolvedSocdLink {
        id: BindId,
        input: String,
        output: String,
    },

    /// Mash-trigger records do not form exactly one group of three
    #[error("Mash-trigger group must have exactly 3 members, found {0}")]
    InvalidMashTriggerGroup(usize),

    /// Any other model error raised while rebuilding groups
    #[error(transparent)]
    Model(BindError),
}

impl From<BindError> for CodecError {
    fn from(error: BindError) -> Self {
        match error {
            BindError::UnresolvedSocdLink { id, input, output } => {
                CodecError::UnresolvedSocdLink { id, input, output }
            }
            BindError::InvalidMashTriggerGroup(count) => CodecError::InvalidMashTriggerGroup(count),
            other => CodecError::Model(other),
        }
    }
}

/// Converts between `BindModel` and persisted records using a pair of symbol tables
#[derive(Clone, Copy, Debug)]
pub struct Codec<'t> {
    keys: &'t KeyCodeTable,
    controller: &'t ControllerOutputTable,
}

impl<'t> Codec<'t> {
    /// Creates a codec over the given tables
    pub fn new(keys: &'t KeyCodeTable, controller: &'t ControllerOutputTable) -> Self {
        Self { keys, controller }
    }

    /// Decodes records into a model with SOCD links restored
    ///
    /// Bind ids are the record positions (0, 1, 2, ...).
    ///
    /// # Errors
    ///
    /// - `CodecError::UnknownBindKind` for an unrecognised `result_type`
    /// - `CodecError::UnresolvedSocdLink` for a SOCD record without partner
    /// - `CodecError::InvalidMashTriggerGroup` unless there are 0 or 3 mash triggers
    pub fn decode(&self, records: &[PersistedRecord]) -> Result<BindModel, CodecError> {
        let binds = records
            .iter()
            .enumerate()
            .map(|(index, record)| self.decode_record(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        let mut model = BindModel::from_binds(binds);
        {
            let mut groups = model.groups();
            groups.infer_socd_links()?;
            groups.validate_mash_trigger_group()?;
        }

        debug!(binds = model.len(), "decoded config records");
        Ok(model)
    }

    fn decode_record(&self, index: usize, record: &PersistedRecord) -> Result<Bind, CodecError> {
        let id = BindId::try_from(index).unwrap_or(BindId::MAX);

        let input = match u32::from_str_radix(&record.keycode, 16) {
            Ok(code) => self.key_name(code, index),
            Err(_) => {
                warn!(index, keycode = %record.keycode, "keycode is not valid hex");
                String::new()
            }
        };

        if let Some(action) = self
            .controller
            .result_to_action(&record.result_type, record.result_value)
        {
            return Ok(Bind {
                id,
                kind: Some(BindKind::Controller),
                input,
                output: action.to_string(),
            });
        }

        if self.controller.is_controller_tag(&record.result_type) {
            warn!(
                index,
                result_type = %record.result_type,
                result_value = record.result_value,
                "controller output has no table entry"
            );
            return Ok(Bind {
                id,
                kind: Some(BindKind::Controller),
                input,
                output: String::new(),
            });
        }

        let kind = BindKind::from_record_tag(&record.result_type).ok_or_else(|| {
            CodecError::UnknownBindKind {
                index,
                result_type: record.result_type.clone(),
            }
        })?;

        let mut output = match u32::try_from(record.result_value) {
            Ok(code) => self.key_name(code, index),
            Err(_) => {
                warn!(index, result_value = record.result_value, "negative key code");
                String::new()
            }
        };

        // Mash triggers only flag their own key
        if kind == BindKind::MashTrigger && output != input {
            warn!(index, %input, %output, "mash-trigger record remaps, using its input as output");
            output = input.clone();
        }

        Ok(Bind {
            id,
            kind: Some(kind),
            input,
            output,
        })
    }

    fn key_name(&self, code: u32, index: usize) -> String {
        match self.keys.code_to_name(code) {
            Some(name) => name.to_string(),
            None => {
                warn!(index, code = %format!("{:#x}", code), "key code has no table entry");
                String::new()
            }
        }
    }

    /// Encodes binds into records, in the order given
    ///
    /// All binds are validated before the first record is built.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::UnresolvableBind` for the first bind whose kind is
    /// unset or whose input/output does not resolve.
    pub fn encode(&self, binds: &[Bind]) -> Result<Vec<PersistedRecord>, CodecError> {
        for bind in binds {
            validate_bind(bind, self.keys, self.controller).map_err(|source| {
                CodecError::UnresolvableBind {
                    id: bind.id,
                    source,
                }
            })?;
        }

        let records = binds
            .iter()
            .map(|bind| self.encode_bind(bind))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(records = records.len(), "encoded binds");
        Ok(records)
    }

    fn encode_bind(&self, bind: &Bind) -> Result<PersistedRecord, CodecError> {
        let unresolvable = |source| CodecError::UnresolvableBind { id: bind.id, source };

        let kind = bind.kind.ok_or_else(|| unresolvable(ValidationError::MissingKind))?;
        let input_code = self
            .keys
            .name_to_code(&bind.input)
            .ok_or_else(|| unresolvable(ValidationError::UnresolvedInput(bind.input.clone())))?;
        let unresolved_output = || {
            unresolvable(ValidationError::UnresolvedOutput {
                kind,
                output: bind.output.clone(),
            })
        };

        let (result_type, result_value) = match kind.record_tag() {
            None => {
                let result = self
                    .controller
                    .action_to_result(&bind.output)
                    .ok_or_else(unresolved_output)?;
                (result.result_type.as_str(), result.result_value)
            }
            Some(tag) => {
                let code = self
                    .keys
                    .name_to_code(&bind.output)
                    .and_then(|code| i32::try_from(code).ok())
                    .ok_or_else(unresolved_output)?;
                (tag, code)
            }
        };

        Ok(PersistedRecord::new(
            format!("{:x}", input_code),
            result_type,
            result_value,
        ))
    }
}

impl Default for Codec<'static> {
    fn default() -> Self {
        Self::new(KeyCodeTable::global(), ControllerOutputTable::global())
    }
}
