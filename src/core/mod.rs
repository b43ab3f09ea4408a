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

//! src/core/mod.rs
//!
//! Core business logic module
//!
//! This module contains the fundamental data structures and algorithms
//! for bind management, including:
//! - Symbol tables for keyboard keys and controller outputs
//! - The bind model and its group invariants (SOCD pairs, mash trigger)
//! - Bind validation against the symbol tables
//! - The record codec used for persistence
//! - Input conflict detection using HashMap-based O(1) lookup
//!
//! All business logic is isolated from I/O concerns to enable
//! comprehensive unit testing without touching the file system.

pub mod codec;
pub mod conflict;
pub mod gamepad;
pub mod groups;
pub mod keycodes;
pub mod model;
pub mod types;
pub mod validator;

pub use codec::{Codec, CodecError, PersistedRecord};
pub use conflict::{Conflict, ConflictDetector, InputLayer};
pub use gamepad::{ControllerOutputTable, ControllerResult, ControllerResultType};
pub use groups::{GroupManager, MASH_TRIGGER_GROUP_SIZE};
pub use keycodes::{KeyCode, KeyCodeTable};
pub use model::{BindError, BindModel};
pub use types::*;
pub use validator::{validate_bind, ValidationError};

#[cfg(test)]
mod tests;
