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

//! src/core/types.rs
//!
//! Core type definitions for bind management
//!
//! This module defines the fundamental types used throughout the application:
//! - `BindKind`: What a physical key is remapped into (keyboard, controller, SOCD, mash trigger)
//! - `Bind`: One mapping from a physical key to an output
//! - `Side`: Which end of a bind an edit targets
//! - `BindUpdate`: A single-field edit applied through the bind model
//!
//! Group membership (SOCD pairs, the mash-trigger triple) is deliberately
//! absent from `Bind`. It lives in an index owned by `BindModel` so that the
//! persisted format, which has no group concept, maps onto `Bind` one-to-one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session-stable bind identifier
pub type BindId = u32;

/// Kind of bind
///
/// The kind decides which symbol table resolves the output side and which
/// writer is allowed to modify the bind:
/// - `Keyboard`, `Controller`: ungrouped, edited through `BindModel::update`
/// - `Socd`, `MashTrigger`: grouped, edited through `GroupManager`
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum BindKind {
    /// Key remapped to another key
    Keyboard,
    /// Key remapped to a controller action
    Controller,
    /// One half of a simultaneous-opposite-cardinal-direction pair
    Socd,
    /// One of the three keys forming the mash trigger
    MashTrigger,
}

impl BindKind {
    /// Tag written to `result_type` for kinds whose output is a key code.
    ///
    /// Controller binds take their tag from the controller table instead.
    pub fn record_tag(self) -> Option<&'static str> {
        match self {
            BindKind::Keyboard => Some("keyboard"),
            BindKind::Socd => Some("socd"),
            BindKind::MashTrigger => Some("mash_trigger"),
            BindKind::Controller => None,
        }
    }

    /// Inverse of [`BindKind::record_tag`].
    pub fn from_record_tag(tag: &str) -> Option<Self> {
        match tag {
            "keyboard" => Some(BindKind::Keyboard),
            "socd" => Some(BindKind::Socd),
            "mash_trigger" => Some(BindKind::MashTrigger),
            _ => None,
        }
    }

    /// True for kinds whose members only exist as part of a group
    pub fn is_grouped(self) -> bool {
        matches!(self, BindKind::Socd | BindKind::MashTrigger)
    }
}

impl fmt::Display for BindKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindKind::Keyboard => write!(f, "keyboard"),
            BindKind::Controller => write!(f, "controller"),
            BindKind::Socd => write!(f, "socd"),
            BindKind::MashTrigger => write!(f, "mash_trigger"),
        }
    }
}

/// Which end of a bind an edit targets
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Side {
    /// The physical trigger key
    Input,
    /// The produced key or controller action
    Output,
}

impl Side {
    /// The other side
    pub fn opposite(self) -> Self {
        match self {
            Side::Input => Side::Output,
            Side::Output => Side::Input,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Input => write!(f, "input"),
            Side::Output => write!(f, "output"),
        }
    }
}

/// One mapping from a physical key to an output
///
/// An empty `input` or `output` is an unresolved placeholder: either the user
/// has not picked a value yet, or a persisted code had no table entry. Such a
/// bind is kept in the model but refuses to encode.
///
/// # Example
/// ```ignore
/// let bind = Bind {
///     id: 0,
///     kind: Some(BindKind::Keyboard),
///     input: "Q".to_string(),
///     output: "E".to_string(),
/// };
/// // Pressing Q produces E
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Bind {
    /// Identifier, unique within the session
    pub id: BindId,

    /// Bind kind. `None` only while a freshly created bind awaits a choice.
    pub kind: Option<BindKind>,

    /// Key name of the physical trigger (always a keyboard key)
    pub input: String,

    /// Key name or controller action name, depending on `kind`
    pub output: String,
}

impl Bind {
    /// Creates an empty bind of the given kind
    pub fn new(id: BindId, kind: Option<BindKind>) -> Self {
        Self {
            id,
            kind,
            input: String::new(),
            output: String::new(),
        }
    }

    /// Reads one side of the bind
    pub fn side(&self, side: Side) -> &str {
        match side {
            Side::Input => &self.input,
            Side::Output => &self.output,
        }
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut String {
        match side {
            Side::Input => &mut self.input,
            Side::Output => &mut self.output,
        }
    }
}

impl fmt::Display for Bind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let placeholder = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };

        match self.kind {
            Some(kind) => write!(
                f,
                "#{} {} {} → {}",
                self.id,
                kind,
                placeholder(&self.input),
                placeholder(&self.output)
            ),
            None => write!(f, "#{} (unset) {}", self.id, placeholder(&self.input)),
        }
    }
}

/// A single-field edit for an ungrouped bind
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BindUpdate {
    /// Change the kind. Clears the output, whose table depends on the kind.
    Kind(BindKind),
    /// Replace the physical trigger key
    Input(String),
    /// Replace the produced key or controller action
    Output(String),
}
