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

//! Key capture
//!
//! Assigning a key to a bind is a two-step interaction: the user arms
//! capture on one side of a bind, then presses a key. Until a key event
//! resolves to a known key nothing in the model changes, so capture can be
//! cancelled at any point by returning to `Idle`.
//!
//! Key events carry two spellings, like DOM keyboard events: the physical
//! `code` ("KeyQ", "ArrowLeft") and the produced `key` ("q"). `code` is
//! tried first, then `key`.

use tracing::debug;

use crate::core::{BindError, BindId, BindKind, BindModel, BindUpdate, KeyCodeTable, Side};

/// A key press reported by the front end
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyEvent {
    /// Physical key identifier ("KeyQ", "ArrowLeft", "Digit1")
    pub code: String,
    /// Produced key value ("q", "ArrowLeft", "1")
    pub key: String,
}

impl KeyEvent {
    /// Builds an event from both spellings
    pub fn new(code: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            key: key.into(),
        }
    }
}

/// Capture state
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CaptureState {
    /// Not waiting for a key
    #[default]
    Idle,
    /// Waiting for a key to assign to `side` of `bind`
    Listening { bind: BindId, side: Side },
}

/// Key capture state machine
#[derive(Debug, Default)]
pub struct KeyCapture {
    state: CaptureState,
}

impl KeyCapture {
    /// Creates an idle capture
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// True while waiting for a key
    pub fn is_listening(&self) -> bool {
        matches!(self.state, CaptureState::Listening { .. })
    }

    /// Arms capture for one side of a bind
    ///
    /// Replaces any capture already in progress.
    ///
    /// # Errors
    ///
    /// - `BindError::UnknownBindId` if no bind has this id
    /// - `BindError::WrongKind` when targeting the output of a controller
    ///   bind, which takes an action name rather than a key
    pub fn begin(&mut self, model: &BindModel, bind: BindId, side: Side) -> Result<(), BindError> {
        let target = model.get(bind)?;

        if side == Side::Output && target.kind == Some(BindKind::Controller) {
            return Err(BindError::WrongKind {
                id: bind,
                expected: BindKind::Keyboard,
            });
        }

        debug!(bind, %side, "listening for key");
        self.state = CaptureState::Listening { bind, side };
        Ok(())
    }

    /// Abandons capture without touching the model
    pub fn cancel(&mut self) {
        if self.is_listening() {
            debug!("capture cancelled");
        }
        self.state = CaptureState::Idle;
    }

    /// Resolves an event to a key name, trying `code` before `key`
    pub fn resolve(keys: &KeyCodeTable, event: &KeyEvent) -> Option<&'static str> {
        keys.normalize(&event.code).or_else(|| keys.normalize(&event.key))
    }

    /// Feeds a key event to the capture
    ///
    /// When idle, or when the event does not resolve to a known key, the
    /// event is ignored and `Ok(None)` is returned (capture keeps listening
    /// in the latter case). Otherwise the key is written to the armed side,
    /// capture returns to idle and the edited bind id is returned.
    ///
    /// # Errors
    ///
    /// Propagates model errors (e.g. the bind was removed while listening).
    /// Capture returns to idle either way.
    pub fn handle_key(
        &mut self,
        model: &mut BindModel,
        keys: &KeyCodeTable,
        event: &KeyEvent,
    ) -> Result<Option<BindId>, BindError> {
        let CaptureState::Listening { bind, side } = self.state else {
            return Ok(None);
        };

        let Some(name) = Self::resolve(keys, event) else {
            debug!(code = %event.code, key = %event.key, "ignoring unknown key");
            return Ok(None);
        };

        self.state = CaptureState::Idle;
        assign(model, bind, side, name)?;
        Ok(Some(bind))
    }

    /// Clears the armed side of the bind and returns to idle
    ///
    /// Returns `Ok(None)` when idle.
    ///
    /// # Errors
    ///
    /// Propagates model errors. Capture returns to idle either way.
    pub fn unbind(&mut self, model: &mut BindModel) -> Result<Option<BindId>, BindError> {
        let CaptureState::Listening { bind, side } = self.state else {
            return Ok(None);
        };

        self.state = CaptureState::Idle;
        assign(model, bind, side, "")?;
        Ok(Some(bind))
    }
}

/// Writes a key to one side of a bind through the writer its kind requires
fn assign(model: &mut BindModel, bind: BindId, side: Side, value: &str) -> Result<(), BindError> {
    match model.get(bind)?.kind {
        Some(BindKind::Socd) => model.groups().set_socd_side(bind, side, value),
        Some(BindKind::MashTrigger) => model.groups().set_mash_trigger_input(bind, value),
        Some(BindKind::Keyboard | BindKind::Controller) | None => {
            let update = match side {
                Side::Input => BindUpdate::Input(value.to_string()),
                Side::Output => BindUpdate::Output(value.to_string()),
            };
            model.update(bind, update)
        }
    }
}
