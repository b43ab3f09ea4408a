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

//! src/session/mod.rs
//!
//! Editing session
//!
//! `Session` owns the bind model, the key capture and the record store, and
//! is the single writer of the model. Loading decodes into a fresh model and
//! only swaps it in once decoding has succeeded; saving encodes without
//! touching the model, so a failed save leaves everything as it was,
//! including the dirty flag.

pub mod capture;

pub use capture::{CaptureState, KeyCapture, KeyEvent};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, ConfigValidator, RecordStore, ValidationReport};
use crate::core::{
    Bind, BindError, BindId, BindKind, BindModel, BindUpdate, Codec, CodecError, Conflict,
    ConflictDetector, KeyCodeTable, Side, MASH_TRIGGER_GROUP_SIZE,
};

/// Errors surfaced by session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(#[from] ConfigError),
}

/// Editing session over a record store
#[derive(Debug)]
pub struct Session<S: RecordStore> {
    store: S,
    model: BindModel,
    capture: KeyCapture,
    dirty: bool,
}

impl<S: RecordStore> Session<S> {
    /// Creates a session with an empty model. Call `load` to read the store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            model: BindModel::new(),
            capture: KeyCapture::new(),
            dirty: false,
        }
    }

    /// Creates a session and loads the store into it
    ///
    /// # Errors
    ///
    /// See [`Session::load`].
    pub fn open(store: S) -> Result<Self, SessionError> {
        let mut session = Self::new(store);
        session.load()?;
        Ok(session)
    }

    /// Replaces the model with the decoded store contents
    ///
    /// Cancels any pending capture and clears the dirty flag.
    ///
    /// # Errors
    ///
    /// - `SessionError::Store` if the store cannot be read
    /// - `SessionError::Codec` if the records do not form a valid model
    ///
    /// On error the current model is kept.
    pub fn load(&mut self) -> Result<(), SessionError> {
        let records = self.store.load_records()?;
        let model = Codec::default().decode(&records)?;

        self.model = model;
        self.capture.cancel();
        self.dirty = false;

        debug!(binds = self.model.len(), "session loaded");
        Ok(())
    }

    /// Encodes the model and writes it to the store
    ///
    /// # Errors
    ///
    /// - `SessionError::Codec` if a bind cannot be encoded
    /// - `SessionError::Store` if the store rejects the write
    ///
    /// On error neither the model nor the dirty flag change.
    pub fn save(&mut self) -> Result<(), SessionError> {
        let records = Codec::default().encode(self.model.list())?;
        self.store.save_records(&records)?;
        self.dirty = false;

        info!(records = records.len(), "session saved");
        Ok(())
    }

    /// True if the model changed since the last load or save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read access to the model
    pub fn model(&self) -> &BindModel {
        &self.model
    }

    /// Binds in list order
    pub fn binds(&self) -> &[Bind] {
        self.model.list()
    }

    /// Read access to the store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // Single-bind edits

    /// See [`BindModel::create`]
    pub fn create(&mut self, kind: Option<BindKind>) -> Result<Bind, SessionError> {
        let bind = self.model.create(kind)?;
        self.dirty = true;
        Ok(bind)
    }

    /// See [`BindModel::update`]
    pub fn update(&mut self, id: BindId, update: BindUpdate) -> Result<(), SessionError> {
        self.model.update(id, update)?;
        self.dirty = true;
        Ok(())
    }

    /// Removes a bind, taking the rest of its group with it when grouped
    ///
    /// Returns the removed binds ordered by id.
    pub fn remove(&mut self, id: BindId) -> Result<Vec<Bind>, SessionError> {
        let grouped = self.model.get(id)?.kind.is_some_and(BindKind::is_grouped);

        let removed = if grouped {
            self.model.groups().remove_group_member(id)?
        } else {
            vec![self.model.remove(id)?]
        };

        if let CaptureState::Listening { bind, .. } = self.capture.state() {
            if removed.iter().any(|b| b.id == bind) {
                self.capture.cancel();
            }
        }

        self.dirty = true;
        Ok(removed)
    }

    // Group edits

    /// See [`GroupManager::add_socd_pair`](crate::core::GroupManager::add_socd_pair)
    pub fn add_socd_pair(&mut self) -> (Bind, Bind) {
        let pair = self.model.groups().add_socd_pair();
        self.dirty = true;
        pair
    }

    /// See [`GroupManager::add_mash_trigger_group`](crate::core::GroupManager::add_mash_trigger_group)
    pub fn add_mash_trigger_group(&mut self) -> Result<[Bind; MASH_TRIGGER_GROUP_SIZE], SessionError> {
        let members = self.model.groups().add_mash_trigger_group()?;
        self.dirty = true;
        Ok(members)
    }

    /// True when a mash-trigger group can still be added
    pub fn can_add_mash_trigger_group(&self) -> bool {
        self.model.mash_trigger_members().is_empty()
    }

    /// See [`GroupManager::set_socd_side`](crate::core::GroupManager::set_socd_side)
    pub fn set_socd_side(&mut self, id: BindId, side: Side, value: &str) -> Result<(), SessionError> {
        self.model.groups().set_socd_side(id, side, value)?;
        self.dirty = true;
        Ok(())
    }

    /// See [`GroupManager::set_mash_trigger_input`](crate::core::GroupManager::set_mash_trigger_input)
    pub fn set_mash_trigger_input(&mut self, id: BindId, value: &str) -> Result<(), SessionError> {
        self.model.groups().set_mash_trigger_input(id, value)?;
        self.dirty = true;
        Ok(())
    }

    // Key capture

    /// Current capture state
    pub fn capture_state(&self) -> CaptureState {
        self.capture.state()
    }

    /// Arms key capture for one side of a bind
    pub fn begin_capture(&mut self, id: BindId, side: Side) -> Result<(), SessionError> {
        self.capture.begin(&self.model, id, side)?;
        Ok(())
    }

    /// Abandons key capture
    pub fn cancel_capture(&mut self) {
        self.capture.cancel();
    }

    /// Feeds a key event to the capture. Returns the edited bind, if any.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<Option<BindId>, SessionError> {
        let edited = self
            .capture
            .handle_key(&mut self.model, KeyCodeTable::global(), event)?;
        if edited.is_some() {
            self.dirty = true;
        }
        Ok(edited)
    }

    /// Clears the side being captured. Returns the edited bind, if any.
    pub fn unbind(&mut self) -> Result<Option<BindId>, SessionError> {
        let edited = self.capture.unbind(&mut self.model)?;
        if edited.is_some() {
            self.dirty = true;
        }
        Ok(edited)
    }

    // Checks

    /// Input conflicts in the current model
    pub fn conflicts(&self) -> Vec<Conflict> {
        ConflictDetector::from_binds(self.model.list()).find_conflicts()
    }

    /// Validates every bind and reports conflicts as warnings
    pub fn validate(&self) -> ValidationReport {
        ConfigValidator::new().validate_model(&self.model)
    }
}

#[cfg(test)]
mod tests;
