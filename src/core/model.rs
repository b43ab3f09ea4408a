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

//! Bind model
//!
//! `BindModel` owns every bind of the session, in creation order, together
//! with the SOCD link index. Single-bind edits go through the methods here;
//! anything touching more than one bind goes through
//! [`GroupManager`](crate::core::groups::GroupManager), which borrows the
//! model mutably for the duration of the edit.
//!
//! Grouped binds (SOCD, mash trigger) refuse single-bind edits and deletes:
//! changing one member alone would leave its group inconsistent.

use std::collections::HashMap;
use thiserror::Error;

use crate::core::groups::GroupManager;
use crate::core::types::{Bind, BindId, BindKind, BindUpdate};

/// Errors raised by bind model and group operations
#[derive(Debug, Error, PartialEq)]
pub enum BindError {
    /// No bind carries this id
    #[error("Unknown bind id {0}")]
    UnknownBindId(BindId),

    /// A mash-trigger group already exists
    #[error("A mash-trigger group already exists")]
    DuplicateMashTriggerGroup,

    /// Single-bind edit or delete attempted on a grouped bind
    #[error("Bind {0} belongs to a group and must be edited through its group")]
    GroupedBind(BindId),

    /// SOCD and mash-trigger binds can only be created as a group
    #[error("{0} binds can only be created as part of a group")]
    GroupKindRequiresGroup(BindKind),

    /// Group operation applied to a bind of the wrong kind
    #[error("Bind {id} is not a {expected} bind")]
    WrongKind { id: BindId, expected: BindKind },

    /// SOCD bind with no partner among the other SOCD binds
    #[error("SOCD bind {id} (input '{input}') has no partner whose input is '{output}'")]
    UnresolvedSocdLink {
        id: BindId,
        input: String,
        output: String,
    },

    /// Mash-trigger binds must come in exactly one triple
    #[error("Mash-trigger group must have exactly 3 members, found {0}")]
    InvalidMashTriggerGroup(usize),
}

/// Ordered collection of binds plus the SOCD link index
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BindModel {
    binds: Vec<Bind>,
    /// Symmetric: `socd_links[a] == b` iff `socd_links[b] == a`
    pub(crate) socd_links: HashMap<BindId, BindId>,
}

impl BindModel {
    /// Creates an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps decoded binds. Links are added afterwards by inference.
    pub(crate) fn from_binds(binds: Vec<Bind>) -> Self {
        Self {
            binds,
            socd_links: HashMap::new(),
        }
    }

    /// Borrows the model for a multi-bind edit
    pub fn groups(&mut self) -> GroupManager<'_> {
        GroupManager::new(self)
    }

    /// Creates a new ungrouped bind with empty input and output
    ///
    /// The id is one more than the largest id in use, or 0 for an empty
    /// model. `kind` may be left unset until the user picks one.
    ///
    /// # Errors
    ///
    /// Returns `BindError::GroupKindRequiresGroup` for SOCD and mash-trigger
    /// kinds; use `GroupManager::add_socd_pair` or
    /// `GroupManager::add_mash_trigger_group` instead.
    pub fn create(&mut self, kind: Option<BindKind>) -> Result<Bind, BindError> {
        if let Some(kind) = kind.filter(|k| k.is_grouped()) {
            return Err(BindError::GroupKindRequiresGroup(kind));
        }
        Ok(self.push_new(kind).clone())
    }

    pub(crate) fn push_new(&mut self, kind: Option<BindKind>) -> &mut Bind {
        let id = self.next_id();
        self.binds.push(Bind::new(id, kind));
        let last = self.binds.len() - 1;
        &mut self.binds[last]
    }

    fn next_id(&self) -> BindId {
        self.binds.iter().map(|b| b.id).max().map_or(0, |max| max + 1)
    }

    /// Replaces exactly one field of an ungrouped bind
    ///
    /// Changing the kind clears the output, because the output is resolved
    /// through a different table afterwards.
    ///
    /// # Errors
    ///
    /// - `BindError::UnknownBindId` if no bind has this id
    /// - `BindError::GroupedBind` if the bind is a SOCD or mash-trigger member
    /// - `BindError::GroupKindRequiresGroup` when switching to a grouped kind
    pub fn update(&mut self, id: BindId, update: BindUpdate) -> Result<(), BindError> {
        let bind = self.get_mut(id)?;

        if bind.kind.is_some_and(BindKind::is_grouped) {
            return Err(BindError::GroupedBind(id));
        }

        match update {
            BindUpdate::Kind(kind) if kind.is_grouped() => {
                return Err(BindError::GroupKindRequiresGroup(kind));
            }
            BindUpdate::Kind(kind) => {
                if bind.kind != Some(kind) {
                    bind.kind = Some(kind);
                    bind.output.clear();
                }
            }
            BindUpdate::Input(input) => bind.input = input,
            BindUpdate::Output(output) => bind.output = output,
        }

        Ok(())
    }

    /// Removes an ungrouped bind
    ///
    /// # Errors
    ///
    /// - `BindError::UnknownBindId` if no bind has this id
    /// - `BindError::GroupedBind` for SOCD and mash-trigger members, which
    ///   must be removed with `GroupManager::remove_group_member`
    pub fn remove(&mut self, id: BindId) -> Result<Bind, BindError> {
        let bind = self.get(id)?;
        if bind.kind.is_some_and(BindKind::is_grouped) {
            return Err(BindError::GroupedBind(id));
        }
        self.take(id)
    }

    /// Removes a bind and any link pointing at it, without group checks
    pub(crate) fn take(&mut self, id: BindId) -> Result<Bind, BindError> {
        let index = self
            .binds
            .iter()
            .position(|b| b.id == id)
            .ok_or(BindError::UnknownBindId(id))?;

        if let Some(partner) = self.socd_links.remove(&id) {
            self.socd_links.remove(&partner);
        }

        Ok(self.binds.remove(index))
    }

    /// All binds in creation order
    pub fn list(&self) -> &[Bind] {
        &self.binds
    }

    /// Looks up a bind by id
    pub fn get(&self, id: BindId) -> Result<&Bind, BindError> {
        self.binds
            .iter()
            .find(|b| b.id == id)
            .ok_or(BindError::UnknownBindId(id))
    }

    pub(crate) fn get_mut(&mut self, id: BindId) -> Result<&mut Bind, BindError> {
        self.binds
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(BindError::UnknownBindId(id))
    }

    /// Partner of a linked SOCD bind
    pub fn socd_partner(&self, id: BindId) -> Option<BindId> {
        self.socd_links.get(&id).copied()
    }

    /// Linked SOCD pairs, each reported once, ordered by the first member's position
    pub fn socd_pairs(&self) -> Vec<(BindId, BindId)> {
        self.binds
            .iter()
            .filter_map(|b| {
                let partner = self.socd_partner(b.id)?;
                let partner_first = self.position(partner)? < self.position(b.id)?;
                (!partner_first).then_some((b.id, partner))
            })
            .collect()
    }

    /// Members of the mash-trigger group, in list order (empty when there is none)
    pub fn mash_trigger_members(&self) -> Vec<BindId> {
        self.binds
            .iter()
            .filter(|b| b.kind == Some(BindKind::MashTrigger))
            .map(|b| b.id)
            .collect()
    }

    fn position(&self, id: BindId) -> Option<usize> {
        self.binds.iter().position(|b| b.id == id)
    }

    /// Number of binds
    pub fn len(&self) -> usize {
        self.binds.len()
    }

    /// True if the model holds no binds
    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }
}
