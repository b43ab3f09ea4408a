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

//! Group invariant management
//!
//! Every edit that must touch more than one bind lives here:
//! - SOCD pairs: two binds where each one's output is the other's input
//! - The mash-trigger group: three binds that only flag their own key
//!
//! `GroupManager` never owns binds. It borrows the `BindModel` mutably, so
//! no other writer can observe a half-applied group edit.
//!
//! # Invariants
//! - Linked SOCD binds `(A, B)` satisfy `A.output == B.input` and
//!   `B.output == A.input` after every edit made through this module
//! - A bind belongs to at most one SOCD link
//! - At most one mash-trigger group exists, and each member has
//!   `output == input`

use tracing::{debug, warn};

use crate::core::model::{BindError, BindModel};
use crate::core::types::{Bind, BindId, BindKind, Side};

/// Mash-trigger groups always have this many members
pub const MASH_TRIGGER_GROUP_SIZE: usize = 3;

/// Mutable view over a `BindModel` for linked multi-bind edits
pub struct GroupManager<'a> {
    model: &'a mut BindModel,
}

impl<'a> GroupManager<'a> {
    /// Borrows the model for group edits
    pub fn new(model: &'a mut BindModel) -> Self {
        Self { model }
    }

    /// Creates two empty SOCD binds and links them
    pub fn add_socd_pair(&mut self) -> (Bind, Bind) {
        let a = self.model.push_new(Some(BindKind::Socd)).clone();
        let b = self.model.push_new(Some(BindKind::Socd)).clone();

        self.link(a.id, b.id);
        debug!(a = a.id, b = b.id, "added SOCD pair");

        (a, b)
    }

    /// Creates the three binds of the mash-trigger group
    ///
    /// # Errors
    ///
    /// Returns `BindError::DuplicateMashTriggerGroup` if a group already
    /// exists. The model is left unchanged.
    pub fn add_mash_trigger_group(&mut self) -> Result<[Bind; MASH_TRIGGER_GROUP_SIZE], BindError> {
        if !self.model.mash_trigger_members().is_empty() {
            return Err(BindError::DuplicateMashTriggerGroup);
        }

        let members = std::array::from_fn(|_| self.model.push_new(Some(BindKind::MashTrigger)).clone());
        debug!("added mash-trigger group");

        Ok(members)
    }

    /// True when `add_mash_trigger_group` would succeed
    pub fn can_add_mash_trigger_group(&self) -> bool {
        self.model.mash_trigger_members().is_empty()
    }

    /// Sets one side of a SOCD bind and keeps its partner consistent
    ///
    /// The partner's *opposite* side receives the same value, so both
    /// members can be edited from either end:
    /// - `set_socd_side(A, Input, v)` → `A.input = v`, `B.output = v`
    /// - `set_socd_side(A, Output, v)` → `A.output = v`, `B.input = v`
    ///
    /// # Errors
    ///
    /// - `BindError::UnknownBindId` if no bind has this id
    /// - `BindError::WrongKind` if the bind is not a SOCD bind
    /// - `BindError::UnresolvedSocdLink` if the bind has no partner
    pub fn set_socd_side(&mut self, id: BindId, side: Side, value: &str) -> Result<(), BindError> {
        let bind = self.expect_kind(id, BindKind::Socd)?;
        let partner = self
            .model
            .socd_partner(id)
            .ok_or_else(|| BindError::UnresolvedSocdLink {
                id,
                input: bind.input.clone(),
                output: bind.output.clone(),
            })?;

        *self.model.get_mut(id)?.side_mut(side) = value.to_string();
        *self.model.get_mut(partner)?.side_mut(side.opposite()) = value.to_string();

        Ok(())
    }

    /// Sets both input and output of a mash-trigger bind to `value`
    ///
    /// # Errors
    ///
    /// - `BindError::UnknownBindId` if no bind has this id
    /// - `BindError::WrongKind` if the bind is not a mash-trigger bind
    pub fn set_mash_trigger_input(&mut self, id: BindId, value: &str) -> Result<(), BindError> {
        self.expect_kind(id, BindKind::MashTrigger)?;

        let bind = self.model.get_mut(id)?;
        bind.input = value.to_string();
        bind.output = value.to_string();

        Ok(())
    }

    /// Removes a grouped bind together with the rest of its group
    ///
    /// A SOCD bind takes its partner with it; a mash-trigger bind takes the
    /// whole group. Returns the removed binds ordered by id.
    ///
    /// # Errors
    ///
    /// - `BindError::UnknownBindId` if no bind has this id
    /// - `BindError::WrongKind` if the bind is not grouped
    pub fn remove_group_member(&mut self, id: BindId) -> Result<Vec<Bind>, BindError> {
        let kind = self.model.get(id)?.kind;

        let members = match kind {
            Some(BindKind::Socd) => {
                let mut members = vec![id];
                members.extend(self.model.socd_partner(id));
                members
            }
            Some(BindKind::MashTrigger) => self.model.mash_trigger_members(),
            Some(BindKind::Keyboard) | Some(BindKind::Controller) | None => {
                return Err(BindError::WrongKind {
                    id,
                    expected: BindKind::Socd,
                });
            }
        };

        let mut removed = members
            .into_iter()
            .map(|member| self.model.take(member))
            .collect::<Result<Vec<_>, _>>()?;
        removed.sort_by_key(|b| b.id);

        debug!(id, count = removed.len(), "removed group");
        Ok(removed)
    }

    /// Reconstructs SOCD links from bind contents
    ///
    /// For each unlinked SOCD bind `A` in list order, the first unlinked
    /// SOCD bind `B != A` with `B.input == A.output` becomes its partner.
    /// A partner whose output is not `A.input` is still linked, with a warning;
    /// the next `set_socd_side` on either member restores the relation.
    ///
    /// # Errors
    ///
    /// Returns `BindError::UnresolvedSocdLink` for the first SOCD bind that
    /// finds no partner. Links found before the failure are kept; callers
    /// that need all-or-nothing behaviour discard the model.
    pub fn infer_socd_links(&mut self) -> Result<usize, BindError> {
        let socd: Vec<(BindId, String, String)> = self
            .model
            .list()
            .iter()
            .filter(|b| b.kind == Some(BindKind::Socd))
            .map(|b| (b.id, b.input.clone(), b.output.clone()))
            .collect();

        let mut pairs = 0;

        for (id, input, output) in &socd {
            if self.model.socd_partner(*id).is_some() {
                continue;
            }

            let partner = socd.iter().find(|(other, other_input, _)| {
                other != id && self.model.socd_partner(*other).is_none() && other_input == output
            });

            match partner {
                Some((partner, _, partner_output)) => {
                    if partner_output != input {
                        warn!(
                            id,
                            partner,
                            input = %input,
                            partner_output = %partner_output,
                            "SOCD pair is asymmetric, next edit will overwrite the partner"
                        );
                    }
                    self.link(*id, *partner);
                    pairs += 1;
                }
                None => {
                    return Err(BindError::UnresolvedSocdLink {
                        id: *id,
                        input: input.clone(),
                        output: output.clone(),
                    });
                }
            }
        }

        debug!(pairs, "inferred SOCD links");
        Ok(pairs)
    }

    /// Checks that mash-trigger binds form zero groups or exactly one full group
    ///
    /// # Errors
    ///
    /// Returns `BindError::InvalidMashTriggerGroup` with the member count otherwise.
    pub fn validate_mash_trigger_group(&self) -> Result<(), BindError> {
        match self.model.mash_trigger_members().len() {
            0 | MASH_TRIGGER_GROUP_SIZE => Ok(()),
            count => Err(BindError::InvalidMashTriggerGroup(count)),
        }
    }

    fn link(&mut self, a: BindId, b: BindId) {
        self.model.socd_links.insert(a, b);
        self.model.socd_links.insert(b, a);
    }

    fn expect_kind(&self, id: BindId, expected: BindKind) -> Result<&Bind, BindError> {
        let bind = self.model.get(id)?;
        if bind.kind == Some(expected) {
            Ok(bind)
        } else {
            Err(BindError::WrongKind { id, expected })
        }
    }
}
