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

//! Input conflict detection
//!
//! The interception engine keys its state by input keycode, so two binds on
//! the same physical key silently shadow each other. SOCD binds are kept in
//! a separate table by the engine, which means a key may carry one SOCD bind
//! and one remapping bind at the same time; only collisions within the same
//! layer are conflicts.
//!
//! # Performance
//! - Add bind: O(1) average case
//! - Check conflict: O(1) average case
//! - List all conflicts: O(n) where n = number of distinct inputs

use std::collections::HashMap;
use std::fmt;

use crate::core::types::{Bind, BindKind};

/// Engine table a bind's input is registered in
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InputLayer {
    /// Keyboard, controller and mash-trigger binds
    Remap,
    /// SOCD binds
    Socd,
}

impl InputLayer {
    /// Layer a bind registers its input in
    pub fn of(bind: &Bind) -> Self {
        match bind.kind {
            Some(BindKind::Socd) => InputLayer::Socd,
            Some(BindKind::Keyboard | BindKind::Controller | BindKind::MashTrigger) | None => {
                InputLayer::Remap
            }
        }
    }
}

impl fmt::Display for InputLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputLayer::Remap => write!(f, "remap"),
            InputLayer::Socd => write!(f, "socd"),
        }
    }
}

/// Detects binds sharing an input key in O(1) time using HashMap-based indexing.
///
/// Binds with an empty input are unbound and never conflict.
pub struct ConflictDetector {
    /// Maps (layer, input key) to all binds registered there.
    binds: HashMap<(InputLayer, String), Vec<Bind>>,
}

/// Represents a detected conflict between binds.
#[derive(Clone, Debug, PartialEq)]
pub struct Conflict {
    /// Layer the collision happens in
    pub layer: InputLayer,

    /// The shared input key
    pub input: String,

    /// All binds using this input (always 2 or more)
    pub conflicting_binds: Vec<Bind>,
}

impl ConflictDetector {
    /// Creates a new empty conflict detector.
    pub fn new() -> Self {
        Self {
            binds: HashMap::new(),
        }
    }

    /// Builds a detector over a list of binds
    pub fn from_binds<'b>(binds: impl IntoIterator<Item = &'b Bind>) -> Self {
        let mut detector = Self::new();
        for bind in binds {
            detector.add_bind(bind.clone());
        }
        detector
    }

    /// Adds a bind to the detector.
    ///
    /// Time complexity: O(1) average case
    pub fn add_bind(&mut self, bind: Bind) {
        if bind.input.is_empty() {
            return;
        }

        self.binds
            .entry((InputLayer::of(&bind), bind.input.clone()))
            .or_default()
            .push(bind);
    }

    /// Finds all conflicts (inputs with 2 or more binds in one layer).
    ///
    /// Sorted by input key for stable reporting.
    pub fn find_conflicts(&self) -> Vec<Conflict> {
        let mut conflicts: Vec<Conflict> = self
            .binds
            .iter()
            .filter(|(_, binds)| binds.len() > 1)
            .map(|((layer, input), binds)| Conflict {
                layer: *layer,
                input: input.clone(),
                conflicting_binds: binds.clone(),
            })
            .collect();

        conflicts.sort_by(|a, b| a.input.cmp(&b.input));
        conflicts
    }

    /// Checks if an input key has conflicts in the given layer.
    pub fn has_conflict(&self, layer: InputLayer, input: &str) -> bool {
        self.binds
            .get(&(layer, input.to_string()))
            .map(|binds| binds.len() > 1)
            .unwrap_or(false)
    }

    /// Returns the total number of bound inputs tracked.
    pub fn total_binds(&self) -> usize {
        self.binds.values().map(|v| v.len()).sum()
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}
