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

//! OverBind Keymap
//!
//! Keybind mapping model, group invariants and config codec for the
//! OverBind keyboard-to-controller interception engine.
//!
//! # Features
//!
//! - **Bind Model:** Create, update and remove keyboard, controller, SOCD
//!   and mash-trigger binds
//! - **Group Invariants:** SOCD pairs and the mash-trigger group stay
//!   consistent across every edit
//! - **Config Codec:** Decode and encode the persisted record list read by
//!   the interception engine
//! - **Conflict Detection:** Binds that shadow each other in the engine
//! - **Automatic Backups:** Timestamped backups before every config change
//! - **Atomic Operations:** Safe file writes with rollback on failure
//!
//! # Architecture
//!
//! - **`core`:** Business logic (symbol tables, model, groups, codec, conflicts)
//! - **`config`:** File operations (reading, writing, atomic updates, backups)
//! - **`session`:** Editing session and key capture over a record store
//!
//! # Examples
//!
//! ## Decoding records
//!
//! ```
//! use overbind_keymap::core::{BindKind, Codec, PersistedRecord};
//!
//! let records = vec![PersistedRecord::new("51", "thumb_lx", -32767)];
//! let model = Codec::default().decode(&records)?;
//!
//! let bind = &model.list()[0];
//! assert_eq!(bind.kind, Some(BindKind::Controller));
//! assert_eq!(bind.input, "Q");
//! assert_eq!(bind.output, "LEFT STICK LEFT");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Editing a SOCD pair
//!
//! ```
//! use overbind_keymap::config::MemoryRecordStore;
//! use overbind_keymap::core::Side;
//! use overbind_keymap::session::Session;
//!
//! let mut session = Session::new(MemoryRecordStore::default());
//! let (a, b) = session.add_socd_pair();
//! session.set_socd_side(a.id, Side::Input, "LEFT")?;
//! session.set_socd_side(a.id, Side::Output, "RIGHT")?;
//!
//! assert_eq!(session.model().get(b.id)?.input, "RIGHT");
//! assert_eq!(session.model().get(b.id)?.output, "LEFT");
//! session.save()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod core;
pub mod session;

// Re-export commonly used types for convenience
pub use core::{Bind, BindId, BindKind, BindModel, Codec, PersistedRecord, Side};
pub use session::Session;
