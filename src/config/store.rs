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

//! Persistence collaborator for bind records
//!
//! The editing session never touches files directly. It talks to a
//! `RecordStore`, which either loads the full record list or fails, and
//! either saves the full list or fails. There are no partial results.
//!
//! - `FileRecordStore`: the JSON config file read by the interception
//!   engine, written through `ConfigTransaction`
//! - `MemoryRecordStore`: in-process store for embedding and tests

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::{
    parse_records, render_records, ConfigError, ConfigManager, ConfigTransaction,
};
use crate::core::PersistedRecord;

/// Load/save contract for persisted records
pub trait RecordStore {
    /// Loads the complete record list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailure` with the underlying reason.
    fn load_records(&self) -> Result<Vec<PersistedRecord>, ConfigError>;

    /// Replaces the stored records with `records`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SaveFailure` with the underlying reason. The
    /// previously stored records are left in place.
    fn save_records(&mut self, records: &[PersistedRecord]) -> Result<(), ConfigError>;
}

/// Number of backups kept after each save
pub const DEFAULT_BACKUP_LIMIT: usize = 10;

/// JSON config file store with backups and atomic writes
#[derive(Debug)]
pub struct FileRecordStore {
    manager: ConfigManager,
    backup_limit: usize,
}

impl FileRecordStore {
    /// Opens the store for an existing config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist.
    pub fn open(config_path: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self::with_manager(ConfigManager::new(config_path)?))
    }

    /// Opens the store, writing the default config if the file is missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the default config cannot be written.
    pub fn open_or_create(config_path: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self::with_manager(ConfigManager::open_or_create(config_path)?))
    }

    /// Wraps an existing manager
    pub fn with_manager(manager: ConfigManager) -> Self {
        Self {
            manager,
            backup_limit: DEFAULT_BACKUP_LIMIT,
        }
    }

    /// Sets how many backups survive each save
    pub fn with_backup_limit(mut self, backup_limit: usize) -> Self {
        self.backup_limit = backup_limit;
        self
    }

    /// Underlying config manager
    pub fn manager(&self) -> &ConfigManager {
        &self.manager
    }
}

impl RecordStore for FileRecordStore {
    fn load_records(&self) -> Result<Vec<PersistedRecord>, ConfigError> {
        let content = self
            .manager
            .read_config()
            .map_err(|e| ConfigError::LoadFailure(e.to_string()))?;
        let records = parse_records(&content)?;

        debug!(records = records.len(), path = %self.manager.config_path().display(), "loaded records");
        Ok(records)
    }

    fn save_records(&mut self, records: &[PersistedRecord]) -> Result<(), ConfigError> {
        let content = render_records(records)?;

        ConfigTransaction::begin(&self.manager)
            .and_then(|tx| tx.commit_with_validation(&content))
            .map_err(|e| ConfigError::SaveFailure(e.to_string()))?;

        // The records are on disk at this point
        let pruned = match self.manager.cleanup_old_backups(self.backup_limit) {
            Ok(pruned) => pruned,
            Err(e) => {
                warn!(error = %e, "failed to prune old backups");
                0
            }
        };

        info!(
            records = records.len(),
            pruned,
            path = %self.manager.config_path().display(),
            "saved records"
        );
        Ok(())
    }
}

/// In-memory record store
///
/// `fail_next_save` makes the next save fail with the given reason, which
/// lets callers exercise their failure paths.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecordStore {
    records: Vec<PersistedRecord>,
    fail_next_save: Option<String>,
    fail_loads: Option<String>,
    saves: usize,
}

impl MemoryRecordStore {
    /// Creates a store holding `records`
    pub fn new(records: Vec<PersistedRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Currently stored records
    pub fn records(&self) -> &[PersistedRecord] {
        &self.records
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Makes the next `save_records` call fail with `reason`
    pub fn fail_next_save(&mut self, reason: impl Into<String>) {
        self.fail_next_save = Some(reason.into());
    }

    /// Makes every `load_records` call fail with `reason`
    pub fn fail_loads(&mut self, reason: impl Into<String>) {
        self.fail_loads = Some(reason.into());
    }
}

impl RecordStore for MemoryRecordStore {
    fn load_records(&self) -> Result<Vec<PersistedRecord>, ConfigError> {
        match &self.fail_loads {
            Some(reason) => Err(ConfigError::LoadFailure(reason.clone())),
            None => Ok(self.records.clone()),
        }
    }

    fn save_records(&mut self, records: &[PersistedRecord]) -> Result<(), ConfigError> {
        if let Some(reason) = self.fail_next_save.take() {
            return Err(ConfigError::SaveFailure(reason));
        }

        self.records = records.to_vec();
        self.saves += 1;
        Ok(())
    }
}
