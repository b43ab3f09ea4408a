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

//! Configuration file management with atomic writes and backup support.
//!
//! This module provides safe, transactional operations for managing the
//! OverBind bind config (a JSON array of records read by the interception
//! engine). Key features:
//!
//! - **Atomic writes**: Uses temp-file-then-rename to prevent corruption
//! - **Automatic backups**: Every write creates a timestamped backup
//! - **Rollback safety**: Failed transactions leave original config untouched
//! - **Validation on commit**: Content must decode into a consistent model
//! - **Symlink warnings**: Logs a warning but allows symlinked configs
//!
//! # Example
//!
//! ```no_run
//! use overbind_keymap::config::{ConfigManager, ConfigTransaction};
//!
//! let manager = ConfigManager::new("/home/user/.local/share/OverBind/OverBind_conf.json".into())?;
//!
//! // Safe transactional write
//! let tx = ConfigTransaction::begin(&manager)?;
//! tx.commit_with_validation("[]")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod store;
pub mod transaction;
pub mod validator;

pub use error::ConfigError;
pub use store::{FileRecordStore, MemoryRecordStore, RecordStore};
pub use transaction::ConfigTransaction;
pub use validator::{ConfigValidator, ValidationIssue, ValidationLevel, ValidationReport};

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::{ControllerOutputTable, KeyCodeTable, PersistedRecord};

/// Default location of the config, relative to the user's home
pub const DEFAULT_CONFIG_PATH: &str = "~/.local/share/OverBind/OverBind_conf.json";

/// Records written when no config exists yet
///
/// Q and E steer the left stick horizontally, X pushes the right stick up.
pub fn default_records() -> Vec<PersistedRecord> {
    let keys = KeyCodeTable::global();
    let controller = ControllerOutputTable::global();

    [("Q", "LEFT STICK LEFT"), ("E", "LEFT STICK RIGHT"), ("X", "RIGHT STICK UP")]
        .into_iter()
        .filter_map(|(key, action)| {
            let code = keys.name_to_code(key)?;
            let result = controller.action_to_result(action)?;
            Some(PersistedRecord::new(
                format!("{:x}", code),
                result.result_type.as_str(),
                result.result_value,
            ))
        })
        .collect()
}

/// Manages the bind config file with safe atomic operations.
///
/// The ConfigManager provides read-only access and transactional writes
/// with automatic backup creation. All writes go through the transaction
/// API to ensure atomicity and recoverability.
#[derive(Debug)]
pub struct ConfigManager {
    /// Path to the bind config file.
    pub(crate) config_path: PathBuf,
    pub(crate) backup_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a new ConfigManager for the given config file.
    ///
    /// This validates that the config file exists and creates the backup
    /// directory if it doesn't exist. If the config is a symlink, a warning
    /// is logged but the operation continues.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the config file doesn't exist.
    /// Returns `ConfigError::BackupDirNotWritable` if the backup directory
    /// cannot be created.
    pub fn new(config_path: PathBuf) -> Result<Self, ConfigError> {
        // Validate config file exists
        if !config_path.exists() {
            return Err(ConfigError::NotFound(config_path));
        }

        // Warn if config is a symlink (but allow it)
        if config_path.read_link().is_ok() {
            warn!(path = %config_path.display(), "config file is a symlink");
        }

        // e.g., ~/.local/share/OverBind/OverBind_conf.json → ~/.local/share/OverBind/backups/
        let backup_dir = config_path
            .parent()
            .ok_or_else(|| {
                ConfigError::BackupDirNotWritable(PathBuf::from(
                    "Config file has no parent directory",
                ))
            })?
            .join("backups");

        if !backup_dir.exists() {
            fs::create_dir_all(&backup_dir)
                .map_err(|_| ConfigError::BackupDirNotWritable(backup_dir.clone()))?;
        }

        if backup_dir.metadata()?.permissions().readonly() {
            return Err(ConfigError::BackupDirNotWritable(backup_dir));
        }

        Ok(Self {
            config_path,
            backup_dir,
        })
    }

    /// Opens the config, writing the default records first if it is missing.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the default config cannot be written,
    /// plus anything `ConfigManager::new` returns.
    pub fn open_or_create(config_path: PathBuf) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&config_path, render_records(&default_records())?)?;
            debug!(path = %config_path.display(), "wrote default config");
        }

        Self::new(config_path)
    }

    /// Path of the managed config file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Directory holding timestamped backups
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Reads the current configuration file content.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read.
    pub fn read_config(&self) -> Result<String, ConfigError> {
        Ok(fs::read_to_string(&self.config_path)?)
    }

    pub(crate) fn create_timestamped_backup(&self) -> Result<PathBuf, ConfigError> {
        let content = fs::read_to_string(&self.config_path)?;

        // YYYY-MM-DD_HHMMSS
        let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");

        let original_name = self
            .config_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ConfigError::BackupFailed(format!(
                    "Config path has no UTF-8 file name: {}",
                    self.config_path.display()
                ))
            })?;

        let backup_path = self.backup_dir.join(format!("{}.{}", original_name, timestamp));
        fs::write(&backup_path, &content)?;

        debug!(path = %backup_path.display(), "created backup");
        Ok(backup_path)
    }

    /// Lists backups of this config, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the backup directory cannot be read.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let prefix = self
            .config_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| format!("{}.", name))
            .unwrap_or_default();

        let mut backups = fs::read_dir(&self.backup_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect::<Vec<_>>();

        // Timestamps sort lexicographically
        backups.sort();
        Ok(backups)
    }

    /// Deletes all but the `keep` most recent backups.
    ///
    /// Returns the number of backups removed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if a backup cannot be listed or removed.
    pub fn cleanup_old_backups(&self, keep: usize) -> Result<usize, ConfigError> {
        let backups = self.list_backups()?;
        let excess = backups.len().saturating_sub(keep);

        for backup in &backups[..excess] {
            fs::remove_file(backup)?;
        }

        Ok(excess)
    }
}

/// Serialises records the way the config file stores them
pub(crate) fn render_records(records: &[PersistedRecord]) -> Result<String, ConfigError> {
    serde_json::to_string_pretty(records).map_err(|e| ConfigError::SaveFailure(e.to_string()))
}

/// Parses config file content into records
pub(crate) fn parse_records(content: &str) -> Result<Vec<PersistedRecord>, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::LoadFailure(e.to_string()))
}

#[cfg(test)]
mod tests;
