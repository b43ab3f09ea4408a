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

//! Configuration transaction management with automatic backups
//!
//! Provides atomic write operations with ACID guarantees.

use atomic_write_file::AtomicWriteFile;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{error, warn};

use crate::config::{
    parse_records,
    validator::{ConfigValidator, ValidationLevel},
    ConfigError, ConfigManager,
};
use crate::core::Codec;

/// Atomic configuration transaction with automatic backup.
///
/// Provides ACID guarantees:
/// - **Atomic**: Changes are all-or-nothing (atomic file operations)
/// - **Consistent**: Config is never in a half-written state
/// - **Isolated**: No race conditions (OS-level atomic rename)
/// - **Durable**: Backup created before any modifications
///
/// # Lifecycle
///
/// 1. `begin()` - Creates timestamped backup immediately
/// 2. Caller prepares new content (in memory)
/// 3. `commit()` - Writes atomically or `rollback()` - Restores original
///
/// # Example
///
/// ```no_run
/// use overbind_keymap::config::{ConfigManager, ConfigTransaction};
/// use std::path::PathBuf;
///
/// let manager = ConfigManager::new(PathBuf::from("OverBind_conf.json"))?;
/// let tx = ConfigTransaction::begin(&manager)?;
///
/// let new_content = r#"[{ "keycode": "51", "result_type": "keyboard", "result_value": 69 }]"#;
///
/// match tx.commit_with_validation(new_content) {
///     Ok(()) => println!("Changes applied successfully"),
///     Err(e) => eprintln!("Commit failed: {}", e),
/// }
/// # Ok::<(), overbind_keymap::config::ConfigError>(())
/// ```
pub struct ConfigTransaction<'a> {
    manager: &'a ConfigManager,
    backup_path: Option<PathBuf>,
}

impl<'a> ConfigTransaction<'a> {
    /// Begins a new transaction by creating a timestamped backup.
    ///
    /// The backup is created immediately when `begin()` is called, ensuring
    /// that a rollback point exists before any modifications are attempted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Config file cannot be read
    /// - Backup file cannot be written
    pub fn begin(manager: &'a ConfigManager) -> Result<Self, ConfigError> {
        // Create backup immediately - this is our rollback point
        let backup_path = manager.create_timestamped_backup()?;

        Ok(Self {
            manager,
            backup_path: Some(backup_path),
        })
    }

    /// Path of the backup taken by `begin()`
    pub fn backup_path(&self) -> Option<&PathBuf> {
        self.backup_path.as_ref()
    }

    /// Commits the transaction after checking the content decodes cleanly
    ///
    /// This method validates the config before committing:
    /// 1. Parses the JSON record list
    /// 2. Decodes it (kinds, SOCD links, mash-trigger group size)
    /// 3. Blocks on Error-level issues (binds that cannot be resolved)
    /// 4. Logs Warning-level issues (input conflicts) and commits
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Content validated and written successfully
    /// * `Err(ConfigError::ValidationFailed)` - Content would not load back
    pub fn commit_with_validation(self, new_content: &str) -> Result<(), ConfigError> {
        // Step 1: Parse
        let records = parse_records(new_content)
            .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;

        // Step 2: Decode
        let model = Codec::default()
            .decode(&records)
            .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;

        // Step 3: Block on errors
        let report = ConfigValidator::new().validate_model(&model);

        if report.has_errors() {
            let error_count = report
                .issues
                .iter()
                .filter(|i| i.validation_level == ValidationLevel::Error)
                .count();

            for issue in report.issues.iter().filter(|i| i.validation_level == ValidationLevel::Error) {
                error!(bind = issue.bind_id, "{}", issue.message);
            }

            return Err(ConfigError::ValidationFailed(format!(
                "{} validation error(s) detected",
                error_count
            )));
        }

        // Step 4: Warnings are informational
        for issue in report.issues.iter().filter(|i| i.validation_level == ValidationLevel::Warning) {
            warn!(bind = issue.bind_id, suggestion = ?issue.suggestion, "{}", issue.message);
        }

        self.commit(new_content)
    }

    /// Commits the transaction by atomically writing new content to the config file.
    ///
    /// The write operation is atomic at the filesystem level (temp file + rename),
    /// ensuring the config is never in a partially-written state. The backup created
    /// during `begin()` remains available for manual rollback if needed.
    ///
    /// This method consumes the transaction, preventing accidental double-commits.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Temporary file cannot be created
    /// - Content cannot be written to temp file
    /// - Atomic rename operation fails
    ///
    /// If an error occurs, the original config file remains unchanged.
    pub fn commit(self, new_content: &str) -> Result<(), ConfigError> {
        write_atomically(&self.manager.config_path, new_content)
    }

    /// Rolls back to the backup created during `begin()`.
    ///
    /// Atomically restores the configuration file to its state when the
    /// transaction began. Borrows `self`, so it can be retried.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No backup path is available
    /// - Backup file cannot be read
    /// - Atomic write of backup content fails
    pub fn rollback(&self) -> Result<(), ConfigError> {
        let backup_path = self.backup_path.as_ref().ok_or_else(|| {
            ConfigError::BackupFailed("No backup available for rollback".to_string())
        })?;

        let backup_content = fs::read_to_string(backup_path)?;
        write_atomically(&self.manager.config_path, &backup_content)
    }
}

fn write_atomically(path: &Path, content: &str) -> Result<(), ConfigError> {
    let mut file = AtomicWriteFile::options()
        .open(path)
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to open for atomic write: {}", e)))?;

    file.write_all(content.as_bytes())
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to write content: {}", e)))?;

    file.commit()
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to commit atomic write: {}", e)))?;

    Ok(())
}
