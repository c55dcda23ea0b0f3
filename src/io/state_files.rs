// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-character state files.
//!
//! Loading never fails: a missing, empty or unreadable file yields a fresh
//! state, and an unreadable one is first moved aside so it is never
//! overwritten. Saving goes through [`write_atomic`], so a failed save
//! leaves the previous file as it was.

use super::atomic::{quarantine, write_atomic};
use super::paths::StatePaths;
use super::serialization::{decode_state, encode_state};
use crate::error::StateError;
use crate::models::state::SavedState;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Reads and writes the state files of one data directory.
#[derive(Debug, Clone)]
pub struct StateFiles {
    paths: StatePaths,
}

impl StateFiles {
    pub fn new(paths: StatePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &StatePaths {
        &self.paths
    }

    /// Load the state of `character`, falling back to an empty one.
    pub fn load(&self, character: &str) -> SavedState {
        let path = self.paths.character_file(character);
        self.migrate_legacy(&path);

        let mut state = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => {
                log::info!("State file {} is empty, starting fresh", path.display());
                SavedState::new(character)
            }
            Ok(bytes) => match decode_state(&bytes, &path) {
                Ok(state) => {
                    log::info!("Loaded map markers from {}", path.display());
                    state
                }
                Err(err) => {
                    log::error!("{}", err);
                    fresh_after_unreadable(&path, character)
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No saved map markers for '{}', starting fresh", character);
                SavedState::new(character)
            }
            Err(err) => {
                log::error!("{}", StateError::io(&path, err));
                fresh_after_unreadable(&path, character)
            }
        };

        state.repair(character);
        state
    }

    /// Write `state` to its owner's file. Returns the path written.
    ///
    /// `state` is written as given; callers pass a purged copy.
    /// Fails with [`StateError::SaveBlocked`] if `state` was loaded in
    /// place of a file that is still on disk unread.
    pub fn save(&self, state: &SavedState) -> Result<PathBuf, StateError> {
        let path = self.paths.character_file(state.owner());
        if state.is_save_blocked() {
            return Err(StateError::SaveBlocked { path });
        }
        let bytes = encode_state(state)?;
        write_atomic(&path, &bytes)?;
        Ok(path)
    }

    /// Rename the old shared file to `path` if `path` does not exist yet.
    fn migrate_legacy(&self, path: &Path) {
        let legacy = self.paths.legacy_file();
        if !legacy.is_file() || path.exists() {
            return;
        }

        match fs::rename(&legacy, path) {
            Ok(()) => log::info!(
                "Migrated legacy state file {} to {}",
                legacy.display(),
                path.display()
            ),
            Err(err) => log::error!("{}", StateError::io(&legacy, err)),
        }
    }
}

/// Fresh state replacing an unreadable file. The file is moved aside first;
/// if that fails the state refuses to be saved over it.
fn fresh_after_unreadable(path: &Path, character: &str) -> SavedState {
    let mut state = SavedState::new(character);
    match quarantine(path) {
        Ok(moved) => log::warn!(
            "Moved unreadable state file {} to {}",
            path.display(),
            moved.display()
        ),
        Err(err) => {
            log::error!("Could not quarantine unreadable state file: {}", err);
            state.block_saves();
        }
    }
    state
}
