// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! User settings.
//!
//! Settings are kept in a small YAML file. A missing or broken file is
//! not an error; the defaults are used instead.

use crate::io::paths::StatePaths;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persistent settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the state files
    pub data_dir: PathBuf,
    /// State file name without character suffix or extension
    pub file_base_name: String,
    pub file_extension: String,
    /// Save after every create, edit or delete instead of only on game events
    pub save_after_every_change: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            file_base_name: "custom-map-markers".to_string(),
            file_extension: "json".to_string(),
            save_after_every_change: false,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file, or defaults if that fails.
    pub fn load_from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Settings file is malformed, using defaults: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings to a YAML file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        log::info!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn state_paths(&self) -> StatePaths {
        StatePaths::new(&self.data_dir, &self.file_base_name, &self.file_extension)
    }
}
