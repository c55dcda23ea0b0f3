// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! State file naming.
//!
//! Each character gets its own file, `<base>-<character>.<ext>`, inside
//! the data directory. Older installs kept a single `<base>.<ext>` file.

use std::path::{Path, PathBuf};

/// Name used when the character has no name.
pub const UNNAMED_CHARACTER: &str = "Unnamed";

/// Replace every character that is not allowed in a file name with `_`.
pub fn sanitize_character_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return UNNAMED_CHARACTER.to_string();
    }

    trimmed
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Locations of the state files in one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    dir: PathBuf,
    base_name: String,
    extension: String,
}

impl StatePaths {
    pub fn new(dir: impl Into<PathBuf>, base_name: &str, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.to_string(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the state of `character`.
    pub fn character_file(&self, character: &str) -> PathBuf {
        self.dir.join(format!(
            "{}-{}.{}",
            self.base_name,
            sanitize_character_name(character),
            self.extension
        ))
    }

    /// Shared file written before states were split per character.
    pub fn legacy_file(&self) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.base_name, self.extension))
    }
}
