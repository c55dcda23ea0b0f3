// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for state handling.
//!
//! None of these ever reach the host game: the lifecycle manager turns
//! each of them into a log line and carries on with the best in-memory
//! state it has.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while resolving, reading or writing player annotations.
#[derive(Debug, Error)]
pub enum StateError {
    /// The identifier has no live backing game object.
    #[error("no game location found for asset guid [{asset_guid}]")]
    NotFound { asset_guid: String },

    /// A state file exists but could not be decoded.
    #[error("state file {} is unreadable: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A read, write, rename or delete failed.
    #[error("i/o failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file on disk could not be read or set aside, so it must not be replaced.
    #[error("refusing to overwrite unreadable state file {}", .path.display())]
    SaveBlocked { path: PathBuf },

    /// The in-memory state could not be encoded.
    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
