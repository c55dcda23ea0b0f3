// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! State serialization and deserialization.
//!
//! States are stored as pretty-printed JSON. Unknown fields are ignored
//! and missing ones take their defaults, so files from other revisions
//! stay readable.

use crate::error::StateError;
use crate::models::state::SavedState;
use std::path::Path;

/// Encode a state as JSON.
pub fn encode_state(state: &SavedState) -> Result<Vec<u8>, StateError> {
    serde_json::to_vec_pretty(state).map_err(StateError::Encode)
}

/// Decode a state read from `path`. The owner is left empty.
pub fn decode_state(bytes: &[u8], path: &Path) -> Result<SavedState, StateError> {
    serde_json::from_slice(bytes).map_err(|source| StateError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}
