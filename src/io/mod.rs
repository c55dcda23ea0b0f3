// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for state files.

pub mod atomic;
pub mod paths;
pub mod serialization;
pub mod state_files;
