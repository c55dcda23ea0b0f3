// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data model.

pub mod location;
pub mod marker;
pub mod state;
