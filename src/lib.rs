// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Custom Map Markers
//!
//! Player annotations for the local maps and the global map of a game:
//! markers placed on area maps and notes, colours and highlights attached
//! to global map locations. Annotations are kept per character and
//! survive across sessions.

pub mod app;
pub mod config;
pub mod error;
pub mod host;
pub mod io;
pub mod models;
pub mod store;

pub use app::MapMarkers;
pub use config::Settings;
pub use error::StateError;
