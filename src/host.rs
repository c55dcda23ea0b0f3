// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interfaces to the running game.
//!
//! The core never talks to the engine directly. Whatever embeds this
//! crate implements these traits on top of its own map renderer, content
//! database and session.

use crate::models::location::MapColor;
use crate::models::marker::{Marker, MarkerKey};

/// Opaque handle to a live global map location object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationHandle(pub u64);

/// Game content lookup for global map locations.
pub trait GameContent {
    /// Find the live location object for a content asset guid.
    fn resolve_location(&self, asset_guid: &str) -> Option<LocationHandle>;

    /// Display name of a live location, if the game can provide one.
    fn location_name(&self, handle: LocationHandle) -> Option<String>;

    /// Force (`Some`) or clear (`None`) the highlight on a location.
    fn set_highlight(&mut self, handle: LocationHandle, color: Option<MapColor>);
}

/// The visible local map overlay.
pub trait MapOverlay {
    /// Show a marker on the overlay, replacing whatever was shown under `key`.
    fn attach_marker(&mut self, key: &MarkerKey, marker: &Marker);

    /// Remove a marker from the overlay. Returns `false` if it was not shown.
    fn detach_marker(&mut self, key: &MarkerKey) -> bool;
}

/// The current game session.
pub trait GameSession {
    /// Name of the active player character, `None` when no game is loaded.
    fn character_name(&self) -> Option<String>;
}

/// Everything the lifecycle manager needs from the game.
pub trait Host: GameContent + MapOverlay + GameSession {}

impl<T: GameContent + MapOverlay + GameSession> Host for T {}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;

    /// In-memory game used by unit tests.
    #[derive(Debug, Default)]
    pub struct FakeHost {
        character: Option<String>,
        locations: HashMap<String, LocationHandle>,
        names: HashMap<LocationHandle, String>,
        highlights: HashMap<LocationHandle, Option<MapColor>>,
        highlight_calls: usize,
        overlay: HashMap<MarkerKey, String>,
        next_handle: u64,
    }

    impl FakeHost {
        pub fn new(character: &str) -> Self {
            Self {
                character: Some(character.to_string()),
                ..Default::default()
            }
        }

        pub fn set_character(&mut self, character: Option<&str>) {
            self.character = character.map(str::to_string);
        }

        pub fn add_location(&mut self, asset_guid: &str, name: &str) -> LocationHandle {
            self.next_handle += 1;
            let handle = LocationHandle(self.next_handle);
            self.locations.insert(asset_guid.to_string(), handle);
            self.names.insert(handle, name.to_string());
            handle
        }

        pub fn remove_location(&mut self, asset_guid: &str) {
            if let Some(handle) = self.locations.remove(asset_guid) {
                self.names.remove(&handle);
            }
        }

        pub fn highlight(&self, handle: LocationHandle) -> Option<Option<MapColor>> {
            self.highlights.get(&handle).copied()
        }

        pub fn highlight_calls(&self) -> usize {
            self.highlight_calls
        }

        pub fn shown(&self, key: &MarkerKey) -> Option<&str> {
            self.overlay.get(key).map(String::as_str)
        }

        pub fn shown_count(&self) -> usize {
            self.overlay.len()
        }
    }

    impl GameContent for FakeHost {
        fn resolve_location(&self, asset_guid: &str) -> Option<LocationHandle> {
            self.locations.get(asset_guid).copied()
        }

        fn location_name(&self, handle: LocationHandle) -> Option<String> {
            self.names.get(&handle).cloned()
        }

        fn set_highlight(&mut self, handle: LocationHandle, color: Option<MapColor>) {
            self.highlight_calls += 1;
            self.highlights.insert(handle, color);
        }
    }

    impl MapOverlay for FakeHost {
        fn attach_marker(&mut self, key: &MarkerKey, marker: &Marker) {
            self.overlay.insert(key.clone(), marker.description.clone());
        }

        fn detach_marker(&mut self, key: &MarkerKey) -> bool {
            self.overlay.remove(key).is_some()
        }
    }

    impl GameSession for FakeHost {
        fn character_name(&self) -> Option<String> {
            self.character.clone()
        }
    }
}
