// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Global map location annotations.
//!
//! A `MapLocation` decorates a location that already exists in the game
//! content. It stores only the stable asset guid of that location; the
//! live game object is looked up lazily through [`GameContent`] and
//! cached until the cache is explicitly forgotten.

use crate::host::{GameContent, LocationHandle};
use serde::{Deserialize, Serialize};

/// Highlight colour palette offered to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapColor {
    Black,
    Blue,
    Cyan,
    Gray,
    #[default]
    Green,
    Magenta,
    Red,
    White,
    Yellow,
}

impl MapColor {
    pub const PALETTE: [MapColor; 9] = [
        MapColor::Black,
        MapColor::Blue,
        MapColor::Cyan,
        MapColor::Gray,
        MapColor::Green,
        MapColor::Magenta,
        MapColor::Red,
        MapColor::White,
        MapColor::Yellow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MapColor::Black => "Black",
            MapColor::Blue => "Blue",
            MapColor::Cyan => "Cyan",
            MapColor::Gray => "Gray",
            MapColor::Green => "Green",
            MapColor::Magenta => "Magenta",
            MapColor::Red => "Red",
            MapColor::White => "White",
            MapColor::Yellow => "Yellow",
        }
    }
}

/// Player customisation of one global map location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLocation {
    asset_guid: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub color: MapColor,
    #[serde(default)]
    pub is_visible: bool,
    #[serde(skip)]
    is_deleted: bool,
    #[serde(skip)]
    pending_delete: bool,
    #[serde(skip)]
    live: Option<LocationHandle>,
}

impl MapLocation {
    /// Create a visible, green location annotation.
    pub fn new(asset_guid: String, notes: String, live: Option<LocationHandle>) -> Self {
        Self {
            asset_guid,
            notes,
            color: MapColor::Green,
            is_visible: true,
            is_deleted: false,
            pending_delete: false,
            live,
        }
    }

    pub fn asset_guid(&self) -> &str {
        &self.asset_guid
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn is_pending_delete(&self) -> bool {
        self.pending_delete
    }

    pub fn request_delete(&mut self) {
        if !self.is_deleted {
            self.pending_delete = true;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = false;
    }

    /// Tombstone the location. Calling this again is a no-op.
    pub fn mark_deleted(&mut self) {
        self.is_deleted = true;
        self.is_visible = false;
        self.pending_delete = false;
    }

    /// Resolve the live game object, reusing the cached handle if present.
    pub fn live_handle(&mut self, content: &dyn GameContent) -> Option<LocationHandle> {
        if self.live.is_none() {
            self.live = content.resolve_location(&self.asset_guid);
        }
        self.live
    }

    /// Drop the cached game object so the next access resolves it again.
    pub fn forget_live(&mut self) {
        self.live = None;
    }

    /// Push highlight state onto the live game object.
    ///
    /// Returns `false` (after logging) when the object cannot be resolved.
    /// Tombstoned locations are left alone and report success.
    pub fn reapply(&mut self, content: &mut dyn GameContent) -> bool {
        if self.is_deleted {
            return true;
        }

        let Some(handle) = self.live_handle(content) else {
            log::error!(
                "Cannot find global map location for asset guid [{}]",
                self.asset_guid
            );
            return false;
        };

        let highlight = self.is_visible.then_some(self.color);
        content.set_highlight(handle, highlight);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeHost;

    #[test]
    fn test_new_location_defaults() {
        let location = MapLocation::new("guid-1".to_string(), "notes".to_string(), None);
        assert_eq!(location.asset_guid(), "guid-1");
        assert_eq!(location.color, MapColor::Green);
        assert!(location.is_visible);
        assert!(!location.is_deleted());
    }

    #[test]
    fn test_reapply_sets_highlight() {
        let mut host = FakeHost::new("Alice");
        let handle = host.add_location("guid-1", "Oleg's Trading Post");
        let mut location = MapLocation::new("guid-1".to_string(), String::new(), None);
        location.color = MapColor::Red;

        assert!(location.reapply(&mut host));
        assert_eq!(host.highlight(handle), Some(Some(MapColor::Red)));

        location.is_visible = false;
        assert!(location.reapply(&mut host));
        assert_eq!(host.highlight(handle), Some(None));
    }

    #[test]
    fn test_reapply_fails_when_location_is_missing() {
        let mut host = FakeHost::new("Alice");
        let mut location = MapLocation::new("gone".to_string(), String::new(), None);
        assert!(!location.reapply(&mut host));
    }

    #[test]
    fn test_reapply_on_deleted_location_is_noop_success() {
        let mut host = FakeHost::new("Alice");
        let mut location = MapLocation::new("gone".to_string(), String::new(), None);
        location.mark_deleted();
        assert!(location.reapply(&mut host));
        assert_eq!(host.highlight_calls(), 0);
    }

    #[test]
    fn test_live_handle_is_cached_until_forgotten() {
        let mut host = FakeHost::new("Alice");
        let first = host.add_location("guid-1", "Tuskdale");
        let mut location = MapLocation::new("guid-1".to_string(), String::new(), None);
        assert_eq!(location.live_handle(&host), Some(first));

        host.remove_location("guid-1");
        let second = host.add_location("guid-1", "Tuskdale");
        assert_eq!(location.live_handle(&host), Some(first));

        location.forget_live();
        assert_eq!(location.live_handle(&host), Some(second));
    }

    #[test]
    fn test_location_json_omits_transient_fields() {
        let mut location =
            MapLocation::new("guid-1".to_string(), "Bandits".to_string(), Some(LocationHandle(7)));
        location.color = MapColor::Yellow;

        let value = serde_json::to_value(&location).unwrap();
        assert_eq!(value["assetGuid"], "guid-1");
        assert_eq!(value["notes"], "Bandits");
        assert_eq!(value["color"], "Yellow");
        assert_eq!(value["isVisible"], true);
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_palette_names() {
        let names: Vec<_> = MapColor::PALETTE.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            ["Black", "Blue", "Cyan", "Gray", "Green", "Magenta", "Red", "White", "Yellow"]
        );
    }
}
