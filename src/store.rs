// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Create, look up and delete annotations.
//!
//! These operations work on the in-memory [`SavedState`] only; writing to
//! disk is the lifecycle manager's business. Deleting an entry tombstones
//! it and takes it off the live map right away, the entry itself stays in
//! the collection until the next save purges it.

use crate::error::StateError;
use crate::host::{GameContent, MapOverlay};
use crate::models::location::MapLocation;
use crate::models::marker::{Marker, MarkerKey, Position};
use crate::models::state::SavedState;

impl SavedState {
    /// Look up a location by asset guid. Never creates one.
    pub fn find_location(&self, asset_guid: &str) -> Option<&MapLocation> {
        self.global_map_locations
            .iter()
            .find(|location| location.asset_guid() == asset_guid)
    }

    pub fn find_location_mut(&mut self, asset_guid: &str) -> Option<&mut MapLocation> {
        self.global_map_locations
            .iter_mut()
            .find(|location| location.asset_guid() == asset_guid)
    }

    /// Return the location for `asset_guid`, creating it on first use.
    ///
    /// A new record is only created when the game can resolve the guid to a
    /// live location. A tombstoned record for the same guid is replaced by
    /// the new one so there is never more than one record per guid.
    pub fn find_or_create_location(
        &mut self,
        asset_guid: &str,
        content: &dyn GameContent,
    ) -> Result<&mut MapLocation, StateError> {
        let existing = self
            .global_map_locations
            .iter()
            .position(|location| location.asset_guid() == asset_guid);

        if let Some(index) = existing {
            if !self.global_map_locations[index].is_deleted() {
                return Ok(&mut self.global_map_locations[index]);
            }
        }

        let Some(handle) = content.resolve_location(asset_guid) else {
            log::warn!("Cannot find global map location for asset guid [{}]", asset_guid);
            return Err(StateError::NotFound {
                asset_guid: asset_guid.to_string(),
            });
        };

        let notes = format!("Custom Global Map Location #{}", self.next_marker_number());
        let location = MapLocation::new(asset_guid.to_string(), notes, Some(handle));

        let index = match existing {
            Some(index) => {
                self.global_map_locations[index] = location;
                index
            }
            None => {
                self.global_map_locations.push(location);
                self.global_map_locations.len() - 1
            }
        };
        log::info!("Created custom global map location for [{}]", asset_guid);
        Ok(&mut self.global_map_locations[index])
    }

    /// Append a new marker to `area` and return its key.
    pub fn create_marker(&mut self, area: &str, position: Position) -> MarkerKey {
        let description = format!("Custom marker #{}", self.next_marker_number());
        let markers = self.area_markers.entry(area.to_string()).or_default();
        markers.push(Marker::new(description, position));
        MarkerKey::new(area, markers.len() - 1)
    }

    pub fn marker(&self, key: &MarkerKey) -> Option<&Marker> {
        self.area_markers.get(&key.area)?.get(key.index)
    }

    pub fn marker_mut(&mut self, key: &MarkerKey) -> Option<&mut Marker> {
        self.area_markers.get_mut(&key.area)?.get_mut(key.index)
    }

    /// Tombstone a marker and take it off the overlay.
    ///
    /// Returns `false` if no marker exists under `key`.
    pub fn delete_marker(&mut self, key: &MarkerKey, overlay: &mut dyn MapOverlay) -> bool {
        let Some(marker) = self.marker_mut(key) else {
            return false;
        };
        marker.mark_deleted();
        overlay.detach_marker(key);
        true
    }

    /// Tombstone a location and clear its highlight in the game.
    ///
    /// Returns `false` if no location exists for `asset_guid`.
    pub fn delete_location(&mut self, asset_guid: &str, content: &mut dyn GameContent) -> bool {
        let Some(location) = self.find_location_mut(asset_guid) else {
            return false;
        };
        if !location.is_deleted() {
            location.is_visible = false;
            location.reapply(content);
            location.mark_deleted();
        }
        true
    }

    /// Redraw one marker: remove it from the overlay and show it again if visible.
    pub fn refresh_marker(&self, key: &MarkerKey, overlay: &mut dyn MapOverlay) {
        overlay.detach_marker(key);
        if let Some(marker) = self.marker(key).filter(|m| m.is_shown()) {
            overlay.attach_marker(key, marker);
        }
    }

    /// Show every visible marker of `area`. Returns how many were attached.
    pub fn attach_area(&self, area: &str, overlay: &mut dyn MapOverlay) -> usize {
        let mut attached = 0;
        for (index, marker) in self.markers(area).iter().enumerate() {
            if marker.is_shown() {
                overlay.attach_marker(&MarkerKey::new(area, index), marker);
                attached += 1;
            }
        }
        attached
    }

    /// Take every marker of `area` off the overlay. Returns how many were removed.
    pub fn detach_area(&self, area: &str, overlay: &mut dyn MapOverlay) -> usize {
        let mut detached = 0;
        for index in 0..self.markers(area).len() {
            let key = MarkerKey::new(area, index);
            if overlay.detach_marker(&key) {
                detached += 1;
            } else {
                log::debug!("Marker {} of '{}' was not on the map", index, area);
            }
        }
        detached
    }

    /// Reapply every location to the game. Returns how many failed to resolve.
    pub fn reapply_locations(&mut self, content: &mut dyn GameContent) -> usize {
        let mut failed = 0;
        for location in &mut self.global_map_locations {
            if !location.reapply(content) {
                log::error!("Malformed location [{}]", location.asset_guid());
                failed += 1;
            }
        }
        failed
    }

    /// Drop every cached game object handle.
    pub fn forget_live_locations(&mut self) {
        for location in &mut self.global_map_locations {
            location.forget_live();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeHost;
    use crate::models::location::MapColor;

    #[test]
    fn test_find_or_create_returns_same_record() {
        let mut host = FakeHost::new("Alice");
        host.add_location("guid-1", "Oleg's Trading Post");
        let mut state = SavedState::new("Alice");

        let first = state
            .find_or_create_location("guid-1", &host)
            .unwrap()
            .notes
            .clone();
        let second = state
            .find_or_create_location("guid-1", &host)
            .unwrap()
            .notes
            .clone();

        assert_eq!(first, second);
        assert_eq!(first, "Custom Global Map Location #1");
        assert_eq!(state.locations().len(), 1);
        assert_eq!(state.marker_number(), 2);
    }

    #[test]
    fn test_find_or_create_unknown_guid_creates_nothing() {
        let host = FakeHost::new("Alice");
        let mut state = SavedState::new("Alice");

        let result = state.find_or_create_location("missing", &host);
        assert!(matches!(result, Err(StateError::NotFound { .. })));
        assert!(state.locations().is_empty());
        assert_eq!(state.marker_number(), 1);
    }

    #[test]
    fn test_find_or_create_replaces_tombstone() {
        let mut host = FakeHost::new("Alice");
        host.add_location("guid-1", "Tuskdale");
        let mut state = SavedState::new("Alice");

        state.find_or_create_location("guid-1", &host).unwrap();
        assert!(state.delete_location("guid-1", &mut host));

        let location = state.find_or_create_location("guid-1", &host).unwrap();
        assert!(!location.is_deleted());
        assert_eq!(location.notes, "Custom Global Map Location #2");
        assert_eq!(state.locations().len(), 1);
    }

    #[test]
    fn test_find_location_never_creates() {
        let mut host = FakeHost::new("Alice");
        host.add_location("guid-1", "Tuskdale");
        let state = SavedState::new("Alice");
        assert!(state.find_location("guid-1").is_none());
        assert!(state.locations().is_empty());
    }

    #[test]
    fn test_marker_numbers_never_reused() {
        let mut host = FakeHost::new("Alice");
        let mut state = SavedState::new("Alice");

        let a = state.create_marker("Area 1", Position::default());
        let b = state.create_marker("Area 2", Position::default());
        state.delete_marker(&a, &mut host);
        state = state.purged_copy();
        let c = state.create_marker("Area 1", Position::default());

        assert_eq!(state.marker(&b).unwrap().description, "Custom marker #2");
        assert_eq!(c, MarkerKey::new("Area 1", 0));
        assert_eq!(state.marker(&c).unwrap().description, "Custom marker #3");
    }

    #[test]
    fn test_create_marker_appends_to_area() {
        let mut state = SavedState::new("Alice");
        let first = state.create_marker("Area", Position::new(1.0, 0.0, 1.0));
        let second = state.create_marker("Area", Position::new(2.0, 0.0, 2.0));
        assert_eq!(first.index, 0);
        assert_eq!(second.index, 1);
        assert_eq!(state.markers("Area").len(), 2);
        assert_eq!(state.markers("Area")[1].position(), Position::new(2.0, 0.0, 2.0));
    }

    #[test]
    fn test_delete_marker_is_immediate_and_idempotent() {
        let mut host = FakeHost::new("Alice");
        let mut state = SavedState::new("Alice");
        let key = state.create_marker("Area", Position::default());
        state.attach_area("Area", &mut host);
        assert!(host.shown(&key).is_some());

        assert!(state.delete_marker(&key, &mut host));
        assert!(host.shown(&key).is_none());
        assert!(state.delete_marker(&key, &mut host));

        let marker = state.marker(&key).unwrap();
        assert!(marker.is_deleted());
        assert!(!marker.is_visible);
        assert!(!state.delete_marker(&MarkerKey::new("Area", 5), &mut host));
    }

    #[test]
    fn test_delete_location_clears_highlight_and_is_idempotent() {
        let mut host = FakeHost::new("Alice");
        let handle = host.add_location("guid-1", "Tuskdale");
        let mut state = SavedState::new("Alice");
        state
            .find_or_create_location("guid-1", &host)
            .unwrap()
            .reapply(&mut host);
        assert_eq!(host.highlight(handle), Some(Some(MapColor::Green)));

        assert!(state.delete_location("guid-1", &mut host));
        assert_eq!(host.highlight(handle), Some(None));
        let calls = host.highlight_calls();

        assert!(state.delete_location("guid-1", &mut host));
        assert_eq!(host.highlight_calls(), calls);
        let location = state.find_location("guid-1").unwrap();
        assert!(location.is_deleted());
        assert!(!location.is_visible);
    }

    #[test]
    fn test_attach_and_detach_area_skip_hidden_and_absent() {
        let mut host = FakeHost::new("Alice");
        let mut state = SavedState::new("Alice");
        state.create_marker("Area", Position::default());
        let hidden = state.create_marker("Area", Position::default());
        state.create_marker("Other", Position::default());
        state.marker_mut(&hidden).unwrap().is_visible = false;

        assert_eq!(state.attach_area("Area", &mut host), 1);
        assert_eq!(host.shown_count(), 1);
        assert_eq!(state.detach_area("Area", &mut host), 1);
        assert_eq!(host.shown_count(), 0);
        assert_eq!(state.detach_area("Nowhere", &mut host), 0);
    }

    #[test]
    fn test_refresh_marker_updates_overlay() {
        let mut host = FakeHost::new("Alice");
        let mut state = SavedState::new("Alice");
        let key = state.create_marker("Area", Position::default());
        state.attach_area("Area", &mut host);

        state.marker_mut(&key).unwrap().description = "Secret door".to_string();
        state.refresh_marker(&key, &mut host);
        assert_eq!(host.shown(&key), Some("Secret door"));

        state.marker_mut(&key).unwrap().is_visible = false;
        state.refresh_marker(&key, &mut host);
        assert!(host.shown(&key).is_none());
    }

    #[test]
    fn test_reapply_locations_counts_failures() {
        let mut host = FakeHost::new("Alice");
        host.add_location("a", "A");
        host.add_location("b", "B");
        let mut state = SavedState::new("Alice");
        state.find_or_create_location("a", &host).unwrap();
        state.find_or_create_location("b", &host).unwrap();

        host.remove_location("b");
        state.forget_live_locations();
        assert_eq!(state.reapply_locations(&mut host), 1);
    }
}
