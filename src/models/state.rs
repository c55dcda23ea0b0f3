// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The saved state aggregate.
//!
//! `SavedState` owns every annotation of one character: the markers of
//! each area, the global map locations and the counter used for default
//! names. Deleted entries stay in the live state as tombstones and are
//! filtered out of the copy that gets written to disk.

use super::location::MapLocation;
use super::marker::Marker;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

/// Version written into every state file.
pub const FORMAT_VERSION: u32 = 1;

/// Markers grouped by area name.
pub type AreaMarkers = BTreeMap<String, Vec<Marker>>;

/// Complete annotation state of one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    #[serde(default = "current_version")]
    pub(crate) version: u32,
    #[serde(default = "first_marker_number")]
    pub(crate) marker_number: u32,
    #[serde(default)]
    pub(crate) global_map_locations: Vec<MapLocation>,
    #[serde(default)]
    pub(crate) area_markers: AreaMarkers,
    #[serde(skip)]
    owner: String,
    #[serde(skip)]
    save_blocked: bool,
}

fn current_version() -> u32 {
    FORMAT_VERSION
}

fn first_marker_number() -> u32 {
    1
}

impl SavedState {
    /// Create an empty state owned by `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            version: FORMAT_VERSION,
            marker_number: first_marker_number(),
            global_map_locations: Vec::new(),
            area_markers: BTreeMap::new(),
            owner: owner.into(),
            save_blocked: false,
        }
    }

    /// Character this state belongs to. Never persisted.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Whether writing this state would replace a file that could not be read.
    pub fn is_save_blocked(&self) -> bool {
        self.save_blocked
    }

    pub(crate) fn block_saves(&mut self) {
        self.save_blocked = true;
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Next number that will be handed out for a default name.
    pub fn marker_number(&self) -> u32 {
        self.marker_number
    }

    /// Take the next default-name number.
    pub fn next_marker_number(&mut self) -> u32 {
        let number = self.marker_number;
        self.marker_number = self.marker_number.saturating_add(1);
        number
    }

    pub fn locations(&self) -> &[MapLocation] {
        &self.global_map_locations
    }

    pub fn area_markers(&self) -> &AreaMarkers {
        &self.area_markers
    }

    /// Area names in sorted order.
    pub fn areas(&self) -> impl Iterator<Item = &str> {
        self.area_markers.keys().map(String::as_str)
    }

    /// Markers of an area, tombstones included.
    pub fn markers(&self, area: &str) -> &[Marker] {
        self.area_markers
            .get(area)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Copy of this state with every tombstone removed, ready to be written.
    ///
    /// The live state is left untouched so references held by the map
    /// overlay stay valid until the next load.
    pub fn purged_copy(&self) -> SavedState {
        SavedState {
            version: FORMAT_VERSION,
            marker_number: self.marker_number,
            global_map_locations: purge_locations(&self.global_map_locations).into_owned(),
            area_markers: purge_markers(&self.area_markers),
            owner: self.owner.clone(),
            save_blocked: self.save_blocked,
        }
    }

    /// Normalise a freshly decoded state and bind it to `owner`.
    pub fn repair(&mut self, owner: &str) {
        self.owner = owner.to_string();

        if self.version > FORMAT_VERSION {
            log::warn!(
                "State for '{}' has format version {} (supported: {}), reading best-effort",
                owner,
                self.version,
                FORMAT_VERSION
            );
        }
        self.version = FORMAT_VERSION;

        if self.marker_number == 0 {
            self.marker_number = 1;
        }

        let mut seen = HashSet::new();
        let before = self.global_map_locations.len();
        self.global_map_locations
            .retain(|location| seen.insert(location.asset_guid().to_string()));
        if self.global_map_locations.len() != before {
            log::warn!(
                "Dropped {} duplicate global map location(s) for '{}'",
                before - self.global_map_locations.len(),
                owner
            );
        }

        self.area_markers.retain(|_, markers| !markers.is_empty());
    }
}

/// Drop tombstoned markers; areas left without markers disappear.
pub fn purge_markers(area_markers: &AreaMarkers) -> AreaMarkers {
    area_markers
        .iter()
        .filter_map(|(area, markers)| {
            let live: Vec<Marker> = markers.iter().filter(|m| !m.is_deleted()).cloned().collect();
            (!live.is_empty()).then(|| (area.clone(), live))
        })
        .collect()
}

/// Drop tombstoned locations. Borrows the input when there is nothing to drop.
pub fn purge_locations(locations: &[MapLocation]) -> Cow<'_, [MapLocation]> {
    if locations.iter().any(MapLocation::is_deleted) {
        Cow::Owned(
            locations
                .iter()
                .filter(|l| !l.is_deleted())
                .cloned()
                .collect(),
        )
    } else {
        Cow::Borrowed(locations)
    }
}
