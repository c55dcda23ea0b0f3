// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Local map marker data structures.
//!
//! A marker is a point annotation placed by the player on the map of a
//! single area. Markers are addressed by their area and their position in
//! that area's list.

use serde::{Deserialize, Serialize};

/// A 3D point in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Icon shown for a marker on the local map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerType {
    #[default]
    PointOfInterest,
    VeryImportantThing,
    Loot,
    Exit,
}

impl MarkerType {
    pub const ALL: [MarkerType; 4] = [
        MarkerType::PointOfInterest,
        MarkerType::VeryImportantThing,
        MarkerType::Loot,
        MarkerType::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MarkerType::PointOfInterest => "Point of Interest",
            MarkerType::VeryImportantThing => "Very Important Thing",
            MarkerType::Loot => "Loot",
            MarkerType::Exit => "Exit",
        }
    }
}

/// Address of a marker: its area and its index in that area's list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerKey {
    pub area: String,
    pub index: usize,
}

impl MarkerKey {
    pub fn new(area: impl Into<String>, index: usize) -> Self {
        Self {
            area: area.into(),
            index,
        }
    }
}

/// A player-placed marker on a local map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    #[serde(default)]
    pub description: String,
    position: Position,
    #[serde(rename = "type", default)]
    pub marker_type: MarkerType,
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
    #[serde(skip)]
    is_deleted: bool,
    #[serde(skip)]
    pending_delete: bool,
}

fn visible_by_default() -> bool {
    true
}

impl Marker {
    /// Create a new visible point-of-interest marker.
    pub fn new(description: String, position: Position) -> Self {
        Self {
            description,
            position,
            marker_type: MarkerType::PointOfInterest,
            is_visible: true,
            is_deleted: false,
            pending_delete: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn is_pending_delete(&self) -> bool {
        self.pending_delete
    }

    /// Whether the marker should be drawn on the map overlay.
    pub fn is_shown(&self) -> bool {
        !self.is_deleted && self.is_visible
    }

    pub fn request_delete(&mut self) {
        if !self.is_deleted {
            self.pending_delete = true;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = false;
    }

    /// Tombstone the marker. Calling this again is a no-op.
    pub fn mark_deleted(&mut self) {
        self.is_deleted = true;
        self.is_visible = false;
        self.pending_delete = false;
    }
}
