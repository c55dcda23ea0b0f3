// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and game event handling.
//!
//! `MapMarkers` owns the live [`SavedState`] and decides when it is
//! loaded and saved. The game drives it through the `on_*` event
//! methods; the menu drives it through the edit and delete methods.
//! Exactly one state is live at a time and it always belongs to the
//! character named by [`SavedState::owner`].

use crate::config::Settings;
use crate::host::Host;
use crate::io::state_files::StateFiles;
use crate::models::location::MapLocation;
use crate::models::marker::{Marker, MarkerKey, Position};
use crate::models::state::SavedState;

/// Lifecycle manager for the player's map annotations.
pub struct MapMarkers<H: Host> {
    /// The running game
    host: H,

    /// User settings
    settings: Settings,

    /// State file access
    files: StateFiles,

    /// Live annotations of the current character
    state: SavedState,

    /// Area whose markers are currently on the overlay
    current_area: Option<String>,

    /// Whether the global map has been shown since start
    global_map_initialized: bool,
}

impl<H: Host> MapMarkers<H> {
    /// Load the active character's state and start handling events.
    pub fn init(host: H, settings: Settings) -> Self {
        let files = StateFiles::new(settings.state_paths());
        let character = active_character(&host).unwrap_or_default();
        let state = files.load(&character);

        Self {
            host,
            settings,
            files,
            state,
            current_area: None,
            global_map_initialized: false,
        }
    }

    pub fn state(&self) -> &SavedState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_area(&self) -> Option<&str> {
        self.current_area.as_deref()
    }

    pub fn is_global_map_initialized(&self) -> bool {
        self.global_map_initialized
    }

    fn active_character(&self) -> Option<String> {
        active_character(&self.host)
    }

    /// Write a purged copy of the live state to its owner's file.
    ///
    /// Skipped when no character is active, which is the case while the
    /// game shuts down, and when the live state was never bound to a
    /// character. Returns whether a file was written.
    pub fn save(&self) -> bool {
        if self.active_character().is_none() {
            log::info!("No active character, skipping save of map markers");
            return false;
        }
        if self.state.owner().is_empty() {
            log::warn!("Map markers are not bound to a character, skipping save");
            return false;
        }

        let snapshot = self.state.purged_copy();
        match self.files.save(&snapshot) {
            Ok(path) => {
                log::info!("Saved map markers to {}", path.display());
                true
            }
            Err(err) => {
                log::error!("Failed to save map markers: {}", err);
                false
            }
        }
    }

    /// Save first if an area is still shown, then load `character`'s state.
    fn switch_character(&mut self, character: &str) {
        if let Some(area) = self.current_area.take() {
            self.state.detach_area(&area, &mut self.host);
            self.save();
        }

        log::info!(
            "Loading map markers for '{}' (was '{}')",
            character,
            self.state.owner()
        );
        self.state = self.files.load(character);
    }

    /// Load the active character's state if the live one belongs to someone else.
    fn sync_owner(&mut self) {
        if let Some(active) = self.active_character() {
            if active != self.state.owner() {
                self.switch_character(&active);
            }
        }
    }

    fn changed(&self) {
        if self.settings.save_after_every_change {
            self.save();
        }
    }

    /// The player asked for a new marker at `position` in `area`.
    pub fn on_create_marker_requested(&mut self, area: &str, position: Position) -> MarkerKey {
        self.sync_owner();
        let key = self.state.create_marker(area, position);
        if let Some(marker) = self.state.marker(&key) {
            self.host.attach_marker(&key, marker);
            log::info!("Created '{}' in {}", marker.description, area);
        }
        self.changed();
        key
    }

    /// The player wants to customise a global map location.
    pub fn on_customize_location_requested(&mut self, asset_guid: &str) -> bool {
        self.sync_owner();
        let applied = match self.state.find_or_create_location(asset_guid, &self.host) {
            Ok(location) => location.reapply(&mut self.host),
            Err(err) => {
                log::error!("Could not customize location: {}", err);
                false
            }
        };
        if applied {
            self.changed();
        }
        applied
    }

    /// The hover ring doubles as our highlight, so restore it on hover-out.
    pub fn on_location_hover_changed(&mut self, asset_guid: &str, is_hover: bool) {
        if is_hover {
            return;
        }
        if let Some(location) = self.state.find_location_mut(asset_guid) {
            location.reapply(&mut self.host);
        }
    }

    pub fn on_area_entered(&mut self, area: &str) {
        let active = self.active_character().unwrap_or_default();
        if active != self.state.owner() {
            self.switch_character(&active);
        } else if let Some(previous) = self.current_area.take() {
            self.state.detach_area(&previous, &mut self.host);
        }

        let shown = self.state.attach_area(area, &mut self.host);
        log::debug!("Showing {} marker(s) in {}", shown, area);
        self.current_area = Some(area.to_string());
    }

    pub fn on_area_leaving(&mut self, area: &str) {
        self.state.detach_area(area, &mut self.host);
        if self.current_area.as_deref() == Some(area) {
            self.current_area = None;
        }
        self.save();
    }

    /// Global map objects are recreated each time the map opens.
    pub fn on_global_map_opened(&mut self) {
        self.state.forget_live_locations();
        let failed = self.state.reapply_locations(&mut self.host);
        if failed > 0 {
            log::warn!("{} global map location(s) could not be found", failed);
        }
        self.global_map_initialized = true;
    }

    pub fn on_global_map_closed(&mut self) {
        self.save();
    }

    pub fn on_game_saved(&mut self) -> bool {
        self.sync_owner();
        self.save()
    }

    /// A saved game was loaded: read the active character's file again.
    pub fn on_game_loaded(&mut self) {
        let active = self.active_character().unwrap_or_default();
        self.switch_character(&active);
    }

    pub fn on_character_changed(&mut self, new_name: &str) {
        let new_name = new_name.trim();
        if new_name != self.state.owner() {
            self.switch_character(new_name);
        }
    }

    pub fn on_app_exit(&mut self) -> bool {
        self.save()
    }

    /// Edit a live marker and redraw it.
    pub fn update_marker(&mut self, key: &MarkerKey, edit: impl FnOnce(&mut Marker)) -> bool {
        let Some(marker) = self.state.marker_mut(key).filter(|m| !m.is_deleted()) else {
            return false;
        };
        edit(marker);
        self.state.refresh_marker(key, &mut self.host);
        self.changed();
        true
    }

    /// Edit a live location and reapply its highlight.
    pub fn update_location(&mut self, asset_guid: &str, edit: impl FnOnce(&mut MapLocation)) -> bool {
        let Some(location) = self
            .state
            .find_location_mut(asset_guid)
            .filter(|l| !l.is_deleted())
        else {
            return false;
        };
        edit(location);
        location.reapply(&mut self.host);
        self.changed();
        true
    }

    pub fn request_marker_delete(&mut self, key: &MarkerKey) {
        if let Some(marker) = self.state.marker_mut(key) {
            marker.request_delete();
        }
    }

    pub fn cancel_marker_delete(&mut self, key: &MarkerKey) {
        if let Some(marker) = self.state.marker_mut(key) {
            marker.cancel_delete();
        }
    }

    pub fn confirm_marker_delete(&mut self, key: &MarkerKey) -> bool {
        let deleted = self.state.delete_marker(key, &mut self.host);
        if deleted {
            self.changed();
        }
        deleted
    }

    pub fn request_location_delete(&mut self, asset_guid: &str) {
        if let Some(location) = self.state.find_location_mut(asset_guid) {
            location.request_delete();
        }
    }

    pub fn cancel_location_delete(&mut self, asset_guid: &str) {
        if let Some(location) = self.state.find_location_mut(asset_guid) {
            location.cancel_delete();
        }
    }

    pub fn confirm_location_delete(&mut self, asset_guid: &str) -> bool {
        let deleted = self.state.delete_location(asset_guid, &mut self.host);
        if deleted {
            self.changed();
        }
        deleted
    }

    /// Game tooltip text with the player's notes appended.
    pub fn location_description(&self, asset_guid: &str, base: &str) -> String {
        match self.state.find_location(asset_guid) {
            Some(location) if !location.is_deleted() && location.is_visible => {
                format!("{}\n\nNotes\n{}", base, location.notes)
            }
            _ => base.to_string(),
        }
    }

    /// Label for a location in the menu.
    ///
    /// Game names are only known once the global map has been shown;
    /// before that the notes are used.
    pub fn location_label(&mut self, asset_guid: &str) -> Option<String> {
        let initialized = self.global_map_initialized;
        let location = self
            .state
            .find_location_mut(asset_guid)
            .filter(|l| !l.is_deleted())?;

        let name = if initialized {
            location
                .live_handle(&self.host)
                .and_then(|handle| self.host.location_name(handle))
        } else {
            None
        };
        Some(name.unwrap_or_else(|| location.notes.clone()))
    }
}

fn active_character<H: Host>(host: &H) -> Option<String> {
    host.character_name()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}
