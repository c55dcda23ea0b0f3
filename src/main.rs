// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Custom Map Markers - state file inspector
//!
//! Prints the annotations stored for one character and can rewrite the
//! file in its current format.

use anyhow::{bail, Result};
use custom_map_markers::io::state_files::StateFiles;
use custom_map_markers::models::state::SavedState;
use custom_map_markers::Settings;
use std::path::PathBuf;

const USAGE: &str = "usage: map-markers <data-dir> <character> [--compact]";

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let compact = args.iter().any(|arg| arg == "--compact");
    let positional: Vec<&str> = args
        .iter()
        .filter(|arg| !arg.starts_with("--"))
        .map(String::as_str)
        .collect();
    let [data_dir, character] = positional.as_slice() else {
        bail!(USAGE);
    };

    let data_dir = PathBuf::from(data_dir);
    let settings = Settings {
        data_dir: data_dir.clone(),
        ..Settings::load_from_file(&data_dir.join("settings.yaml"))
    };

    let files = StateFiles::new(settings.state_paths());
    let state = files.load(character);
    print_summary(&state);

    if compact {
        let path = files.save(&state.purged_copy())?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn print_summary(state: &SavedState) {
    println!(
        "Character '{}', format version {}, next marker number {}",
        state.owner(),
        state.version(),
        state.marker_number()
    );

    for area in state.areas() {
        println!("{}:", area);
        for (index, marker) in state.markers(area).iter().enumerate() {
            let position = marker.position();
            println!(
                "  {}: {} [{}] at ({:.1}, {:.1}, {:.1}){}",
                index + 1,
                marker.description,
                marker.marker_type.label(),
                position.x,
                position.y,
                position.z,
                if marker.is_visible { "" } else { " (hidden)" }
            );
        }
    }

    println!("Global map locations: {}", state.locations().len());
    for location in state.locations() {
        println!(
            "  {} [{}]{}: {}",
            location.asset_guid(),
            location.color.name(),
            if location.is_visible { "" } else { " (hidden)" },
            location.notes
        );
    }
}
