// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crash-safe file replacement and quarantine of unreadable files.
//!
//! New contents are written to a uniquely named temporary file next to the
//! target, synced, and then renamed over the target. A crash or failure at
//! any point leaves the previous target intact.

use crate::error::StateError;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const MAX_NAME_ATTEMPTS: u32 = 32;

/// Atomically replace `path` with `contents`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StateError> {
    write_atomic_with(path, contents, rename_overwrite)
}

/// [`write_atomic`] with the final replace step supplied by the caller.
pub(crate) fn write_atomic_with<F>(path: &Path, contents: &[u8], replace: F) -> Result<(), StateError>
where
    F: FnOnce(&Path, &Path) -> io::Result<()>,
{
    let parent = parent_dir(path);
    fs::create_dir_all(parent).map_err(|source| StateError::io(parent, source))?;

    let (tmp_path, mut file) = create_temp(path)?;
    let written = file.write_all(contents).and_then(|()| file.sync_all());
    drop(file);

    if let Err(source) = written {
        discard(&tmp_path);
        return Err(StateError::io(tmp_path, source));
    }

    if let Err(source) = replace(&tmp_path, path) {
        discard(&tmp_path);
        return Err(StateError::io(path, source));
    }

    Ok(())
}

/// Move an unreadable file out of the way under a name nothing else uses.
///
/// Returns the new location of the file.
pub fn quarantine(path: &Path) -> Result<PathBuf, StateError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = sibling_name(path, "corrupt", attempt);
        match move_without_overwrite(path, &candidate) {
            Ok(()) => return Ok(candidate),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(source) => return Err(StateError::io(path, source)),
        }
    }
    Err(StateError::io(
        path,
        io::Error::new(io::ErrorKind::AlreadyExists, "no free quarantine name"),
    ))
}

/// Move `from` to `to`, failing with `AlreadyExists` instead of replacing `to`.
///
/// A hard link claims `to` atomically. Where links are unavailable
/// (directories, some filesystems) this falls back to an existence check
/// followed by a rename, which can race with another writer of `to`.
fn move_without_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    match fs::hard_link(from, to) {
        Ok(()) => {
            if let Err(err) = fs::remove_file(from) {
                let _ = fs::remove_file(to);
                return Err(err);
            }
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Err(err),
        Err(_) => {
            if to.symlink_metadata().is_ok() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "quarantine name already taken",
                ));
            }
            fs::rename(from, to)
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn create_temp(path: &Path) -> Result<(PathBuf, File), StateError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let tmp_path = sibling_name(path, "tmp", attempt);
        match OpenOptions::new().write(true).create_new(true).open(&tmp_path) {
            Ok(file) => return Ok((tmp_path, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(source) => return Err(StateError::io(tmp_path, source)),
        }
    }
    Err(StateError::io(
        path,
        io::Error::new(io::ErrorKind::AlreadyExists, "no free temporary file name"),
    ))
}

/// `<file>.<tag>.<pid>.<nanos>[.<attempt>]` in the same directory as `path`.
fn sibling_name(path: &Path, tag: &str, attempt: u32) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = format!("{}.{}.{}.{}", file_name, tag, std::process::id(), nanos);
    if attempt > 0 {
        name.push_str(&format!(".{}", attempt));
    }
    path.with_file_name(name)
}

fn discard(tmp_path: &Path) {
    if let Err(err) = fs::remove_file(tmp_path) {
        if err.kind() != io::ErrorKind::NotFound {
            log::warn!("Could not remove temporary file {}: {}", tmp_path.display(), err);
        }
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}
