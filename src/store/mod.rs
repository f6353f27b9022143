mod bookmarks;
mod catalog;
mod history;
mod merge;
mod model;

#[cfg(test)]
mod tests;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub(crate) use bookmarks::*;
pub(crate) use catalog::*;
pub(crate) use history::*;
pub(crate) use merge::*;
pub(crate) use model::*;

#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("invalid history file '{}': {reason}", path.display())]
    InvalidHistory { path: PathBuf, reason: String },
    #[error("invalid bookmark file '{}': {reason}", path.display())]
    InvalidBookmarks { path: PathBuf, reason: String },
    #[error("invalid playlist cache '{}': {reason}", path.display())]
    InvalidCatalog { path: PathBuf, reason: String },
    #[error("failed to access '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reads a file, mapping "not found" to `None`.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StoreError::io(path, err)),
    }
}

/// Writes pretty JSON next to `path` and renames it into place so readers
/// never observe a half-written document.
pub(crate) fn write_json(path: &Path, value: &impl Serialize) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
    }
    let body = serde_json::to_string_pretty(value)
        .map_err(|err| StoreError::io(path, io::Error::other(err)))?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, body).map_err(|err| StoreError::io(&staging, err))?;
    fs::rename(&staging, path).map_err(|err| StoreError::io(path, err))?;
    Ok(())
}

/// Removes a file; a file that is already gone is not an error.
pub(crate) fn remove_file(path: &Path) -> Result<bool, StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(StoreError::io(path, err)),
    }
}
