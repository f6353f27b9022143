use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::model::Entry;
use super::{StoreError, read_optional, remove_file, write_json};

const SOURCES_HEADER: &str = "# Channel sources used by `ani-yt source update`.\n\
# One channel per line, in the same form `--channel` accepts.\n";

/// The cached list of playlists fetched from the configured channels.
#[derive(Debug, Clone)]
pub(crate) struct CatalogCache {
    path: PathBuf,
}

impl CatalogCache {
    pub(crate) fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when nothing has been cached yet.
    pub(crate) fn load(&self) -> Result<Option<Vec<Entry>>, StoreError> {
        let Some(raw) = read_optional(&self.path)? else {
            return Ok(None);
        };
        let entries: Vec<Entry> =
            serde_json::from_str(&raw).map_err(|err| StoreError::InvalidCatalog {
                path: self.path.clone(),
                reason: err.to_string(),
            })?;
        debug!(path = %self.path.display(), entries = entries.len(), "catalog cache loaded");
        Ok(Some(entries))
    }

    pub(crate) fn save(&self, entries: &[Entry]) -> Result<(), StoreError> {
        write_json(&self.path, &entries)
    }

    pub(crate) fn clear(&self) -> Result<bool, StoreError> {
        remove_file(&self.path)
    }
}

/// Plain-text list of channels, one per line, `#` starts a comment.
#[derive(Debug, Clone)]
pub(crate) struct SourceList {
    path: PathBuf,
}

impl SourceList {
    pub(crate) fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the configured sources, writing the template first if the file is missing.
    pub(crate) fn load(&self) -> Result<Vec<String>, StoreError> {
        let Some(raw) = read_optional(&self.path)? else {
            self.write_template()?;
            return Ok(Vec::new());
        };
        Ok(raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect())
    }

    pub(crate) fn save(&self, sources: &[String]) -> Result<(), StoreError> {
        let mut body = String::from(SOURCES_HEADER);
        for source in sources {
            body.push_str(source);
            body.push('\n');
        }
        self.write(&body)
    }

    /// Returns how many of `urls` were new.
    pub(crate) fn add(&self, urls: &[String]) -> Result<usize, StoreError> {
        let mut sources = self.load()?;
        let mut added = 0;
        for url in urls {
            if !sources.contains(url) {
                sources.push(url.clone());
                added += 1;
            }
        }
        if added > 0 {
            self.save(&sources)?;
        }
        Ok(added)
    }

    /// Returns how many of `urls` were present and removed. Each argument
    /// drops at most one line, so the count never exceeds `urls.len()`.
    pub(crate) fn remove(&self, urls: &[String]) -> Result<usize, StoreError> {
        let mut sources = self.load()?;
        let mut removed = 0;
        for url in urls {
            if let Some(pos) = sources.iter().position(|source| source == url) {
                sources.remove(pos);
                removed += 1;
            }
        }
        if removed > 0 {
            self.save(&sources)?;
        }
        Ok(removed)
    }

    pub(crate) fn write_template(&self) -> Result<(), StoreError> {
        self.write(SOURCES_HEADER)
    }

    fn write(&self, body: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| StoreError::Io {
                path: parent.to_path_buf(),
                source: err,
            })?;
        }
        fs::write(&self.path, body).map_err(|err| StoreError::Io {
            path: self.path.clone(),
            source: err,
        })
    }
}
