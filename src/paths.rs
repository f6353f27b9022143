use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Every file ani-yt keeps under its data directory.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn resolve(override_dir: Option<&Path>) -> Result<Self> {
        let root = match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::data_dir()
                .context("unable to resolve data directory")?
                .join("ani-yt"),
        };
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn history_file(&self) -> PathBuf {
        self.root.join("history.json")
    }

    pub fn bookmark_file(&self) -> PathBuf {
        self.root.join("bookmark.json")
    }

    pub fn playlist_cache_file(&self) -> PathBuf {
        self.root.join("playlists.json")
    }

    pub fn sources_file(&self) -> PathBuf {
        self.root.join("channel_sources.txt")
    }

    pub fn mpv_input_conf(&self) -> PathBuf {
        self.root.join("mpv-config").join("custom.conf")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}
