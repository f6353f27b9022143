use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local};
use tracing::{debug, info};

use super::merge::merge;
use super::model::{Current, HistoryRecord, Playlist, Video, WatchStatus};
use super::{StoreError, read_optional, remove_file, write_json};

/// How `clear` treats playlists older than the kept window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ClearMode {
    /// Drop old playlists entirely.
    Playlist,
    /// Keep old playlists but empty their video lists.
    Videos,
    /// Keep only the viewed videos of old playlists.
    Unwatched,
}

/// Loads the history document. A missing file is `None`; anything present but
/// unparseable or lacking a required key is a structural error.
pub(crate) fn load_history(path: &Path) -> Result<Option<HistoryRecord>, StoreError> {
    let Some(raw) = read_optional(path)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| StoreError::InvalidHistory {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
}

pub(crate) fn save_history(path: &Path, record: &HistoryRecord) -> Result<(), StoreError> {
    write_json(path, record)
}

pub(crate) fn now_stamp() -> String {
    Local::now().to_rfc3339()
}

/// In-memory view of `history.json` that writes through on every mutation.
#[derive(Debug)]
pub(crate) struct HistoryStore {
    path: PathBuf,
    record: HistoryRecord,
    on_disk: bool,
    status_by_url: HashMap<String, WatchStatus>,
}

impl HistoryStore {
    pub(crate) fn open(path: &Path) -> Result<Self, StoreError> {
        let loaded = load_history(path)?;
        let on_disk = loaded.is_some();
        let record = loaded.unwrap_or_default();
        debug!(path = %path.display(), on_disk, playlists = record.playlists.len(), "history loaded");
        let mut store = Self {
            path: path.to_path_buf(),
            record,
            on_disk,
            status_by_url: HashMap::new(),
        };
        store.rebuild_status_index();
        Ok(store)
    }

    pub(crate) fn exists(&self) -> bool {
        self.on_disk
    }

    pub(crate) fn record(&self) -> &HistoryRecord {
        &self.record
    }

    pub(crate) fn status_of(&self, url: &str) -> WatchStatus {
        self.status_by_url.get(url).copied().unwrap_or_default()
    }

    pub(crate) fn search(&self, url: &str) -> Option<(usize, usize)> {
        self.record.search(url)
    }

    pub(crate) fn save(&mut self) -> Result<(), StoreError> {
        save_history(&self.path, &self.record)?;
        self.on_disk = true;
        Ok(())
    }

    /// Makes `current` point at a selection and folds `videos` into its playlist.
    pub(crate) fn record_selection(
        &mut self,
        current: Current,
        videos: &[Video],
        truncate: bool,
    ) -> Result<(), StoreError> {
        let playlist_url = current.playlist_url.clone();
        let playlist_title = current.playlist_title.clone().unwrap_or_default();
        self.record.current = current;
        if let Some(url) = playlist_url {
            self.merge_into_playlist(&playlist_title, &url, videos, truncate);
        }
        self.repair_current();
        self.rebuild_status_index();
        self.save()
    }

    /// Merges a fresh fetch into the playlist at `url`, creating it if needed.
    pub(crate) fn refresh_playlist(
        &mut self,
        title: &str,
        url: &str,
        videos: &[Video],
        truncate: bool,
    ) -> Result<(), StoreError> {
        self.merge_into_playlist(title, url, videos, truncate);
        self.repair_current();
        self.rebuild_status_index();
        self.save()
    }

    /// Points `current` at another video of the current playlist.
    pub(crate) fn set_current_video(&mut self, title: &str, url: &str) -> Result<(), StoreError> {
        self.record.current.video_title = Some(title.to_string());
        self.record.current.video_url = Some(url.to_string());
        self.repair_current();
        self.save()
    }

    pub(crate) fn mark_viewed(&mut self, url: &str) -> Result<bool, StoreError> {
        let Some((p_idx, v_idx)) = self.search(url) else {
            return Ok(false);
        };
        let now = now_stamp();
        let playlist = &mut self.record.playlists[p_idx];
        playlist.last_viewed = Some(now.clone());
        let video = &mut playlist.videos[v_idx];
        video.status = WatchStatus::Viewed;
        video.last_viewed = Some(now);
        self.status_by_url
            .insert(url.to_string(), WatchStatus::Viewed);
        info!(url, "marked viewed");
        self.save()?;
        Ok(true)
    }

    pub(crate) fn clear_viewed(&mut self, url: &str) -> Result<bool, StoreError> {
        let Some((p_idx, v_idx)) = self.search(url) else {
            return Ok(false);
        };
        let video = &mut self.record.playlists[p_idx].videos[v_idx];
        video.status = WatchStatus::Unwatched;
        video.last_viewed = None;
        self.status_by_url
            .insert(url.to_string(), WatchStatus::Unwatched);
        info!(url, "cleared viewed status");
        self.save()?;
        Ok(true)
    }

    /// Trims history down to the `keep_recent` most recently viewed playlists,
    /// treating the older ones according to `mode`.
    pub(crate) fn clear(&mut self, mode: ClearMode, keep_recent: usize) -> Result<(), StoreError> {
        let mut playlists = std::mem::take(&mut self.record.playlists);
        playlists.sort_by_key(|playlist| Reverse(viewed_at(playlist)));
        let old = playlists.split_off(keep_recent.min(playlists.len()));

        match mode {
            ClearMode::Playlist => {}
            ClearMode::Videos => playlists.extend(old.into_iter().map(|mut playlist| {
                playlist.videos.clear();
                playlist.last_updated = None;
                playlist.last_viewed = None;
                playlist
            })),
            ClearMode::Unwatched => playlists.extend(old.into_iter().map(|mut playlist| {
                playlist.videos.retain(|video| video.status.is_viewed());
                playlist
            })),
        }

        self.record.playlists = playlists;
        self.repair_current();
        info!(?mode, keep_recent, "history cleared");
        self.rebuild_status_index();
        self.save()
    }

    pub(crate) fn delete(path: &Path) -> Result<bool, StoreError> {
        remove_file(path)
    }

    fn merge_into_playlist(&mut self, title: &str, url: &str, videos: &[Video], truncate: bool) {
        let now = now_stamp();
        match self.record.playlist_index(url) {
            Some(idx) => {
                if videos.is_empty() {
                    return;
                }
                let playlist = &mut self.record.playlists[idx];
                let old = std::mem::take(&mut playlist.videos);
                playlist.videos = merge(old, videos, truncate);
                playlist.last_updated = Some(now);
                debug!(url, videos = playlist.videos.len(), truncate, "playlist merged");
            }
            None => {
                let mut playlist = Playlist::new(title, url);
                if !videos.is_empty() {
                    playlist.videos = merge(Vec::new(), videos, false);
                    playlist.last_updated = Some(now);
                }
                debug!(url, videos = playlist.videos.len(), "playlist created");
                self.record.playlists.push(playlist);
            }
        }
    }

    /// Re-establishes "current video lives in the current playlist".
    fn repair_current(&mut self) {
        let current = &self.record.current;
        let (Some(video_url), Some(playlist_url)) =
            (current.video_url.clone(), current.playlist_url.clone())
        else {
            return;
        };
        if self.record.search(&video_url).is_some() {
            return;
        }
        let video_title = current.video_title.clone().unwrap_or_default();
        let playlist_title = current.playlist_title.clone().unwrap_or_default();
        let idx = match self.record.playlist_index(&playlist_url) {
            Some(idx) => idx,
            None => {
                self.record
                    .playlists
                    .push(Playlist::new(playlist_title, playlist_url));
                self.record.playlists.len() - 1
            }
        };
        let playlist = &mut self.record.playlists[idx];
        playlist.videos.push(Video::fresh(video_title, video_url));
        playlist.videos.sort_by(|a, b| a.title.cmp(&b.title));
    }

    fn rebuild_status_index(&mut self) {
        self.status_by_url = self
            .record
            .playlists
            .iter()
            .flat_map(|playlist| playlist.videos.iter())
            .map(|video| (video.url.clone(), video.status))
            .collect();
    }
}

fn viewed_at(playlist: &Playlist) -> Option<DateTime<FixedOffset>> {
    playlist
        .last_viewed
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
}
