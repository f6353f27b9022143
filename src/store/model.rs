use serde::{Deserialize, Serialize};

/// A playable catalog entry as fetched from a source: just a title and its URL.
///
/// On disk (the playlist cache) an entry is a two-element `[title, url]` array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub(crate) struct Entry {
    pub(crate) title: String,
    pub(crate) url: String,
}

impl Entry {
    pub(crate) fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

impl From<(String, String)> for Entry {
    fn from((title, url): (String, String)) -> Self {
        Self { title, url }
    }
}

impl From<Entry> for (String, String) {
    fn from(entry: Entry) -> Self {
        (entry.title, entry.url)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub(crate) enum WatchStatus {
    #[default]
    Unwatched,
    Viewed,
}

impl WatchStatus {
    pub(crate) fn is_viewed(self) -> bool {
        matches!(self, Self::Viewed)
    }
}

impl From<String> for WatchStatus {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case("viewed") {
            Self::Viewed
        } else {
            Self::Unwatched
        }
    }
}

impl From<WatchStatus> for String {
    fn from(status: WatchStatus) -> Self {
        match status {
            WatchStatus::Unwatched => String::new(),
            WatchStatus::Viewed => "viewed".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Video {
    #[serde(rename = "video_title")]
    pub(crate) title: String,
    #[serde(rename = "video_url")]
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) status: WatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_viewed: Option<String>,
}

impl Video {
    pub(crate) fn fresh(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            status: WatchStatus::Unwatched,
            last_viewed: None,
        }
    }

    pub(crate) fn entry(&self) -> Entry {
        Entry::new(self.title.clone(), self.url.clone())
    }
}

impl From<Entry> for Video {
    fn from(entry: Entry) -> Self {
        Self::fresh(entry.title, entry.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Playlist {
    #[serde(rename = "playlist_title", default)]
    pub(crate) title: String,
    #[serde(rename = "playlist_url")]
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) videos: Vec<Video>,
    #[serde(default)]
    pub(crate) last_updated: Option<String>,
    #[serde(default)]
    pub(crate) last_viewed: Option<String>,
}

impl Playlist {
    pub(crate) fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            videos: Vec::new(),
            last_updated: None,
            last_viewed: None,
        }
    }
}

/// What the user is currently watching. Serialized as `{}` when nothing is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Current {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) video_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) playlist_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) playlist_url: Option<String>,
}

impl Current {
    pub(crate) fn new(video: &Entry, playlist: &Entry) -> Self {
        Self {
            video_title: Some(video.title.clone()),
            video_url: Some(video.url.clone()),
            playlist_title: Some(playlist.title.clone()),
            playlist_url: Some(playlist.url.clone()),
        }
    }
}

/// The persisted watch history. Both keys are mandatory on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct HistoryRecord {
    pub(crate) current: Current,
    pub(crate) playlists: Vec<Playlist>,
}

impl HistoryRecord {
    /// Locates a video by URL as `(playlist_index, video_index)`.
    pub(crate) fn search(&self, url: &str) -> Option<(usize, usize)> {
        self.playlists
            .iter()
            .enumerate()
            .find_map(|(p_idx, playlist)| {
                playlist
                    .videos
                    .iter()
                    .position(|video| video.url == url)
                    .map(|v_idx| (p_idx, v_idx))
            })
    }

    pub(crate) fn playlist_index(&self, url: &str) -> Option<usize> {
        self.playlists.iter().position(|playlist| playlist.url == url)
    }

    pub(crate) fn current_playlist(&self) -> Option<&Playlist> {
        let url = self.current.playlist_url.as_deref()?;
        self.playlists.iter().find(|playlist| playlist.url == url)
    }
}
