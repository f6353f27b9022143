use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command as ProcessCommand;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use tracing::{debug, info};

use crate::store::Entry;

const YOUTUBE_BASE: &str = "https://www.youtube.com/";

pub(crate) fn resolve_bin_from_env(env_value: Option<OsString>, fallback: &str) -> PathBuf {
    match env_value {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(fallback),
    }
}

/// Turns whatever the user typed for a channel into its `/playlists` page.
///
/// Full URLs are kept; `UC...` ids become `/channel/<id>` and anything else is
/// treated as a handle or path under youtube.com.
pub(crate) fn channel_playlists_url(channel: &str) -> String {
    let channel = channel.trim();
    let base = if channel.contains("://") {
        channel.to_string()
    } else if channel.starts_with("UC") {
        format!("{YOUTUBE_BASE}channel/{channel}")
    } else {
        format!("{YOUTUBE_BASE}{}", channel.trim_start_matches('/'))
    };
    let base = base.trim_end_matches('/');
    if base.ends_with("/playlists") {
        base.to_string()
    } else {
        format!("{base}/playlists")
    }
}

#[derive(Debug, Deserialize)]
struct FlatListing {
    #[serde(default)]
    entries: Vec<FlatEntry>,
}

#[derive(Debug, Deserialize)]
struct FlatEntry {
    #[serde(rename = "_type", default)]
    kind: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Extracts playable `{title, url}` pairs from `yt-dlp --flat-playlist -J` output,
/// keeping only entries of type `url`.
pub(crate) fn parse_flat_entries(raw: &str) -> Result<Vec<Entry>> {
    let listing: FlatListing =
        serde_json::from_str(raw).context("yt-dlp returned malformed JSON")?;
    Ok(listing
        .entries
        .into_iter()
        .filter(|entry| entry.kind.as_deref() == Some("url"))
        .filter_map(|entry| Some(Entry::new(entry.title?, entry.url?)))
        .collect())
}

#[derive(Debug, Deserialize)]
struct VideoInfo {
    #[serde(default)]
    thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// The last listed thumbnail is the largest one yt-dlp knows about.
pub(crate) fn parse_thumbnail_url(raw: &str) -> Result<String> {
    let info: VideoInfo = serde_json::from_str(raw).context("yt-dlp returned malformed JSON")?;
    info.thumbnails
        .into_iter()
        .next_back()
        .map(|thumb| thumb.url)
        .or(info.thumbnail)
        .ok_or_else(|| anyhow!("no thumbnail listed for this video"))
}

/// Catalog acquisition through the `yt-dlp` binary.
#[derive(Debug, Clone)]
pub(crate) struct YtDlp {
    bin: PathBuf,
}

impl YtDlp {
    pub(crate) fn from_env() -> Self {
        Self {
            bin: resolve_bin_from_env(env::var_os("ANI_YT_YT_DLP_BIN"), "yt-dlp"),
        }
    }

    pub(crate) fn channel_playlists(&self, channel: &str) -> Result<Vec<Entry>> {
        let url = channel_playlists_url(channel);
        let entries = parse_flat_entries(&self.dump_json(&url, true)?)?;
        info!(channel, url = %url, playlists = entries.len(), "channel playlists fetched");
        Ok(entries)
    }

    pub(crate) fn playlist_videos(&self, playlist_url: &str) -> Result<Vec<Entry>> {
        let entries = parse_flat_entries(&self.dump_json(playlist_url, true)?)?;
        info!(url = playlist_url, videos = entries.len(), "playlist fetched");
        Ok(entries)
    }

    pub(crate) fn thumbnail_url(&self, video_url: &str) -> Result<String> {
        parse_thumbnail_url(&self.dump_json(video_url, false)?)
    }

    fn dump_json(&self, url: &str, flat: bool) -> Result<String> {
        let mut cmd = ProcessCommand::new(&self.bin);
        if flat {
            cmd.arg("--flat-playlist");
        }
        cmd.args(["-J", "--no-warnings", "--quiet"]).arg(url);
        debug!(bin = %self.bin.display(), url, flat, "running yt-dlp");

        let output = cmd
            .output()
            .with_context(|| format!("failed to launch {}", self.bin.display()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("no error output");
            bail!("yt-dlp failed for {url} ({}): {}", output.status, detail.trim());
        }
        String::from_utf8(output.stdout).context("yt-dlp output is not valid UTF-8")
    }
}
