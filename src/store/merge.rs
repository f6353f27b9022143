use std::collections::{HashMap, HashSet};

use super::model::{Entry, Video};

/// Reconciles a previously stored video list with a fresh fetch.
///
/// Entries are matched by URL. Matched entries take the fresh title but keep
/// their watch status and timestamp; unseen fresh entries are appended as
/// unwatched. With `truncate`, stored entries missing from the fresh fetch are
/// dropped. The result is sorted by title (stable, byte order) and holds at
/// most one entry per URL.
pub(crate) fn merge(old: Vec<Video>, new: &[Video], truncate: bool) -> Vec<Video> {
    // Later duplicates in a fetch win the title, the way a map insert would.
    let fresh_titles: HashMap<&str, &str> = new
        .iter()
        .map(|video| (video.url.as_str(), video.title.as_str()))
        .collect();

    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(old.len().max(new.len()));
    for mut video in old {
        if !seen.insert(video.url.clone()) {
            continue;
        }
        match fresh_titles.get(video.url.as_str()) {
            Some(title) => {
                video.title = (*title).to_string();
                merged.push(video);
            }
            None if truncate => {}
            None => merged.push(video),
        }
    }

    for video in new {
        if seen.insert(video.url.clone()) {
            let title = fresh_titles
                .get(video.url.as_str())
                .copied()
                .unwrap_or(video.title.as_str());
            merged.push(Video::fresh(title, video.url.clone()));
        }
    }

    merged.sort_by(|a, b| a.title.cmp(&b.title));
    merged
}

/// Concatenates catalogs from several sources, keeping `old`'s order and
/// appending only entries whose URL has not been seen yet.
pub(crate) fn merge_preserve_order(old: Vec<Entry>, new: &[Entry]) -> Vec<Entry> {
    let mut seen: HashSet<String> = old.iter().map(|entry| entry.url.clone()).collect();
    let mut merged = old;
    for entry in new {
        if seen.insert(entry.url.clone()) {
            merged.push(entry.clone());
        }
    }
    merged
}
