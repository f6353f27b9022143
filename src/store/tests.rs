use std::fs;

use tempfile::TempDir;

use super::*;

fn video(title: &str, url: &str, status: WatchStatus) -> Video {
    Video {
        title: title.to_string(),
        url: url.to_string(),
        status,
        last_viewed: None,
    }
}

fn titles(videos: &[Video]) -> Vec<&str> {
    videos.iter().map(|video| video.title.as_str()).collect()
}

#[test]
fn merge_refreshes_titles_and_keeps_status() {
    let old = vec![video("A", "a", WatchStatus::Viewed)];
    let new = vec![
        video("A2", "a", WatchStatus::Unwatched),
        video("B", "b", WatchStatus::Unwatched),
    ];

    let merged = merge(old, &new, true);
    assert_eq!(
        merged,
        vec![
            video("A2", "a", WatchStatus::Viewed),
            video("B", "b", WatchStatus::Unwatched),
        ]
    );
}

#[test]
fn merge_keeps_missing_entries_unless_truncating() {
    let old = vec![
        video("Gone", "gone", WatchStatus::Viewed),
        video("Kept", "kept", WatchStatus::Unwatched),
    ];
    let new = vec![video("Kept", "kept", WatchStatus::Unwatched)];

    assert_eq!(titles(&merge(old.clone(), &new, false)), vec!["Gone", "Kept"]);
    assert_eq!(titles(&merge(old, &new, true)), vec!["Kept"]);
}

#[test]
fn merge_preserves_last_viewed_on_title_change() {
    let mut watched = video("Ep 1", "u1", WatchStatus::Viewed);
    watched.last_viewed = Some("2024-01-01T10:00:00+00:00".to_string());
    let new = vec![video("Episode 1", "u1", WatchStatus::Unwatched)];

    let merged = merge(vec![watched], &new, true);
    assert_eq!(merged[0].title, "Episode 1");
    assert_eq!(merged[0].status, WatchStatus::Viewed);
    assert_eq!(
        merged[0].last_viewed.as_deref(),
        Some("2024-01-01T10:00:00+00:00")
    );
}

#[test]
fn merge_is_idempotent_with_truncate() {
    let old = vec![
        video("c", "3", WatchStatus::Viewed),
        video("x", "9", WatchStatus::Unwatched),
        video("a", "1", WatchStatus::Unwatched),
    ];
    let new = vec![
        video("a", "1", WatchStatus::Unwatched),
        video("b", "2", WatchStatus::Unwatched),
        video("c", "3", WatchStatus::Unwatched),
    ];

    let once = merge(old, &new, true);
    let twice = merge(once.clone(), &new, true);
    assert_eq!(once, twice);
}

#[test]
fn merge_never_duplicates_urls() {
    let old = vec![
        video("A", "a", WatchStatus::Viewed),
        video("A again", "a", WatchStatus::Unwatched),
    ];
    let new = vec![
        video("A", "a", WatchStatus::Unwatched),
        video("A late", "a", WatchStatus::Unwatched),
        video("B", "b", WatchStatus::Unwatched),
        video("B", "b", WatchStatus::Unwatched),
    ];

    let merged = merge(old, &new, false);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].title, "A late");
    assert_eq!(merged[0].status, WatchStatus::Viewed);
}

#[test]
fn merge_sorts_case_sensitively() {
    let new = vec![
        video("beta", "b", WatchStatus::Unwatched),
        video("Alpha", "a", WatchStatus::Unwatched),
        video("Zulu", "z", WatchStatus::Unwatched),
    ];
    assert_eq!(
        titles(&merge(Vec::new(), &new, false)),
        vec!["Alpha", "Zulu", "beta"]
    );
}

#[test]
fn merge_preserve_order_appends_only_unseen_urls() {
    let old = vec![Entry::new("Z", "z"), Entry::new("A", "a")];
    let new = vec![Entry::new("A dup", "a"), Entry::new("M", "m")];

    let merged = merge_preserve_order(old, &new);
    assert_eq!(
        merged,
        vec![Entry::new("Z", "z"), Entry::new("A", "a"), Entry::new("M", "m")]
    );
}

#[test]
fn history_round_trips_disk_layout() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("history.json");
    fs::write(
        &path,
        r#"{
            "current": {"video_title": "E1", "video_url": "v1",
                        "playlist_title": "Show", "playlist_url": "p1"},
            "playlists": [{
                "playlist_title": "Show", "playlist_url": "p1",
                "videos": [{"video_title": "E1", "video_url": "v1", "status": "viewed",
                            "last_viewed": "2024-02-03T04:05:06+00:00"}],
                "last_updated": "2024-02-03T04:05:06+00:00"
            }]
        }"#,
    )
    .expect("write history");

    let store = HistoryStore::open(&path).expect("history should load");
    assert!(store.exists());
    assert_eq!(store.search("v1"), Some((0, 0)));
    assert_eq!(store.search("missing"), None);
    assert!(store.status_of("v1").is_viewed());
    assert_eq!(
        store.record().current_playlist().map(|p| p.title.as_str()),
        Some("Show")
    );
}

#[test]
fn history_missing_file_is_empty_not_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let store = HistoryStore::open(&dir.path().join("history.json")).expect("missing is fine");
    assert!(!store.exists());
    assert_eq!(store.record().current, Current::default());
    assert!(store.record().playlists.is_empty());
}

#[test]
fn history_missing_required_key_is_structural_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("history.json");
    fs::write(&path, r#"{"current": {}}"#).expect("write");

    let err = HistoryStore::open(&path).expect_err("missing playlists must fail");
    assert!(matches!(err, StoreError::InvalidHistory { .. }));
    assert!(err.to_string().contains("history.json"));
}

#[test]
fn history_garbage_is_structural_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("history.json");
    fs::write(&path, "not json").expect("write");
    assert!(matches!(
        HistoryStore::open(&path),
        Err(StoreError::InvalidHistory { .. })
    ));
}

#[test]
fn record_selection_creates_playlist_and_persists() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("history.json");
    let mut store = HistoryStore::open(&path).expect("open");

    let videos = vec![
        Video::fresh("E2", "v2"),
        Video::fresh("E1", "v1"),
    ];
    let current = Current::new(&Entry::new("E1", "v1"), &Entry::new("Show", "p1"));
    store
        .record_selection(current, &videos, false)
        .expect("record selection");

    let reloaded = HistoryStore::open(&path).expect("reload");
    let playlist = reloaded.record().current_playlist().expect("current playlist");
    assert_eq!(titles(&playlist.videos), vec!["E1", "E2"]);
    assert!(playlist.last_updated.is_some());
    assert_eq!(reloaded.record().current.video_url.as_deref(), Some("v1"));
}

#[test]
fn record_selection_repairs_dangling_current_video() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("history.json");
    let mut store = HistoryStore::open(&path).expect("open");

    let current = Current::new(&Entry::new("Lonely", "v9"), &Entry::new("Show", "p1"));
    store
        .record_selection(current, &[Video::fresh("E1", "v1")], false)
        .expect("record selection");

    assert!(store.search("v9").is_some());
    assert!(store.search("v1").is_some());
}

#[test]
fn mark_viewed_stamps_video_and_playlist() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("history.json");
    let mut store = HistoryStore::open(&path).expect("open");
    let current = Current::new(&Entry::new("E1", "v1"), &Entry::new("Show", "p1"));
    store
        .record_selection(current, &[Video::fresh("E1", "v1")], false)
        .expect("record");

    assert!(store.mark_viewed("v1").expect("mark"));
    let playlist = &store.record().playlists[0];
    assert!(playlist.videos[0].status.is_viewed());
    assert!(playlist.videos[0].last_viewed.is_some());
    assert!(playlist.last_viewed.is_some());

    assert!(store.clear_viewed("v1").expect("clear"));
    let video = &store.record().playlists[0].videos[0];
    assert_eq!(video.status, WatchStatus::Unwatched);
    assert!(video.last_viewed.is_none());

    assert!(!store.mark_viewed("unknown").expect("unknown url"));
}

#[test]
fn cleared_status_serializes_as_empty_string_without_timestamp() {
    let mut watched = video("E1", "v1", WatchStatus::Viewed);
    watched.last_viewed = Some("2024-01-01T00:00:00+00:00".to_string());
    watched.status = WatchStatus::Unwatched;
    watched.last_viewed = None;

    let json = serde_json::to_value(&watched).expect("serialize");
    assert_eq!(json["status"], "");
    assert!(json.get("last_viewed").is_none());
}

fn playlist_viewed_at(title: &str, stamp: Option<&str>) -> Playlist {
    let mut playlist = Playlist::new(title, format!("url-{title}"));
    playlist.videos = vec![
        video("seen", &format!("{title}-seen"), WatchStatus::Viewed),
        video("new", &format!("{title}-new"), WatchStatus::Unwatched),
    ];
    playlist.last_viewed = stamp.map(str::to_string);
    playlist
}

fn seeded_store(dir: &TempDir) -> HistoryStore {
    let path = dir.path().join("history.json");
    let record = HistoryRecord {
        current: Current::default(),
        playlists: vec![
            playlist_viewed_at("old", Some("2023-01-01T00:00:00+00:00")),
            playlist_viewed_at("never", None),
            playlist_viewed_at("recent", Some("2024-06-01T00:00:00+00:00")),
        ],
    };
    save_history(&path, &record).expect("seed");
    HistoryStore::open(&path).expect("open")
}

#[test]
fn clear_playlist_mode_keeps_only_recent() {
    let dir = TempDir::new().expect("tempdir");
    let mut store = seeded_store(&dir);
    store.clear(ClearMode::Playlist, 1).expect("clear");
    let kept: Vec<&str> = store
        .record()
        .playlists
        .iter()
        .map(|p| p.title.as_str())
        .collect();
    assert_eq!(kept, vec!["recent"]);
}

#[test]
fn clear_videos_mode_empties_older_playlists() {
    let dir = TempDir::new().expect("tempdir");
    let mut store = seeded_store(&dir);
    store.clear(ClearMode::Videos, 1).expect("clear");
    let playlists = &store.record().playlists;
    assert_eq!(playlists.len(), 3);
    assert_eq!(playlists[0].title, "recent");
    assert_eq!(playlists[0].videos.len(), 2);
    assert!(playlists[1..].iter().all(|p| p.videos.is_empty()));
}

#[test]
fn clear_unwatched_mode_drops_unviewed_videos_from_older_playlists() {
    let dir = TempDir::new().expect("tempdir");
    let mut store = seeded_store(&dir);
    store.clear(ClearMode::Unwatched, 0).expect("clear");
    for playlist in &store.record().playlists {
        assert_eq!(titles(&playlist.videos), vec!["seen"]);
    }
}

#[test]
fn clear_keeps_the_current_video_inside_its_playlist_in_every_mode() {
    for mode in [ClearMode::Playlist, ClearMode::Videos, ClearMode::Unwatched] {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("history.json");
        let record = HistoryRecord {
            current: Current {
                video_title: Some("new".to_string()),
                video_url: Some("old-new".to_string()),
                playlist_title: Some("old".to_string()),
                playlist_url: Some("url-old".to_string()),
            },
            playlists: vec![
                playlist_viewed_at("old", Some("2023-01-01T00:00:00+00:00")),
                playlist_viewed_at("recent", Some("2024-06-01T00:00:00+00:00")),
            ],
        };
        save_history(&path, &record).expect("seed");
        let mut store = HistoryStore::open(&path).expect("open");

        store.clear(mode, 1).expect("clear");

        let reopened = HistoryStore::open(&path).expect("reopen");
        let (p_idx, _) = reopened
            .search("old-new")
            .unwrap_or_else(|| panic!("current video lost after {mode:?}"));
        assert_eq!(reopened.record().playlists[p_idx].url, "url-old");
    }
}

#[test]
fn bookmark_missing_file_has_required_categories() {
    let dir = TempDir::new().expect("tempdir");
    let store = BookmarkStore::open(&dir.path().join("bookmark.json")).expect("open");
    for category in REQUIRED_CATEGORIES {
        assert!(store.categories().contains_key(category));
    }
}

#[test]
fn bookmark_missing_required_category_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("bookmark.json");
    fs::write(&path, r#"{"bookmark": {}}"#).expect("write");
    let err = BookmarkStore::open(&path).expect_err("completed is required");
    assert!(matches!(err, StoreError::InvalidBookmarks { .. }));
    assert!(err.to_string().contains("completed"));
}

#[test]
fn bookmark_toggle_is_its_own_inverse() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("bookmark.json");
    let mut store = BookmarkStore::open(&path).expect("open");
    let entry = Entry::new("Show", "https://example.test/show");

    for category in [PRIMARY_CATEGORY, COMPLETED_CATEGORY] {
        assert_eq!(store.toggle(&entry, category, false).expect("add"), Toggled::Added);
        assert!(store.is_member(&entry.url, category));
        assert_eq!(
            store.toggle(&entry, category, false).expect("remove"),
            Toggled::Removed
        );
        assert!(!store.is_member(&entry.url, category));
    }
}

#[test]
fn bookmark_title_collision_overwrites_url() {
    let dir = TempDir::new().expect("tempdir");
    let mut store = BookmarkStore::open(&dir.path().join("bookmark.json")).expect("open");
    store
        .toggle(&Entry::new("Same", "u1"), PRIMARY_CATEGORY, false)
        .expect("first");
    store
        .toggle(&Entry::new("Same", "u2"), PRIMARY_CATEGORY, false)
        .expect("second");
    assert!(!store.is_member("u1", PRIMARY_CATEGORY));
    assert!(store.is_member("u2", PRIMARY_CATEGORY));
}

#[test]
fn bookmark_unknown_category_needs_create_flag() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("bookmark.json");
    let mut store = BookmarkStore::open(&path).expect("open");
    let entry = Entry::new("Show", "u");

    assert!(matches!(
        store.toggle(&entry, "later", false),
        Err(CategoryError::Missing(name)) if name == "later"
    ));
    assert_eq!(store.toggle(&entry, "later", true).expect("create"), Toggled::Added);

    let reloaded = BookmarkStore::open(&path).expect("reload");
    assert!(reloaded.is_member("u", "later"));
}

#[test]
fn catalog_cache_uses_pair_arrays() {
    let dir = TempDir::new().expect("tempdir");
    let cache = CatalogCache::new(&dir.path().join("playlists.json"));
    assert!(cache.load().expect("load").is_none());

    cache
        .save(&[Entry::new("Show", "https://example.test/p")])
        .expect("save");
    let raw = fs::read_to_string(cache.path()).expect("read");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(parsed[0][0], "Show");
    assert_eq!(parsed[0][1], "https://example.test/p");

    assert!(cache.clear().expect("clear"));
    assert!(!cache.clear().expect("clear again"));
}

#[test]
fn source_list_writes_template_and_counts_changes() {
    let dir = TempDir::new().expect("tempdir");
    let sources = SourceList::new(&dir.path().join("channel_sources.txt"));

    assert!(sources.load().expect("load").is_empty());
    let template = fs::read_to_string(sources.path()).expect("template");
    assert!(template.starts_with('#'));

    let added = sources
        .add(&["@one".to_string(), "@two".to_string(), "@one".to_string()])
        .expect("add");
    assert_eq!(added, 2);
    assert_eq!(sources.load().expect("load"), vec!["@one", "@two"]);

    let removed = sources
        .remove(&["@one".to_string(), "@missing".to_string()])
        .expect("remove");
    assert_eq!(removed, 1);
    assert_eq!(sources.load().expect("load"), vec!["@two"]);
}

#[test]
fn source_list_remove_drops_one_line_per_argument() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("channel_sources.txt");
    fs::write(&path, "# channels\n@a\n@a\n@b\n").expect("seed");
    let sources = SourceList::new(&path);

    let removed = sources.remove(&["@a".to_string()]).expect("remove");
    assert_eq!(removed, 1);
    assert_eq!(sources.load().expect("load"), vec!["@a", "@b"]);
}
