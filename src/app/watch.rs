use anyhow::{Context, Result};
use crossterm::style::Stylize;
use tracing::{info, warn};

use crate::store::{
    BookmarkStore, CatalogCache, ClearMode, Current, Entry, HistoryStore, Video,
};

use super::AppContext;
use super::browse::{BrowseOutcome, Browser, Frontend, NullHistoryStore, status_info};
use super::text::{format_last_viewed_display, search_entries, truncate};
use super::tracking::{PlaybackOutcome, Player};
use super::tui::TerminalFrontend;

type HistoryBrowser = Browser<HistoryStore, BookmarkStore, Player>;

pub(super) fn run_list(ctx: &AppContext) -> Result<()> {
    let Some(catalog) = load_catalog(ctx)? else {
        return Ok(());
    };
    browse_catalog(ctx, &catalog)
}

pub(super) fn run_search(ctx: &AppContext, query: &[String], case_sensitive: bool) -> Result<()> {
    let query = query.join(" ");
    if query.trim().is_empty() {
        println!("Empty search query.");
        return Ok(());
    }
    let Some(catalog) = load_catalog(ctx)? else {
        return Ok(());
    };
    let matches = search_entries(&catalog, &query, case_sensitive);
    info!(query = %query, case_sensitive, matches = matches.len(), "catalog searched");
    if matches.is_empty() {
        println!("No matching playlist found.");
        return Ok(());
    }
    browse_catalog(ctx, &matches)
}

pub(super) fn run_watch(ctx: &AppContext, refresh: bool) -> Result<()> {
    let mut history = HistoryStore::open(&ctx.layout.history_file())?;
    if refresh {
        refresh_current_playlist(ctx, &mut history)?;
    }
    if history.record().current_playlist().is_none() {
        println!("No current playlist in history. Run `ani-yt list` first.");
        return Ok(());
    }

    let bookmarks = BookmarkStore::open(&ctx.layout.bookmark_file())?;
    let mut browser = Browser::new(history, bookmarks, ctx.player.clone(), ctx.options.clone());
    let mut frontend = TerminalFrontend::enter()?;
    watch_loop(&mut frontend, &mut browser)
}

pub(super) fn run_resume(ctx: &AppContext) -> Result<()> {
    let history = HistoryStore::open(&ctx.layout.history_file())?;
    let Some(url) = history.record().current.video_url.clone() else {
        println!("No current video in history.");
        return Ok(());
    };

    let bookmarks = BookmarkStore::open(&ctx.layout.bookmark_file())?;
    let mut browser = Browser::new(history, bookmarks, ctx.player.clone(), ctx.options.clone());
    let mut frontend = TerminalFrontend::enter()?;
    play_and_mark(&mut frontend, &mut browser, &url)?;
    watch_loop(&mut frontend, &mut browser)
}

/// Browses a playlist straight from its URL. Nothing is recorded in history.
pub(super) fn run_playlist(ctx: &AppContext, url: &str) -> Result<()> {
    let videos = fetch_sorted_videos(ctx, url)?;
    if videos.is_empty() {
        println!("No videos found in this playlist.");
        return Ok(());
    }

    let bookmarks = BookmarkStore::open(&ctx.layout.bookmark_file())?;
    let mut browser = Browser::new(
        NullHistoryStore,
        bookmarks,
        ctx.player.clone(),
        ctx.options.clone(),
    );
    let mut frontend = TerminalFrontend::enter()?;
    let video = match browser.choose(&mut frontend, &videos, true)? {
        BrowseOutcome::Selected(video) => video,
        BrowseOutcome::Quit => return quit(&mut frontend),
    };
    frontend.suspend()?;
    let outcome = ctx.player.play(&video.url)?;
    if !outcome.success {
        println!("{}", playback_failure_message(&outcome));
    }
    Ok(())
}

pub(super) fn run_play(ctx: &AppContext, url: &str) -> Result<()> {
    let outcome = ctx.player.play(url)?;
    if !outcome.success {
        println!("{}", playback_failure_message(&outcome));
    }
    Ok(())
}

pub(super) fn run_bookmarks(ctx: &AppContext) -> Result<()> {
    let store = BookmarkStore::open(&ctx.layout.bookmark_file())?;
    for (category, items) in store.categories() {
        println!("{}", category.as_str().yellow());
        if items.is_empty() {
            println!("  (empty)");
        }
        for (title, url) in items {
            println!("  {:<50} {}", truncate(title, 50), url);
        }
    }
    Ok(())
}

pub(super) fn run_clear_history(ctx: &AppContext, mode: ClearMode, keep_recent: usize) -> Result<()> {
    let mut history = HistoryStore::open(&ctx.layout.history_file())?;
    if !history.exists() {
        println!("No history to clear.");
        return Ok(());
    }
    history.clear(mode, keep_recent)?;

    let playlists = &history.record().playlists;
    println!("History trimmed; {} playlist(s) left.", playlists.len());
    if playlists.is_empty() {
        return Ok(());
    }
    println!("{:<50} {:<8} {:<28}", "PLAYLIST", "VIDEOS", "LAST VIEWED");
    for playlist in playlists {
        let last_viewed = playlist
            .last_viewed
            .as_deref()
            .map(format_last_viewed_display)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<50} {:<8} {:<28}",
            truncate(&playlist.title, 50),
            playlist.videos.len(),
            last_viewed
        );
    }
    Ok(())
}

/// Merges a fresh fetch of the current history playlist, dropping videos the
/// source no longer lists.
pub(super) fn refresh_current_playlist(ctx: &AppContext, history: &mut HistoryStore) -> Result<()> {
    let current = &history.record().current;
    let Some(url) = current.playlist_url.clone() else {
        println!("No current playlist set in history. Skipping history update.");
        return Ok(());
    };
    let title = current.playlist_title.clone().unwrap_or_default();

    println!("Updating history playlist...");
    let videos: Vec<Video> = ctx
        .player
        .catalog()
        .playlist_videos(&url)?
        .into_iter()
        .map(Video::from)
        .collect();
    history.refresh_playlist(&title, &url, &videos, true)?;
    println!("Done!");
    Ok(())
}

fn load_catalog(ctx: &AppContext) -> Result<Option<Vec<Entry>>> {
    let cache = CatalogCache::new(&ctx.layout.playlist_cache_file());
    match cache.load()? {
        Some(entries) if !entries.is_empty() => Ok(Some(entries)),
        _ => {
            println!(
                "No cached playlists found. Run `ani-yt --channel <CHANNEL>` or `ani-yt source update` first."
            );
            Ok(None)
        }
    }
}

fn fetch_sorted_videos(ctx: &AppContext, playlist_url: &str) -> Result<Vec<Entry>> {
    let mut videos = ctx
        .player
        .catalog()
        .playlist_videos(playlist_url)
        .context("failed to fetch playlist videos")?;
    videos.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(videos)
}

/// Playlist pick, video pick, then the watch loop over that playlist.
fn browse_catalog(ctx: &AppContext, catalog: &[Entry]) -> Result<()> {
    let history = HistoryStore::open(&ctx.layout.history_file())?;
    let bookmarks = BookmarkStore::open(&ctx.layout.bookmark_file())?;
    let mut frontend = TerminalFrontend::enter()?;

    let mut playlists = Browser::new(
        NullHistoryStore,
        bookmarks,
        ctx.player.clone(),
        ctx.options.clone(),
    );
    let playlist = match playlists.choose(&mut frontend, catalog, false)? {
        BrowseOutcome::Selected(playlist) => playlist,
        BrowseOutcome::Quit => return quit(&mut frontend),
    };

    let videos = fetch_sorted_videos(ctx, &playlist.url)?;
    if videos.is_empty() {
        frontend.suspend()?;
        println!("No videos found in {}.", playlist.title);
        return Ok(());
    }

    let options = playlists.options().clone();
    let bookmarks = playlists.into_bookmarks();
    let mut browser = Browser::new(history, bookmarks, ctx.player.clone(), options);
    let video = match browser.choose(&mut frontend, &videos, true)? {
        BrowseOutcome::Selected(video) => video,
        BrowseOutcome::Quit => return quit(&mut frontend),
    };

    let fetched: Vec<Video> = videos.into_iter().map(Video::from).collect();
    browser
        .history_mut()
        .record_selection(Current::new(&video, &playlist), &fetched, false)?;
    play_and_mark(&mut frontend, &mut browser, &video.url)?;
    watch_loop(&mut frontend, &mut browser)
}

/// Keeps offering the current history playlist until the user quits.
fn watch_loop(frontend: &mut TerminalFrontend, browser: &mut HistoryBrowser) -> Result<()> {
    loop {
        let Some(playlist) = browser.history().record().current_playlist() else {
            frontend.suspend()?;
            println!("Current playlist not found in history.");
            return Ok(());
        };
        let items: Vec<Entry> = playlist.videos.iter().map(Video::entry).collect();

        let video = match browser.choose(frontend, &items, false)? {
            BrowseOutcome::Selected(video) => video,
            BrowseOutcome::Quit => return quit(frontend),
        };
        browser
            .history_mut()
            .set_current_video(&video.title, &video.url)?;
        play_and_mark(frontend, browser, &video.url)?;
    }
}

/// Plays `url` outside the browser screen and records the result.
fn play_and_mark(
    frontend: &mut impl Frontend,
    browser: &mut HistoryBrowser,
    url: &str,
) -> Result<()> {
    frontend.suspend()?;
    let outcome = browser.preview().play(url);
    frontend.resume()?;
    let outcome = outcome?;

    if outcome.success {
        if browser.history_mut().mark_viewed(url)? {
            browser.set_status(status_info("Playback finished; marked viewed."));
        } else {
            browser.set_status(status_info("Playback finished."));
        }
    } else {
        warn!(url, "playback did not finish, history unchanged");
        browser.post_notice(format!(
            "{}\n\nPress any key to continue.",
            playback_failure_message(&outcome)
        ));
    }
    Ok(())
}

fn playback_failure_message(outcome: &PlaybackOutcome) -> String {
    match outcome.failure_detail.as_deref() {
        Some(detail) => format!("Playback failed/interrupted: {detail}. Progress not updated."),
        None => "Playback failed/interrupted. Progress not updated.".to_string(),
    }
}

fn quit(frontend: &mut impl Frontend) -> Result<()> {
    frontend.suspend()?;
    super::quit()
}
