use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::SourceCommand;
use crate::store::{
    BookmarkStore, CatalogCache, Entry, HistoryStore, SourceList, merge_preserve_order,
};

use super::AppContext;
use super::watch::refresh_current_playlist;

pub(super) fn run_source(ctx: &AppContext, command: SourceCommand) -> Result<()> {
    let sources = SourceList::new(&ctx.layout.sources_file());
    match command {
        SourceCommand::Add { channels } => {
            let added = sources.add(&channels)?;
            println!(
                "Added {added} source(s), {} already present.",
                channels.len() - added
            );
        }
        SourceCommand::Remove { channels } => {
            let removed = sources.remove(&channels)?;
            println!(
                "Removed {removed} source(s), {} not found.",
                channels.len() - removed
            );
        }
        SourceCommand::Template => {
            sources.write_template()?;
            println!("Wrote source template to {}", sources.path().display());
        }
        SourceCommand::Update => update_from_sources(ctx, &sources, true)?,
        SourceCommand::Rebuild => {
            println!("Rebuilding playlist cache from sources...");
            CatalogCache::new(&ctx.layout.playlist_cache_file()).save(&[])?;
            update_from_sources(ctx, &sources, false)?;
        }
    }
    Ok(())
}

/// Replaces the cached catalog with one channel's playlists, then refreshes
/// the current history playlist.
pub(super) fn refresh_from_channel(ctx: &AppContext, channel: &str) -> Result<()> {
    println!("Getting playlists...");
    let entries = ctx
        .player
        .catalog()
        .channel_playlists(channel)
        .with_context(|| format!("playlist info or channel not found: {channel}"))?;
    let cache = CatalogCache::new(&ctx.layout.playlist_cache_file());
    cache.save(&entries)?;
    info!(channel, playlists = entries.len(), "catalog cache replaced");
    println!("Saved {} playlist(s).", entries.len());
    refresh_history(ctx)
}

fn update_from_sources(ctx: &AppContext, sources: &SourceList, refresh: bool) -> Result<()> {
    let channels = sources.load()?;
    if channels.is_empty() {
        println!("No sources to update. Add one with `ani-yt source add <CHANNEL>`.");
        return Ok(());
    }

    println!("Getting playlists from {} channel(s)...", channels.len());
    let mut merged: Vec<Entry> = Vec::new();
    for channel in &channels {
        match ctx.player.catalog().channel_playlists(channel) {
            Ok(entries) => merged = merge_preserve_order(merged, &entries),
            Err(err) => {
                warn!(channel = %channel, error = %err, "source skipped");
                eprintln!("Warning: channel not found: {channel} ({err:#})");
            }
        }
    }

    CatalogCache::new(&ctx.layout.playlist_cache_file()).save(&merged)?;
    println!("Saved {} playlist(s).", merged.len());
    if refresh {
        refresh_history(ctx)?;
    }
    Ok(())
}

fn refresh_history(ctx: &AppContext) -> Result<()> {
    let mut history = HistoryStore::open(&ctx.layout.history_file())?;
    if !history.exists() {
        return Ok(());
    }
    refresh_current_playlist(ctx, &mut history)
}

pub(super) fn clear_cache(ctx: &AppContext) -> Result<()> {
    let cache = CatalogCache::new(&ctx.layout.playlist_cache_file());
    report_removal("Playlist cache", cache.path(), cache.clear()?);
    Ok(())
}

pub(super) fn delete_history(ctx: &AppContext) -> Result<()> {
    let path = ctx.layout.history_file();
    report_removal("History", &path, HistoryStore::delete(&path)?);
    Ok(())
}

pub(super) fn delete_bookmarks(ctx: &AppContext) -> Result<()> {
    let path = ctx.layout.bookmark_file();
    report_removal("Bookmarks", &path, BookmarkStore::delete(&path)?);
    Ok(())
}

fn report_removal(what: &str, path: &std::path::Path, removed: bool) {
    if removed {
        info!(path = %path.display(), "{what} removed");
        println!("{what} removed: {}", path.display());
    } else {
        println!("{what} not found: {}", path.display());
    }
}
