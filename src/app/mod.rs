mod browse;
mod sources;
mod text;
mod tracking;
mod tui;
mod watch;


use std::process;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::paths::DataLayout;

use self::browse::DisplayOptions;
use self::tracking::{Player, YtDlp};

/// What every flow needs: where the files live, how to page and how to play.
pub(crate) struct AppContext {
    layout: DataLayout,
    options: DisplayOptions,
    player: Player,
}

impl AppContext {
    fn new(layout: DataLayout, global: &GlobalOpts) -> Self {
        let options = DisplayOptions {
            items_per_page: usize::from(global.items_per_page),
            ..DisplayOptions::default()
        };
        let player = Player::new(
            global.player_mode,
            &layout.mpv_input_conf(),
            YtDlp::from_env(),
        );
        Self {
            layout,
            options,
            player,
        }
    }
}

pub fn run(cli: Cli, layout: DataLayout) -> Result<()> {
    debug!(data_dir = %layout.root().display(), command = ?cli.command, "starting");
    let ctx = AppContext::new(layout, &cli.global);

    if let Some(channel) = cli.global.channel.as_deref() {
        sources::refresh_from_channel(&ctx, channel)?;
    }

    match cli.command {
        Some(Command::List) | None => watch::run_list(&ctx)?,
        Some(Command::Watch { refresh }) => watch::run_watch(&ctx, refresh)?,
        Some(Command::Resume) => watch::run_resume(&ctx)?,
        Some(Command::Search {
            query,
            case_sensitive,
        }) => watch::run_search(&ctx, &query, case_sensitive)?,
        Some(Command::Playlist { url }) => watch::run_playlist(&ctx, &url)?,
        Some(Command::Bookmarks) => watch::run_bookmarks(&ctx)?,
        Some(Command::ClearCache) => sources::clear_cache(&ctx)?,
        Some(Command::DeleteHistory) => sources::delete_history(&ctx)?,
        Some(Command::DeleteBookmarks) => sources::delete_bookmarks(&ctx)?,
        Some(Command::ClearHistory { mode, keep_recent }) => {
            watch::run_clear_history(&ctx, mode, keep_recent)?
        }
        Some(Command::Play { url }) => watch::run_play(&ctx, &url)?,
        Some(Command::Source(command)) => sources::run_source(&ctx, command)?,
    }

    Ok(())
}

/// Quit from inside a browse flow. The caller restores the terminal first.
fn quit() -> ! {
    info!("quit requested");
    process::exit(0)
}
