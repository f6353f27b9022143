use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::store::ClearMode;

#[derive(Debug, Parser)]
#[command(
    name = "ani-yt",
    version,
    about = "Browse YouTube playlists page by page and resume where you left off"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Directory holding history, bookmarks, cache and logs.
    #[arg(long, global = true, env = "ANI_YT_DATA_DIR", value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = PlayerMode::Auto)]
    pub player_mode: PlayerMode,

    #[arg(
        long,
        global = true,
        default_value_t = 12,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub items_per_page: u16,

    /// Refresh the playlist cache from this channel before running the command.
    #[arg(long, short = 'c', global = true, value_name = "CHANNEL")]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerMode {
    /// Android intent on Android kernels, mpv everywhere else.
    Auto,
    /// mpv in the current terminal.
    Default,
    /// The mpv-android app through `am start`.
    Android,
    /// Print the player commands instead of running them.
    Ssh,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pick a cached playlist, then a video (default).
    List,
    /// Keep playing through the current playlist.
    Watch {
        /// Merge a fresh fetch of the playlist into history first.
        #[arg(long)]
        refresh: bool,
    },
    /// Play the last selected video, then continue with the playlist.
    Resume,
    /// Search cached playlist titles.
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(long)]
        case_sensitive: bool,
    },
    /// Browse a playlist by URL without recording history.
    Playlist { url: String },
    /// Print every bookmark category.
    Bookmarks,
    /// Remove the cached playlist list.
    ClearCache,
    DeleteHistory,
    DeleteBookmarks,
    /// Trim history down to the most recently viewed playlists.
    ClearHistory {
        #[arg(value_enum)]
        mode: ClearMode,
        #[arg(long, default_value_t = 1)]
        keep_recent: usize,
    },
    /// Play a single URL.
    Play { url: String },
    /// Manage channel sources.
    #[command(subcommand)]
    Source(SourceCommand),
}

#[derive(Debug, Subcommand)]
pub enum SourceCommand {
    Add {
        #[arg(required = true, num_args = 1..)]
        channels: Vec<String>,
    },
    Remove {
        #[arg(required = true, num_args = 1..)]
        channels: Vec<String>,
    },
    /// Write an empty sources file.
    Template,
    /// Fetch every source, merge into the cache and refresh history.
    Update,
    /// Rebuild the cache from scratch.
    Rebuild,
}
