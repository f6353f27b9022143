use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Command as ProcessCommand;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::PlayerMode;

use super::super::browse::PreviewCapability;
use super::PlaybackOutcome;
use super::catalog::{YtDlp, resolve_bin_from_env};
use super::process::{run_interactive_cmd, spawn_detached, with_sigint_ignored};

const MPV_ANDROID_PACKAGE: &str = "is.xyz.mpv.ytdl";

pub(crate) fn resolve_mpv_bin() -> PathBuf {
    resolve_bin_from_env(env::var_os("ANI_YT_MPV_BIN"), "mpv")
}

/// Android kernels carry "android" in their release string.
pub(crate) fn is_android_kernel(osrelease: &str) -> bool {
    osrelease.to_ascii_lowercase().contains("android")
}

fn running_on_android() -> bool {
    fs::read_to_string("/proc/sys/kernel/osrelease")
        .map(|release| is_android_kernel(&release))
        .unwrap_or(false)
}

/// Launches videos (and thumbnails) in mpv or the Android mpv app.
#[derive(Debug, Clone)]
pub(crate) struct Player {
    mode: PlayerMode,
    mpv_bin: PathBuf,
    input_conf: Option<PathBuf>,
    catalog: YtDlp,
}

impl Player {
    /// `input_conf` is passed to mpv only if the file exists.
    pub(crate) fn new(mode: PlayerMode, input_conf: &Path, catalog: YtDlp) -> Self {
        Self {
            mode,
            mpv_bin: resolve_mpv_bin(),
            input_conf: input_conf.is_file().then(|| input_conf.to_path_buf()),
            catalog,
        }
    }

    pub(crate) fn catalog(&self) -> &YtDlp {
        &self.catalog
    }

    fn effective_mode(&self) -> PlayerMode {
        match self.mode {
            PlayerMode::Auto if running_on_android() => PlayerMode::Android,
            PlayerMode::Auto => PlayerMode::Default,
            mode => mode,
        }
    }

    pub(crate) fn mpv_args(&self, url: &str) -> Vec<OsString> {
        let mut args = vec![OsString::from("--save-position-on-quit=yes")];
        if let Some(conf) = &self.input_conf {
            let mut arg = OsString::from("--input-conf=");
            arg.push(conf);
            args.push(arg);
        }
        args.push(OsString::from(url));
        args
    }

    pub(crate) fn android_args(url: &str) -> Vec<String> {
        [
            "start",
            "-a",
            "android.intent.action.VIEW",
            "-t",
            "video/any",
            "-p",
            MPV_ANDROID_PACKAGE,
            "-d",
            url,
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }

    /// Plays `url` and waits for the player to exit.
    pub(crate) fn play(&self, url: &str) -> Result<PlaybackOutcome> {
        let mode = self.effective_mode();
        info!(url, ?mode, "starting playback");
        let status = match mode {
            PlayerMode::Ssh => {
                self.print_commands(url)?;
                return Ok(PlaybackOutcome::succeeded());
            }
            PlayerMode::Android => ProcessCommand::new("am")
                .args(Self::android_args(url))
                .status()
                .context("failed to launch the Android mpv app (is this Android?)")?,
            PlayerMode::Auto | PlayerMode::Default => {
                let mut cmd = ProcessCommand::new(&self.mpv_bin);
                cmd.args(self.mpv_args(url));
                let label = self.mpv_bin.display().to_string();
                with_sigint_ignored(|| run_interactive_cmd(cmd, &label))?
            }
        };

        if status.success() {
            Ok(PlaybackOutcome::succeeded())
        } else {
            warn!(url, %status, "player exited unsuccessfully");
            Ok(PlaybackOutcome::failed(format!("player exited with {status}")))
        }
    }

    fn print_commands(&self, url: &str) -> Result<()> {
        let mut mpv = vec![self.mpv_bin.to_string_lossy().into_owned()];
        mpv.extend(
            self.mpv_args(url)
                .into_iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
        let mut android = vec!["am".to_string()];
        android.extend(Self::android_args(url));

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "Copy one of the commands below:\n")?;
        writeln!(stdout, "mpv:\n\n\t{}\n", shell_join(&mpv))?;
        writeln!(stdout, "mpv-android:\n\n\t{}\n", shell_join(&android))?;
        write!(stdout, "Press Enter to continue...")?;
        stdout.flush()?;
        drop(stdout);

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        Ok(())
    }
}

fn shell_join(parts: &[String]) -> String {
    shlex::try_join(parts.iter().map(String::as_str)).unwrap_or_else(|_| parts.join(" "))
}

impl PreviewCapability for Player {
    fn show_thumbnail(&mut self, url: &str) -> Result<()> {
        let thumbnail = self.catalog.thumbnail_url(url)?;
        info!(url, thumbnail = %thumbnail, "opening thumbnail");
        match self.effective_mode() {
            PlayerMode::Ssh => bail!("thumbnails need a local player: {thumbnail}"),
            PlayerMode::Android => {
                let mut cmd = ProcessCommand::new("am");
                cmd.args(Self::android_args(&thumbnail));
                spawn_detached(cmd, "am")
            }
            PlayerMode::Auto | PlayerMode::Default => {
                let mut cmd = ProcessCommand::new(&self.mpv_bin);
                cmd.args(["--force-window=immediate", "--image-display-duration=inf"])
                    .arg(&thumbnail);
                spawn_detached(cmd, "mpv")
            }
        }
    }
}
