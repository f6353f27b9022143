use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ANI_YT_LOG";
const DEFAULT_FILTER: &str = "ani_yt=info";

/// Sends `tracing` output to `<log_dir>/ani-yt.log`; the terminal belongs to the browser.
///
/// Logging is best effort: if the directory cannot be created the program
/// runs without a subscriber. Keep the returned guard alive until exit so
/// buffered lines are flushed.
pub fn init(log_dir: &Path) -> Option<WorkerGuard> {
    if let Err(err) = fs::create_dir_all(log_dir) {
        eprintln!(
            "Warning: logging disabled, cannot create {}: {err}",
            log_dir.display()
        );
        return None;
    }

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let file_appender = tracing_appender::rolling::never(log_dir, "ani-yt.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|()| guard)
}
