mod app;
mod cli;
mod logging;
mod paths;
mod store;

use anyhow::Result;
use clap::Parser;

use crate::paths::DataLayout;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let layout = DataLayout::resolve(cli.global.data_dir.as_deref())?;
    let _log_guard = logging::init(&layout.log_dir());
    app::run(cli, layout)
}
