use anyhow::Result;
use colored::Colorize;
use pricing_simulator::{config::Config, server};
use std::path::PathBuf;
use tracing::info;

use crate::pid::PidFile;

/// Execute the start command
///
/// Takes the PID file lock, then serves until SIGTERM/SIGINT.
pub async fn execute(cfg: Config, pid_file: Option<PathBuf>) -> Result<()> {
    println!("{}", "Starting pricing simulator...".green());
    info!(
        "Serving {}:{} with catalogs from {}",
        cfg.server.host,
        cfg.server.port,
        cfg.catalog.data_dir.display()
    );

    // Held until the server returns; dropping it removes the file
    let _pid_file = PidFile::create(pid_file)?;

    server::start_server(cfg).await
}
