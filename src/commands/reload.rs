use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use crate::pid::PidFile;

/// Execute the reload command
///
/// Sends SIGHUP to the running server, which re-reads both workbooks and
/// keeps its previous catalogs if a workbook fails to load.
pub fn execute(pid_file: Option<PathBuf>) -> Result<()> {
    #[cfg(not(unix))]
    {
        let _ = pid_file;
        anyhow::bail!("Reload command is not supported on this platform");
    }

    #[cfg(unix)]
    {
        use pricing_simulator::signals::send_signal_to_pid;
        use tokio::signal::unix::SignalKind;

        let pid = PidFile::read(pid_file)?;

        println!(
            "{} {}",
            "Reloading price catalogs".yellow(),
            format!("(PID: {})", pid).cyan()
        );

        send_signal_to_pid(pid, SignalKind::hangup())?;
        info!("SIGHUP sent to PID {}", pid);

        println!("{}", "  Reload signal sent successfully".green());
        println!(
            "  {}",
            "Note: Check server logs to verify the workbooks loaded".dimmed()
        );

        Ok(())
    }
}
