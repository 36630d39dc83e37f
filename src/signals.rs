use anyhow::{bail, Result};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};

#[cfg(unix)]
use nix::libc;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use crate::catalog::CatalogService;

/// Shutdown signal types
#[derive(Debug, Clone, Copy)]
pub enum ShutdownSignal {
    /// Graceful shutdown (drain connections, clean up)
    Graceful,
}

/// Setup signal handlers for the server
///
/// Returns a broadcast sender for shutdown signals and a join handle for the signal task
///
/// Handles:
/// - SIGTERM/SIGINT: Graceful shutdown
/// - SIGHUP: Re-read both catalog workbooks
#[cfg(unix)]
pub fn setup_signal_handlers(
    catalogs: Arc<CatalogService>,
) -> Result<(broadcast::Sender<ShutdownSignal>, tokio::task::JoinHandle<()>)> {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("SIGTERM received, initiating graceful shutdown");
                    let _ = tx_clone.send(ShutdownSignal::Graceful);
                    break;
                }
                _ = sigint.recv() => {
                    info!("SIGINT received, initiating graceful shutdown");
                    let _ = tx_clone.send(ShutdownSignal::Graceful);
                    break;
                }
                _ = sighup.recv() => {
                    info!("SIGHUP received, reloading catalogs");
                    if let Err(e) = catalogs.reload().await {
                        error!("Failed to reload catalogs, keeping previous data: {}", e);
                    }
                }
            }
        }
    });

    Ok((shutdown_tx, handle))
}

/// Only Ctrl+C is available off unix; catalogs are reloaded by restarting
#[cfg(not(unix))]
pub fn setup_signal_handlers(
    _catalogs: Arc<CatalogService>,
) -> Result<(broadcast::Sender<ShutdownSignal>, tokio::task::JoinHandle<()>)> {
    let (shutdown_tx, _) = broadcast::channel(16);
    let tx_clone = shutdown_tx.clone();

    let handle = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl+C received, initiating shutdown");
                let _ = tx_clone.send(ShutdownSignal::Graceful);
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        }
    });

    Ok((shutdown_tx, handle))
}

/// Send a signal to a process by PID (for the reload command).
/// Only SIGHUP is supported; the server is stopped with Ctrl+C or `kill`.
#[cfg(unix)]
pub fn send_signal_to_pid(pid: u32, signal_kind: SignalKind) -> Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let nix_signal = match signal_kind.as_raw_value() {
        libc::SIGHUP => Signal::SIGHUP,
        _ => bail!("Unsupported signal: {:?}", signal_kind),
    };

    info!("Sending signal {:?} to PID {}", nix_signal, pid);

    kill(Pid::from_raw(pid as i32), nix_signal)
        .map_err(|e| anyhow::anyhow!("Failed to send signal to PID {}: {}", pid, e))?;

    Ok(())
}

#[cfg(not(unix))]
pub fn send_signal_to_pid(_pid: u32, _signal_kind: ()) -> Result<()> {
    bail!("Signal sending not supported on this platform");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemorySource;

    fn catalogs() -> Arc<CatalogService> {
        Arc::new(CatalogService::new(
            Arc::new(MemorySource::default()),
            Arc::new(MemorySource::default()),
        ))
    }

    #[tokio::test]
    async fn test_setup_signal_handlers() {
        let (shutdown_tx, _handle) = setup_signal_handlers(catalogs()).unwrap();

        let mut rx = shutdown_tx.subscribe();
        shutdown_tx.send(ShutdownSignal::Graceful).unwrap();

        let received = rx.recv().await.unwrap();
        assert!(matches!(received, ShutdownSignal::Graceful));
    }

    #[cfg(unix)]
    #[test]
    fn test_only_reload_signal_is_sent() {
        let pid = std::process::id();
        for kind in [
            SignalKind::terminate(),
            SignalKind::interrupt(),
            SignalKind::from_raw(libc::SIGCONT),
        ] {
            let err = send_signal_to_pid(pid, kind).unwrap_err();
            assert!(err.to_string().contains("Unsupported signal"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_send_signal_to_nonexistent_process() {
        let err = send_signal_to_pid(999999, SignalKind::hangup()).unwrap_err();
        assert!(err.to_string().contains("Failed to send signal"));
    }
}
