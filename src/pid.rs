use anyhow::{bail, Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_PID_FILE: &str = "pricing-sim.pid";

/// PID file manager with exclusive locking
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
    file: File,
}

impl PidFile {
    /// Create and lock a PID file, replacing a stale one left by a dead
    /// process
    pub fn create(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(Self::default_pid_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create PID file directory: {:?}", parent))?;
        }

        // Not truncated on open: the old PID is needed if the lock is held
        #[allow(clippy::suspicious_open_options)]
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("Failed to open PID file: {:?}", path))?;

        if file.try_lock_exclusive().is_err() {
            let old_pid = Self::read_pid_from_file(&mut file)
                .context("PID file is locked but holds no readable PID")?;
            if Self::is_process_running(old_pid) {
                bail!("Pricing simulator already running (PID: {})", old_pid);
            }

            warn!("Replacing stale PID file (PID {} is not running)", old_pid);
            file.lock_exclusive()
                .context("Failed to lock PID file after detecting stale PID")?;
        }
        info!("Acquired PID file lock: {:?}", path);

        let pid = std::process::id();
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        writeln!(file, "{}", pid)?;
        file.flush()?;

        info!("PID file created with PID: {}", pid);

        Ok(PidFile { path, file })
    }

    /// Read PID from an existing PID file (for the reload command)
    pub fn read(path: Option<PathBuf>) -> Result<u32> {
        let path = path.unwrap_or_else(Self::default_pid_path);

        if !path.exists() {
            bail!("PID file not found: {:?}. Is the server running?", path);
        }

        let mut file = File::open(&path)
            .with_context(|| format!("Failed to open PID file: {:?}", path))?;

        Self::read_pid_from_file(&mut file)
    }

    /// Read PID from a file handle
    fn read_pid_from_file(file: &mut File) -> Result<u32> {
        file.seek(SeekFrom::Start(0))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        contents
            .trim()
            .parse::<u32>()
            .with_context(|| format!("Invalid PID in file: '{}'", contents.trim()))
    }

    /// Check if a process with the given PID is running
    #[cfg(unix)]
    fn is_process_running(pid: u32) -> bool {
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        // A `None` signal only probes for existence
        match kill(Pid::from_raw(pid as i32), None) {
            Ok(_) => true,
            Err(nix::errno::Errno::ESRCH) => false, // No such process
            Err(nix::errno::Errno::EPERM) => true,  // Process exists but no permission
            Err(_) => false,
        }
    }

    #[cfg(not(unix))]
    fn is_process_running(_pid: u32) -> bool {
        warn!("Process detection not implemented for this platform");
        false
    }

    /// `./run/pricing-sim.pid` when `./run` exists or can be created,
    /// otherwise `./pricing-sim.pid`
    fn default_pid_path() -> PathBuf {
        let run_dir = Path::new("./run");
        if run_dir.is_dir() || std::fs::create_dir_all(run_dir).is_ok() {
            run_dir.join(DEFAULT_PID_FILE)
        } else {
            PathBuf::from(DEFAULT_PID_FILE)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            warn!("Failed to unlock PID file: {}", e);
        }

        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to remove PID file {:?}: {}", self.path, e);
        } else {
            info!("PID file removed: {:?}", self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_create_and_drop_pid_file() {
        let dir = tempfile::tempdir().unwrap();
        let pid_path = dir.path().join("pricing-sim.pid");

        let pid_file = PidFile::create(Some(pid_path.clone())).unwrap();
        assert_eq!(pid_file.path(), pid_path.as_path());

        let written: u32 = fs::read_to_string(&pid_path).unwrap().trim().parse().unwrap();
        assert_eq!(written, std::process::id());

        drop(pid_file);
        assert!(!pid_path.exists());
    }

    #[test]
    fn test_read_pid_file() {
        let dir = tempfile::tempdir().unwrap();
        let pid_path = dir.path().join("pricing-sim.pid");
        fs::write(&pid_path, "12345\n").unwrap();

        assert_eq!(PidFile::read(Some(pid_path)).unwrap(), 12345);
    }

    #[test]
    fn test_read_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let pid_path = dir.path().join("pricing-sim.pid");
        fs::write(&pid_path, "not-a-pid").unwrap();

        let err = PidFile::read(Some(pid_path)).unwrap_err();
        assert!(err.to_string().contains("Invalid PID"));
    }

    #[test]
    fn test_read_nonexistent_pid_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PidFile::read(Some(dir.path().join("missing.pid"))).is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_is_process_running() {
        assert!(PidFile::is_process_running(std::process::id()));
        assert!(!PidFile::is_process_running(999999));
    }

    #[test]
    fn test_second_server_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let pid_path = dir.path().join("pricing-sim.pid");

        let _first = PidFile::create(Some(pid_path.clone())).unwrap();

        let result = PidFile::create(Some(pid_path));
        assert!(result.unwrap_err().to_string().contains("already running"));
    }
}
