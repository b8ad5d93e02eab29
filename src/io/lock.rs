use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Advisory lock serializing read-modify-write cycles on a task file.
///
/// Uses platform-native flock (Unix) so the TUI, the CLI and the reporter
/// never interleave writes to the same store.
pub struct FileLock {
    _file: File,
    path: PathBuf,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not acquire lock on {path}: another process may be writing the task file")]
    Timeout { path: PathBuf },
}

/// Path of the lock file guarding `store_path` (`dir/.tasks.json.lock`)
pub fn lock_path_for(store_path: &Path) -> PathBuf {
    let name = store_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("tasks.json");
    store_path.with_file_name(format!(".{}.lock", name))
}

impl FileLock {
    /// Acquire the lock for a task file.
    /// Blocks up to `timeout` waiting for the lock.
    pub fn acquire(store_path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let lock_path = lock_path_for(store_path);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| LockError::CreateError {
                path: lock_path.clone(),
                source: e,
            })?;

        let start = Instant::now();
        loop {
            match try_lock(&file) {
                Ok(()) => {
                    tracing::debug!("locked {}", lock_path.display());
                    return Ok(FileLock {
                        _file: file,
                        path: lock_path,
                    });
                }
                Err(_) if start.elapsed() < timeout => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(_) => {
                    return Err(LockError::Timeout { path: lock_path });
                }
            }
        }
    }

    /// Acquire with default timeout (5 seconds)
    pub fn acquire_default(store_path: &Path) -> Result<Self, LockError> {
        Self::acquire(store_path, Duration::from_secs(5))
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // flock is released on close. Never unlink: a waiter may hold the same inode.
        tracing::debug!("unlocked {}", self.path.display());
    }
}

/// Try to acquire an exclusive flock on the file (non-blocking)
#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}
