use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Log to stderr. Used by the CLI and the reporter.
pub fn init_stderr(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level_for(verbosity)))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Path of the TUI log file kept beside the task file (`tasks.json.log`)
pub fn log_path_for(store_path: &Path) -> PathBuf {
    let mut name = store_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".log");
    store_path.with_file_name(name)
}

/// Log to a file beside the task file, so output never lands on the
/// terminal the TUI is drawing. Does nothing without `-v`.
pub fn init_file(verbosity: u8, store_path: &Path) -> io::Result<()> {
    if verbosity == 0 {
        return Ok(());
    }
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path_for(store_path))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level_for(verbosity)))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
