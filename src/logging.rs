use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Directory the log file lives in: `$XDG_STATE_HOME/pasteplay`, falling back
/// to the local data dir and finally the temp dir.
pub fn log_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("pasteplay")
}

/// Initialize structured logging to `pasteplay.log` in [`log_dir`].
///
/// The terminal belongs to the TUI, so nothing is written to stdout/stderr.
/// `RUST_LOG` overrides the default filter.
pub fn init_logging() -> Result<PathBuf> {
    let dir = log_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let log_file_path = dir.join("pasteplay.log");

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .with_context(|| format!("failed to open log file {}", log_file_path.display()))?;

    let writer = BoxMakeWriter::new(Mutex::new(file));

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pasteplay=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    tracing::info!("pasteplay logging initialized at {}", log_file_path.display());

    Ok(log_file_path)
}
