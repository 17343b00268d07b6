//! Logging setup: tracing to stderr, plus an optional debug log file.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Initialize the global subscriber.
///
/// `RUST_LOG` directives are honored on top of `level`. With `debug_file`
/// set, our own DEBUG events and request traces also go to [`debug_log_path`].
pub fn init_logging(level: Level, debug_file: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let file_layer = if debug_file {
        let file = open_debug_log()?;
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(EnvFilter::new("portman=debug,tower_http=debug")),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter))
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Get the path to the debug log file
pub fn debug_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|c| c.join("portman").join("debug.log"))
}

/// Truncate the debug log and write the startup banner.
fn open_debug_log() -> Result<fs::File> {
    let path = debug_log_path().context("No cache directory for debug log")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create debug log directory")?;
    }

    fs::write(
        &path,
        format!("=== portman debug log started at {} ===\n", Utc::now()),
    )
    .with_context(|| format!("Failed to write {}", path.display()))?;

    fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))
}
