//! Log setup. The terminal belongs to the UI, so logs go to a file.

use crate::error::{AppError, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE: &str = "tarefas.log";

pub fn parse_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level.trim())
        .map_err(|_| AppError::InvalidArgument(format!("Invalid log level: {level}")))
}

/// Append logs to `tarefas.log` inside `dir`. Returns the log file path.
pub fn init(level: &str, dir: &Path) -> Result<PathBuf> {
    let level = parse_level(level)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(level)
        .try_init();
    if installed.is_ok() {
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting tarefas...");
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level(" OFF ").unwrap(), LevelFilter::OFF);
        assert!(matches!(
            parse_level("loud"),
            Err(AppError::InvalidArgument(_))
        ));
    }
}
