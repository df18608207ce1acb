//! Tracing setup
//!
//! Events go to stderr and, when configured, to a daily-rotated log file.
//! Rotated files are named `<file name>.YYYY-MM-DD`; only the newest
//! `MAX_LOG_FILES` are kept.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "homework_bot=debug,homework_client=info";

/// Number of rotated log files kept on disk
pub const MAX_LOG_FILES: usize = 5;

/// Installs the global tracing subscriber
///
/// `RUST_LOG` overrides the default filter.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let appender = rolling_appender(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(appender))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

/// Builds a daily appender writing next to `path`, using its file name as prefix
fn rolling_appender(path: &Path) -> Result<RollingFileAppender> {
    let (directory, prefix) = split_log_path(path)?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(MAX_LOG_FILES)
        .build(&directory)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

fn split_log_path(path: &Path) -> Result<(PathBuf, String)> {
    let prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?
        .to_string();

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((directory, prefix))
}
