//! Tracing subscriber setup for the binary

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LOG_FILTER_ENV, LogFormat};

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("log path has no file name: {0}")]
    NoFileName(PathBuf),

    #[error("failed to create log directory: {0}")]
    CreateDir(#[from] std::io::Error),

    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global subscriber writing to `log_path`.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the background writer.
pub fn init(log_path: &Path, format: LogFormat) -> Result<WorkerGuard, LoggingError> {
    let file_name = log_path
        .file_name()
        .ok_or_else(|| LoggingError::NoFileName(log_path.to_path_buf()))?;
    let dir = log_path.parent().unwrap_or_else(|| Path::new("."));

    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_rejects_path_without_file_name() {
        let result = init(Path::new("/"), LogFormat::Text);

        assert!(matches!(result, Err(LoggingError::NoFileName(_))));
    }
}
