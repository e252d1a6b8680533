//! Tracing setup for hosts embedding the studio.

use std::path::Path;
use studio_core::error::{Result, StudioError};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,studio=debug";

/// Keeps the file writer flushing; drop it on shutdown.
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Installs the global subscriber: console output plus, with `log_dir`, a
/// daily rolling `studio.log`.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(log_dir: Option<&Path>) -> Result<LoggingGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let mut file_guard = None;
    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "studio.log");
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            file_guard = Some(guard);
            Some(fmt::layer().with_writer(file_writer).with_ansi(false))
        }
        None => None,
    };

    let console_layer = fmt::layer().with_target(true).compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| StudioError::internal(format!("Failed to install tracing subscriber: {e}")))?;

    tracing::debug!(file_logging = log_dir.is_some(), "Tracing initialized");
    Ok(LoggingGuard { _file: file_guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_fails() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        let _guard = init_logging(Some(&log_dir)).unwrap();
        assert!(log_dir.is_dir());

        let err = init_logging(None).err().unwrap();
        assert!(matches!(err, StudioError::Internal(_)));
    }
}
