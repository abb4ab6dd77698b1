//! File logging via tracing.
//!
//! The terminal belongs to the TUI, so log lines go to a daily rolling
//! file instead. Failing to set up logging is never fatal.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log file prefix; the appender adds a date suffix.
pub const LOG_FILE_NAME: &str = "diskpart-tui.log";

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "diskpart_tui=info";

/// Keeps the background writer alive. Drop it last.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Default log directory: `<data-local>/diskpart-tui/logs`.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("diskpart-tui")
        .join("logs")
}

/// Install the global subscriber. Returns None if logging is unavailable.
pub fn init(log_dir: Option<PathBuf>) -> Option<LoggingGuard> {
    let log_dir = log_dir.unwrap_or_else(default_log_dir);
    let log_dir = match std::fs::create_dir_all(&log_dir) {
        Ok(()) => log_dir,
        Err(_) => {
            let dir = std::env::temp_dir().join("diskpart-tui").join("logs");
            std::fs::create_dir_all(&dir).ok()?;
            dir
        }
    };

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_dir_is_namespaced() {
        let dir = default_log_dir();
        assert!(dir.ends_with("diskpart-tui/logs"));
    }
}
