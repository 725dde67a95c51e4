//! Tracing setup shared by the binaries.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Overrides the log directory.
pub const LOG_DIR_ENV: &str = "SCHEMASCOPE_LOG_DIR";

/// Where and how loudly to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Directory of the daily rolling files, one family per component.
    pub dir: PathBuf,
    /// Mirror every line on stderr.
    pub to_stderr: bool,
    /// Filter used when `RUST_LOG` is unset or invalid.
    pub default_directive: String,
}

impl LogSettings {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            to_stderr: false,
            default_directive: "info".to_string(),
        }
    }

    pub fn with_stderr(mut self, to_stderr: bool) -> Self {
        self.to_stderr = to_stderr;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.default_directive))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self::new(default_log_dir())
    }
}

/// `$SCHEMASCOPE_LOG_DIR`, else `~/.schemascope/logs`.
pub fn default_log_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".schemascope").join("logs")
}

/// Installs the global subscriber for `component` and returns the file writer's guard.
///
/// Lines still buffered are lost once the guard drops. When a subscriber is
/// already installed it is left in place.
pub fn init_logging(component: &str, settings: &LogSettings) -> WorkerGuard {
    if let Err(e) = std::fs::create_dir_all(&settings.dir) {
        eprintln!("cannot create log directory {}: {}", settings.dir.display(), e);
    }

    // cli.log.2024-01-21, is-a.log.2024-01-21, ...
    let file_appender = tracing_appender::rolling::daily(&settings.dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);
    let stderr_layer = settings.to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    let installed = tracing_subscriber::registry()
        .with(settings.filter())
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
    if installed.is_err() {
        tracing::debug!("subscriber already installed, keeping it");
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_builder() {
        let settings = LogSettings::new("/tmp/schemascope-logs").with_stderr(true);
        assert_eq!(settings.dir, PathBuf::from("/tmp/schemascope-logs"));
        assert!(settings.to_stderr);
        assert_eq!(settings.default_directive, "info");
    }

    #[test]
    fn test_default_dir_ends_in_logs() {
        if std::env::var_os(LOG_DIR_ENV).is_none() {
            assert!(default_log_dir().ends_with(".schemascope/logs"));
        }
    }

    #[test]
    fn test_init_creates_directory_and_tolerates_reinit() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LogSettings::new(dir.path().join("nested").join("logs"));

        let first = init_logging("test", &settings);
        tracing::info!("hello");
        let second = init_logging("test", &settings);
        drop(second);
        drop(first);

        assert!(settings.dir.is_dir());
    }
}
