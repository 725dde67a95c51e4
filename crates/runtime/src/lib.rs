use schemascope_api::{NoRuntimeTypes, RuntimeTypes};
use schemascope_core::logging::{LogSettings, default_log_dir};
use schemascope_java::{ClasspathTypes, find_jdk_asset};
use std::path::PathBuf;
use std::sync::Arc;

/// Classpath separated like `PATH` (`:` on Unix, `;` on Windows).
pub const CLASSPATH_ENV: &str = "SCHEMASCOPE_CLASSPATH";
/// Set to any value to leave the JDK class library off the classpath.
pub const NO_JDK_ENV: &str = "SCHEMASCOPE_NO_JDK";

/// Where runtime types are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Searched in order, before the JDK.
    pub classpath: Vec<PathBuf>,
    /// Append the JDK class library found by [`find_jdk_asset`].
    pub include_jdk: bool,
    /// Directory of the log files.
    pub log_dir: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            classpath: Vec::new(),
            include_jdk: true,
            log_dir: default_log_dir(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let classpath = std::env::var_os(CLASSPATH_ENV)
            .map(|value| {
                std::env::split_paths(&value)
                    .filter(|path| !path.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            classpath,
            include_jdk: std::env::var_os(NO_JDK_ENV).is_none(),
            log_dir: default_log_dir(),
        }
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn log_settings(&self, to_stderr: bool) -> LogSettings {
        LogSettings::new(&self.log_dir).with_stderr(to_stderr)
    }

    pub fn with_classpath(mut self, path: impl Into<PathBuf>) -> Self {
        self.classpath.push(path.into());
        self
    }

    pub fn without_jdk(mut self) -> Self {
        self.include_jdk = false;
        self
    }
}

/// Bootstraps the runtime type system described by `config`.
///
/// Entries that cannot be opened are logged and skipped. With nothing to
/// search, the result loads no classes at all.
pub fn build_default_runtime(config: &RuntimeConfig) -> Arc<dyn RuntimeTypes> {
    let mut types = ClasspathTypes::new();

    for path in &config.classpath {
        if let Err(e) = types.add_path(path) {
            tracing::warn!("Skipping classpath entry: {}", e);
        }
    }

    if config.include_jdk {
        match find_jdk_asset() {
            Some(asset) => {
                if let Err(e) = types.add_path(&asset) {
                    tracing::error!("Failed to open JDK class library: {}", e);
                }
            }
            None => tracing::warn!("No JDK found; JDK types will not resolve"),
        }
    }

    if types.entries().next().is_none() {
        tracing::info!("Empty classpath, runtime fallback disabled");
        return Arc::new(NoRuntimeTypes);
    }

    Arc::new(types)
}

/// Initializes logging for `component` into `config.log_dir`.
pub fn init_logging(component: &str, config: &RuntimeConfig, to_stderr: bool) -> Option<impl Drop + use<>> {
    Some(schemascope_core::logging::init_logging(
        component,
        &config.log_settings(to_stderr),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemascope_api::DotName;
    use tempfile::tempdir;

    #[test]
    fn test_default_includes_jdk() {
        let config = RuntimeConfig::default();
        assert!(config.include_jdk);
        assert!(config.classpath.is_empty());
    }

    #[test]
    fn test_log_dir_flows_into_settings() {
        let config = RuntimeConfig::default().with_log_dir("/var/log/schemascope");
        let settings = config.log_settings(true);
        assert_eq!(settings.dir, PathBuf::from("/var/log/schemascope"));
        assert!(settings.to_stderr);
        assert!(!config.log_settings(false).to_stderr);
    }

    #[test]
    fn test_bad_entries_are_skipped() {
        let dir = tempdir().unwrap();
        let text = dir.path().join("notes.txt");
        std::fs::write(&text, b"plain text").unwrap();

        let config = RuntimeConfig::default()
            .with_classpath(&text)
            .with_classpath(dir.path().join("missing.jar"))
            .without_jdk();
        let runtime = build_default_runtime(&config);
        assert!(runtime.load(&DotName::new("java.lang.Object")).is_err());
    }

    #[test]
    fn test_directory_entry_is_searched() {
        let dir = tempdir().unwrap();
        let config = RuntimeConfig::default()
            .with_classpath(dir.path())
            .without_jdk();
        let runtime = build_default_runtime(&config);
        assert!(runtime.load(&DotName::new("app.Nothing")).is_err());
    }
}
