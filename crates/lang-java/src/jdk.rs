//! Locates the JDK class library so JDK types can be loaded at runtime.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Locates the JDK core asset: `lib/modules` (Java 9+) or `rt.jar` (Java 8).
///
/// Tries `JAVA_HOME`, then the macOS `java_home` utility, then whatever `java`
/// is on the `PATH`. Later sources are only consulted when earlier ones fail,
/// so no JVM is started when `JAVA_HOME` is usable.
pub fn find_jdk_asset() -> Option<PathBuf> {
    let sources: [fn() -> Option<PathBuf>; 3] =
        [home_from_env, home_from_macos_tool, home_from_java];
    first_jdk_asset(sources)
}

/// The asset of the first home that has one, trying home sources in order and no further.
fn first_jdk_asset<I, F>(homes: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Option<PathBuf>,
{
    homes
        .into_iter()
        .filter_map(|source| source())
        .find_map(|home| {
            let asset = jdk_asset_in(&home);
            debug!("java home {} -> {:?}", home.display(), asset);
            asset
        })
}

fn home_from_env() -> Option<PathBuf> {
    std::env::var_os("JAVA_HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

#[cfg(target_os = "macos")]
fn home_from_macos_tool() -> Option<PathBuf> {
    let output = Command::new("/usr/libexec/java_home").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!path_str.is_empty()).then(|| PathBuf::from(path_str))
}

#[cfg(not(target_os = "macos"))]
fn home_from_macos_tool() -> Option<PathBuf> {
    None
}

fn home_from_java() -> Option<PathBuf> {
    let output = Command::new("java")
        .arg("-XshowSettings:properties")
        .arg("-version")
        .output()
        .ok()?;
    // Settings are printed on stderr
    parse_java_home(&String::from_utf8_lossy(&output.stderr))
}

/// Extracts `java.home` from `java -XshowSettings:properties` output.
fn parse_java_home(settings: &str) -> Option<PathBuf> {
    settings
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("java.home = "))
        .map(|home| PathBuf::from(home.trim()))
}

/// The class library inside a JDK or JRE home, if present.
pub fn jdk_asset_in(home: &Path) -> Option<PathBuf> {
    [
        home.join("lib").join("modules"),
        home.join("lib").join("rt.jar"),
        home.join("jre").join("lib").join("rt.jar"),
    ]
    .into_iter()
    .find(|candidate| candidate.exists())
}
