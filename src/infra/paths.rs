// src/infra/paths.rs — Config path resolution
//
// RUBRIX_HOME overrides everything. Otherwise config lives in ~/.rubrix/.

use std::path::PathBuf;

/// Returns the RUBRIX_HOME override, if set.
fn rubrix_home() -> Option<PathBuf> {
    std::env::var_os("RUBRIX_HOME").map(PathBuf::from)
}

/// Configuration directory: $RUBRIX_HOME/ or ~/.rubrix/
pub fn config_dir() -> PathBuf {
    if let Some(home) = rubrix_home() {
        return home;
    }
    match directories::BaseDirs::new() {
        Some(base) => base.home_dir().join(".rubrix"),
        None => PathBuf::from(".rubrix"),
    }
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
