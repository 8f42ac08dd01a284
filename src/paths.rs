use std::path::PathBuf;

/// Environment variable overriding the settings directory.
pub const ROOT_ENV_VAR: &str = "PUZZLE_BROWSER_ROOT";

/// Returns the settings directory path.
///
/// Resolution order:
/// 1. `PUZZLE_BROWSER_ROOT` environment variable (if set)
/// 2. Current working directory + `.puzzle-browser`
pub fn browser_root() -> PathBuf {
    if let Ok(root) = std::env::var(ROOT_ENV_VAR) {
        PathBuf::from(root)
    } else {
        PathBuf::from(".puzzle-browser")
    }
}

/// Returns the path to the configuration file.
pub fn config_file() -> PathBuf {
    browser_root().join("config.yaml")
}
