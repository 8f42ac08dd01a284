//! Top-level application configuration.
//!
//! Configuration is stored in `.puzzle-browser/config.yaml` and includes:
//! - Backend base URL and request timeouts
//! - RDF/ML routing for recommendations and game-state filtering
//! - Layout constants (viewport breakpoints, recommendation card sizing)

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::{Strategy, StrategyToggle};
use crate::error::{BrowserError, Result};
use crate::packer::PackConstraints;
use crate::paths::config_file;
use crate::viewport::Breakpoints;

/// Environment variable overriding `backend.base_url`.
pub const BACKEND_URL_ENV_VAR: &str = "PUZZLE_BROWSER_BACKEND_URL";

/// Keys accepted by `config get` and `config set`.
pub const CONFIG_KEYS: [&str; 4] = [
    "backend.url",
    "backend.timeout",
    "strategy.recommendations",
    "strategy.game_state",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    /// Which backend variant serves recommendations and game-state filtering
    #[serde(default)]
    pub strategy: StrategyToggle,

    #[serde(default)]
    pub layout: LayoutSettings,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Geometry constants for the gallery and the recommendation pane
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub breakpoints: Breakpoints,
    pub cards: PackConstraints,
}

impl LayoutSettings {
    pub fn validate(&self) -> Result<()> {
        self.breakpoints.validate()?;
        self.cards.validate()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        config_file()
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            BrowserError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                BrowserError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            BrowserError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, permissions).map_err(|e| {
                BrowserError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to set permissions on config at {}: {}", path.display(), e),
                ))
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(BrowserError::Config("backend.url must not be empty".to_string()));
        }
        if self.backend.timeout_secs == 0 {
            return Err(BrowserError::Config(
                "backend.timeout must be at least 1 second".to_string(),
            ));
        }
        self.layout.validate()
    }

    /// Get the backend URL from the environment or the config file
    pub fn backend_url(&self) -> String {
        if let Ok(url) = env::var(BACKEND_URL_ENV_VAR)
            && !url.trim().is_empty()
        {
            return url;
        }
        self.backend.base_url.clone()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.connect_timeout_secs)
    }

    /// Read a single setting as text
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "backend.url" => Ok(self.backend.base_url.clone()),
            "backend.timeout" => Ok(self.backend.timeout_secs.to_string()),
            "strategy.recommendations" => Ok(self.strategy.recommendations.to_string()),
            "strategy.game_state" => Ok(self.strategy.game_state.to_string()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Update a single setting from text, validating the new value.
    ///
    /// On error the config is left unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        match key {
            "backend.url" => {
                crate::backend::Endpoints::new(value)?;
                updated.backend.base_url = value.trim().to_string();
            }
            "backend.timeout" => {
                let seconds: u64 = value.trim().parse().map_err(|_| {
                    BrowserError::Config(format!("backend.timeout must be a number, got '{value}'"))
                })?;
                updated.set_timeout(seconds);
            }
            "strategy.recommendations" => {
                updated.strategy.recommendations = value.parse::<Strategy>()?;
            }
            "strategy.game_state" => {
                updated.strategy.game_state = value.parse::<Strategy>()?;
            }
            _ => return Err(unknown_key(key)),
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn set_timeout(&mut self, seconds: u64) {
        self.backend.timeout_secs = seconds;
    }
}

fn unknown_key(key: &str) -> BrowserError {
    BrowserError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_guards::EnvGuard;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.strategy.recommendations, Strategy::Rdf);
        assert_eq!(config.layout.cards.max_size, 350.0);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
strategy:
  recommendations: ml
layout:
  breakpoints:
    lg: 1400
"#;
        let config: Config = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.strategy.recommendations, Strategy::Ml);
        assert_eq!(config.strategy.game_state, Strategy::Rdf);
        assert_eq!(config.layout.breakpoints.lg, 1400.0);
        assert_eq!(config.layout.breakpoints.sm, 600.0);
        assert_eq!(config.backend, BackendConfig::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.set("strategy.game_state", "ml").unwrap();
        config.set("backend.timeout", "5").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        Config::default().save_to(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_rejects_invalid_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "layout:\n  breakpoints:\n    sm: 900\n    md: 600\n    lg: 1200\n",
        )
        .unwrap();
        assert!(matches!(Config::load_from(&path), Err(BrowserError::Config(_))));
    }

    #[test]
    fn test_get_and_set_keys() {
        let mut config = Config::default();
        config.set("backend.url", "https://puzzles.example.com").unwrap();
        assert_eq!(config.get("backend.url").unwrap(), "https://puzzles.example.com");

        config.set("strategy.recommendations", "ml").unwrap();
        assert_eq!(config.get("strategy.recommendations").unwrap(), "ml");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("backend.url", "not a url").is_err());
        assert!(config.set("backend.timeout", "soon").is_err());
        assert!(config.set("backend.timeout", "0").is_err());
        assert!(config.set("strategy.game_state", "graph").is_err());
        assert!(config.set("theme", "dark").is_err());
        assert!(config.get("theme").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_backend_url_env_override() {
        let config = Config::default();

        let _guard = unsafe { EnvGuard::set(BACKEND_URL_ENV_VAR, "http://10.0.0.2:8080") };
        assert_eq!(config.backend_url(), "http://10.0.0.2:8080");
    }

    #[test]
    #[serial]
    fn test_backend_url_ignores_blank_env() {
        let config = Config::default();

        let _guard = unsafe { EnvGuard::set(BACKEND_URL_ENV_VAR, "  ") };
        assert_eq!(config.backend_url(), "http://localhost:5000");
    }

    #[test]
    #[serial]
    fn test_load_uses_root_env_var() {
        let dir = TempDir::new().unwrap();
        let _guard =
            unsafe { EnvGuard::set(crate::paths::ROOT_ENV_VAR, dir.path().to_str().unwrap()) };

        let mut config = Config::default();
        config.set("strategy.recommendations", "ml").unwrap();
        config.save().unwrap();

        assert!(dir.path().join("config.yaml").exists());
        assert_eq!(Config::load().unwrap().strategy.recommendations, Strategy::Ml);
    }
}
