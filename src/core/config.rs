//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the per-directory config file
pub const PROJECT_CONFIG_FILE: &str = ".partmaster.yaml";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Partmaster configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the partmaster CSV files
    pub partmaster_dir: Option<PathBuf>,

    /// Shared secret for the HTTP library API
    pub token: Option<String>,

    /// Port for `partmaster serve`
    pub port: Option<u16>,

    /// Address for `partmaster serve`
    pub bind: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/partmaster/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::load_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Config in the working directory (.partmaster.yaml)
        if let Ok(cwd) = std::env::current_dir() {
            if let Some(local) = Self::load_file(&cwd.join(PROJECT_CONFIG_FILE)) {
                config.merge(local);
            }
        }

        // Command-line flags and environment variables are applied by the CLI
        config
    }

    /// Read one config file; missing or malformed files are ignored
    pub fn load_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "partmaster")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.partmaster_dir.is_some() {
            self.partmaster_dir = other.partmaster_dir;
        }
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.port.is_some() {
            self.port = other.port;
        }
        if other.bind.is_some() {
            self.bind = other.bind;
        }
    }

    /// Partmaster directory, defaulting to the working directory
    pub fn partmaster_dir(&self) -> PathBuf {
        self.partmaster_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn bind(&self) -> String {
        self.bind.clone().unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    /// Token, treating an empty string as "no authentication"
    pub fn token(&self) -> Option<String> {
        self.token.clone().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port(), 8080);
        assert_eq!(config.bind(), "0.0.0.0");
        assert_eq!(config.partmaster_dir(), PathBuf::from("."));
        assert!(config.token().is_none());
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            port: Some(9000),
            token: Some("a".into()),
            ..Default::default()
        };
        base.merge(Config {
            token: Some("b".into()),
            bind: Some("127.0.0.1".into()),
            ..Default::default()
        });
        assert_eq!(base.port(), 9000);
        assert_eq!(base.token().as_deref(), Some("b"));
        assert_eq!(base.bind(), "127.0.0.1");
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PROJECT_CONFIG_FILE);
        std::fs::write(&path, "partmaster_dir: parts\nport: 7654\ntoken: \"\"\n").unwrap();

        let config = Config::load_file(&path).unwrap();
        assert_eq!(config.partmaster_dir(), PathBuf::from("parts"));
        assert_eq!(config.port(), 7654);
        assert!(config.token().is_none());

        std::fs::write(&path, "port: [not a port\n").unwrap();
        assert!(Config::load_file(&path).is_none());
        assert!(Config::load_file(&dir.path().join("missing.yaml")).is_none());
    }
}
