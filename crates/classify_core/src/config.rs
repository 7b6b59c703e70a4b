use anyhow::{Context, Result};
use directories_next::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured server URL.
pub const SERVER_URL_ENV: &str = "SHIP_CLASSIFIER_URL";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5001";

/// Client settings, read from `config.toml` in the platform config dir.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the classification service, without the endpoint path.
    pub server_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "shipclassifier", "ShipClassifier")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read config: {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config: {}", path.display()))
    }

    /// Config file plus environment override. Problems are logged and the
    /// defaults are used instead.
    pub fn load() -> Self {
        let from_file = match Self::default_path() {
            Some(path) => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("{e:#}; using defaults");
                Self::default()
            }),
            None => Self::default(),
        };
        from_file.with_override(std::env::var(SERVER_URL_ENV).ok())
    }

    /// Replace the server URL when an override is given and not blank.
    pub fn with_override(mut self, server_url: Option<String>) -> Self {
        if let Some(url) = server_url.filter(|u| !u.trim().is_empty()) {
            self.server_url = url.trim().to_string();
        }
        self
    }
}
