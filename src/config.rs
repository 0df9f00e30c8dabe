//! Configuration Management
//!
//! Handles persistent configuration storage for gerrit-projects.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::gerrit::auth::{Credentials, USERNAME_ENV};

/// Environment variable holding the server URL
pub const URL_ENV: &str = "GERRIT_URL";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Gerrit server URL
    #[serde(default)]
    pub url: Option<String>,
    /// Account used for authenticated requests
    #[serde(default)]
    pub username: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gerrit-projects").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective server URL (CLI > config > GERRIT_URL)
    pub fn effective_url(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| self.url.clone())
            .or_else(|| std::env::var(URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
    }

    /// Get effective username (CLI > config > GERRIT_USERNAME)
    pub fn effective_username(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| self.username.clone())
            .or_else(|| std::env::var(USERNAME_ENV).ok())
            .filter(|name| !name.is_empty())
    }

    /// Credentials for the effective username; the password only ever comes from the environment
    pub fn credentials(&self, cli_username: Option<&str>) -> Option<Credentials> {
        let username = self.effective_username(cli_username)?;
        Credentials::with_env_password(&username)
    }

    /// Set url and username and save
    pub fn set_server(&mut self, url: Option<&str>, username: Option<&str>) -> Result<()> {
        if let Some(url) = url {
            self.url = Some(url.to_string());
        }
        if let Some(username) = username {
            self.username = Some(username.to_string());
        }
        self.save()
    }
}
