//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the users endpoint, an optional API key, the request timeout and the
//! cache location.
//!
//! Configuration is stored at `~/.config/usercache/config.json`.
//! `USERCACHE_API_URL` and `USERCACHE_API_KEY` override the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USERS_URL};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "usercache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the users endpoint
pub const API_URL_ENV: &str = "USERCACHE_API_URL";

/// Environment variable overriding the API key
pub const API_KEY_ENV: &str = "USERCACHE_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Ok(serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Effective config: this one with `USERCACHE_API_URL` / `USERCACHE_API_KEY`
    /// applied when set and non-empty. `self` is left as loaded, so saving it
    /// never persists values that only came from the environment.
    pub fn with_env(&self) -> Self {
        self.with_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(API_KEY_ENV).ok(),
        )
    }

    fn with_overrides(&self, api_url: Option<String>, api_key: Option<String>) -> Self {
        let mut config = self.clone();
        if let Some(url) = api_url.filter(|s| !s.trim().is_empty()) {
            config.api_url = Some(url);
        }
        if let Some(key) = api_key.filter(|s| !s.trim().is_empty()) {
            config.api_key = Some(key);
        }
        config
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_USERS_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|&secs| secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url(), "https://reqres.in/api/users");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_zero_timeout_falls_back_to_default() {
        let config = Config {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_explicit_cache_dir_wins() {
        let config = Config {
            cache_dir: Some(PathBuf::from("/tmp/usercache-test")),
            ..Default::default()
        };
        assert_eq!(config.cache_dir().unwrap(), PathBuf::from("/tmp/usercache-test"));
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let file_config = Config {
            api_url: Some("http://localhost:9000/users".to_string()),
            ..Default::default()
        };
        let config = file_config.with_overrides(Some("  ".to_string()), None);
        assert_eq!(config.api_url(), "http://localhost:9000/users");

        let config = file_config.with_overrides(
            Some("http://localhost:9001/users".to_string()),
            Some("secret".to_string()),
        );
        assert_eq!(config.api_url(), "http://localhost:9001/users");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_overrides_leave_file_config_untouched() {
        let file_config = Config::default();
        let effective = file_config.with_overrides(None, Some("secret".to_string()));
        assert_eq!(effective.api_key.as_deref(), Some("secret"));

        // What gets saved carries no key that only came from the environment
        assert!(file_config.api_key.is_none());
        let saved = serde_json::to_string(&file_config).unwrap();
        assert!(!saved.contains("secret"));
    }

    #[test]
    fn test_partial_config_file_parses() {
        let config: Config = serde_json::from_str(r#"{"api_url": "http://example.test/users"}"#)
            .expect("partial config should parse");
        assert_eq!(config.api_url(), "http://example.test/users");
        assert!(config.cache_dir.is_none());
    }
}
