#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for ferry
//!
//! Two independent layers are handled here:
//! - Build settings (`settings.json`): what to build and who to tell. Every
//!   key falls back to a hard-coded default; see [`settings`].
//! - Pipeline configuration (`config.toml`): how to build, where to upload,
//!   where to notify. Defaults, then the file, then environment variables.

pub mod settings;

pub use settings::{BuildSettings, SettingSource, SettingsOrigin, Sourced};

use ferry_errors::{ConfigError, Error};
use ferry_types::Platform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub notify: NotifyConfig,

    #[serde(default)]
    pub cleanup: CleanupConfig,
}

/// Build toolchain and packaging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Manifest file, relative to the workspace
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    #[serde(default = "default_toolchain")]
    pub toolchain: String,
    #[serde(default = "default_toolchain_args")]
    pub toolchain_args: Vec<String>,
    #[serde(default)]
    pub platform: Platform,
    /// Pause before launching the toolchain so manifest writes settle
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
    /// zstd level used for the archive entry
    #[serde(default = "default_compression_level")]
    pub compression_level: i64,
}

/// Upload distributor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_discovery_url")]
    pub discovery_url: String,
    /// Upload URL with a `{server}` placeholder for the candidate name
    #[serde(default = "default_url_template")]
    pub url_template: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// Messaging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Full messaging API URL; messages are only logged when unset
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_title")]
    pub title: String,
}

/// Workspace cleanup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Extra attempts after a "directory not empty" failure
    #[serde(default = "default_cleanup_retries")]
    pub retries: u32,
    #[serde(default = "default_cleanup_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

// Default implementations

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            toolchain: default_toolchain(),
            toolchain_args: default_toolchain_args(),
            platform: Platform::default(),
            settle_delay_ms: default_settle_delay_ms(),
            archive_name: default_archive_name(),
            compression_level: default_compression_level(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            discovery_url: default_discovery_url(),
            url_template: default_url_template(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            title: default_title(),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            retries: default_cleanup_retries(),
            retry_delay_ms: default_cleanup_retry_delay_ms(),
        }
    }
}

// Default value functions for serde
fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

fn default_toolchain() -> String {
    "npx".to_string()
}

fn default_toolchain_args() -> Vec<String> {
    vec!["electron-builder".to_string()]
}

fn default_settle_delay_ms() -> u64 {
    3000
}

fn default_archive_name() -> String {
    "Build.zip".to_string()
}

fn default_compression_level() -> i64 {
    19
}

fn default_discovery_url() -> String {
    "https://api.gofile.io/servers".to_string()
}

fn default_url_template() -> String {
    "https://{server}.gofile.io/uploadFile".to_string()
}

fn default_timeout() -> u64 {
    300 // 5 minutes
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_title() -> String {
    "Build".to_string()
}

fn default_cleanup_retries() -> u32 {
    1
}

fn default_cleanup_retry_delay_ms() -> u64 {
    1000
}

impl BuildConfig {
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl UploadConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl CleanupConfig {
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("ferry").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this structure.
    pub fn from_toml(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!("no config at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // FERRY_PLATFORM
        if let Ok(platform) = std::env::var("FERRY_PLATFORM") {
            self.build.platform = platform.parse().map_err(|_| ConfigError::InvalidValue {
                field: "FERRY_PLATFORM".to_string(),
                value: platform,
            })?;
        }

        // FERRY_TOOLCHAIN
        if let Ok(toolchain) = std::env::var("FERRY_TOOLCHAIN") {
            if toolchain.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "FERRY_TOOLCHAIN".to_string(),
                    value: toolchain,
                }
                .into());
            }
            self.build.toolchain = toolchain;
        }

        // FERRY_SETTLE_DELAY_MS
        if let Ok(delay) = std::env::var("FERRY_SETTLE_DELAY_MS") {
            self.build.settle_delay_ms = delay.parse().map_err(|_| ConfigError::InvalidValue {
                field: "FERRY_SETTLE_DELAY_MS".to_string(),
                value: delay,
            })?;
        }

        // FERRY_DISCOVERY_URL
        if let Ok(url) = std::env::var("FERRY_DISCOVERY_URL") {
            self.upload.discovery_url = url;
        }

        // FERRY_NOTIFY_ENDPOINT
        if let Ok(endpoint) = std::env::var("FERRY_NOTIFY_ENDPOINT") {
            self.notify.endpoint = if endpoint.is_empty() {
                None
            } else {
                Some(endpoint)
            };
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.build.manifest, PathBuf::from("package.json"));
        assert_eq!(config.build.platform, Platform::Windows);
        assert_eq!(config.build.settle_delay(), Duration::from_secs(3));
        assert_eq!(config.cleanup.retries, 1);
        assert_eq!(config.cleanup.retry_delay(), Duration::from_secs(1));
        assert!(config.notify.endpoint.is_none());
        assert!(config.upload.url_template.contains("{server}"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
[build]
platform = "linux"

[cleanup]
retries = 3
"#,
        )
        .unwrap();
        assert_eq!(config.build.platform, Platform::Linux);
        assert_eq!(config.build.toolchain, "npx");
        assert_eq!(config.cleanup.retries, 3);
        assert_eq!(config.cleanup.retry_delay_ms, 1000);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[build\nplatform =").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError { .. })));
    }
}
