//! Configuration module for imgr
//!
//! Manages application settings: the root directory to index, the URL
//! prefix images are served under, and server knobs. Settings are layered
//! from built-in defaults, an optional TOML file and `IMGR_*` environment
//! variables; command-line flags override all of them.
//!
//! The root path and serve path are deliberately *not* validated here.
//! A missing or empty root degrades the index to empty collections at
//! rebuild time rather than failing startup.

use std::path::{Path, PathBuf};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Default address the HTTP server binds to
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default URL prefix under which image files are served
pub const DEFAULT_SERVE_PATH: &str = "/images";

/// Default snapshot time-to-live in seconds (one hour)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Application settings, immutable after load
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Directory whose immediate subdirectories are scanned as image sets
    #[serde(default)]
    pub root_path: PathBuf,

    /// URL prefix joined onto relative paths to form servable image URLs
    #[serde(default = "default_serve_path")]
    pub base_serve_path: String,

    /// Address the HTTP server listens on, e.g. `127.0.0.1:3000`
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Seconds a built snapshot stays fresh before a read triggers a rescan
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_serve_path() -> String {
    DEFAULT_SERVE_PATH.to_string()
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

const fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_path: PathBuf::new(),
            base_serve_path: default_serve_path(),
            bind_addr: default_bind_addr(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Settings {
    /// Get the default path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        let imgr_config_dir = config_dir.join("imgr");
        Ok(imgr_config_dir.join("config.toml"))
    }

    /// Load settings from defaults, an optional TOML file and the environment
    ///
    /// `file` names an explicit config file; when `None`, the default
    /// location is used if it exists. Environment variables prefixed with
    /// `IMGR_` (e.g. `IMGR_ROOT_PATH`) override file values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read or parsed.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        match file {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()).format(FileFormat::Toml));
            }
            None => {
                let default_path = Self::config_path()?;
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path).format(FileFormat::Toml));
                }
            }
        }

        let settings = builder
            .add_source(Environment::with_prefix("IMGR"))
            .build()?;

        settings.try_deserialize()
    }

    /// The serve path normalized to a leading slash and no trailing slash
    ///
    /// An empty or `/`-only serve path normalizes to the default prefix,
    /// since axum cannot nest a service at the bare root.
    #[must_use]
    pub fn serve_prefix(&self) -> String {
        let trimmed = self.base_serve_path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return DEFAULT_SERVE_PATH.to_string();
        }
        if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        }
    }

    /// Snapshot time-to-live as a `Duration`
    #[must_use]
    pub const fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_secs)
    }
}
