//! Pager configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables (`PAGER_PAGE_SIZE`, `PAGER_SEARCH_CACHE`,
//! `PAGER_SEARCH_FIELDS`). Command-line flags override all of these.
//!
//! ```toml
//! page_size = 25
//! search_cache_capacity = 50
//! search_fields = ["title", "description"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::search::DEFAULT_SEARCH_CACHE_CAPACITY;

/// Rows per page when nothing (valid) is configured.
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Rows per page. Zero is treated as [`DEFAULT_PAGE_SIZE`].
    pub page_size: usize,
    /// Maximum cached searches. Zero is treated as the default capacity.
    pub search_cache_capacity: usize,
    /// Fields searched when the caller does not name any.
    pub search_fields: Vec<String>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_cache_capacity: DEFAULT_SEARCH_CACHE_CAPACITY,
            search_fields: vec!["title".to_string(), "description".to_string()],
        }
    }
}

impl PagerConfig {
    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    /// Parse a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded pager config");
        Ok(cfg)
    }

    /// Full resolution: explicit file (must exist), or the default file if present,
    /// then environment overrides.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut cfg = match explicit {
            Some(path) => Self::load(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::load(&path)?,
                _ => Self::default(),
            },
        };
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn apply_env(&mut self) {
        if let Ok(val) = dotenvy::var("PAGER_PAGE_SIZE") {
            match val.trim().parse() {
                Ok(n) => self.page_size = n,
                Err(_) => warn!(value = %val, "ignoring invalid PAGER_PAGE_SIZE"),
            }
        }

        if let Ok(val) = dotenvy::var("PAGER_SEARCH_CACHE") {
            match val.trim().parse() {
                Ok(n) => self.search_cache_capacity = n,
                Err(_) => warn!(value = %val, "ignoring invalid PAGER_SEARCH_CACHE"),
            }
        }

        if let Ok(val) = dotenvy::var("PAGER_SEARCH_FIELDS") {
            let fields = split_fields(&val);
            if !fields.is_empty() {
                self.search_fields = fields;
            }
        }
    }
}

/// Split a comma-separated field list, dropping blanks.
pub fn split_fields(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `<config dir>/pager.toml` for the current platform.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "client-pager", "client-pager")
        .map(|dirs| dirs.config_dir().join("pager.toml"))
}
