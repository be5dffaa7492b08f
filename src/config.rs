//! Configuration: `minim.toml` plus command-line overrides.
//!
//! ```toml
//! manifest = "music/catalog.toml"   # or: library = "music"
//! volume = 80
//! refresh_interval_ms = 1000
//! log_filter = "minim=debug"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::core::controller::{ControllerOptions, DEFAULT_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL};
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "minim.toml";
pub const DEFAULT_LIBRARY_DIR: &str = "music";
pub const DEFAULT_LOG_FILTER: &str = "minim=info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// TOML track list. Takes priority over `library`.
    pub manifest: Option<PathBuf>,
    /// Folder scanned for audio when no manifest is given.
    pub library: Option<PathBuf>,
    /// Startup volume, 0..=100.
    pub volume: u8,
    pub refresh_interval_ms: u64,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest: None,
            library: None,
            volume: 100,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL.as_millis() as u64,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Where the catalog comes from, after config + CLI are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Manifest(PathBuf),
    Library(PathBuf),
}

impl Config {
    /// Reads `path`. A missing file is only an error when `required`
    /// (i.e. the user named it explicitly); otherwise defaults apply.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.volume = config.volume.min(100);
        Ok(config)
    }

    pub fn catalog_source(&self) -> CatalogSource {
        match (&self.manifest, &self.library) {
            (Some(m), _) => CatalogSource::Manifest(m.clone()),
            (None, Some(l)) => CatalogSource::Library(l.clone()),
            (None, None) => CatalogSource::Library(PathBuf::from(DEFAULT_LIBRARY_DIR)),
        }
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            // Zero would spin the refresh on every poll.
            refresh_interval: Duration::from_millis(self.refresh_interval_ms.max(1))
                .min(MAX_REFRESH_INTERVAL),
            volume_percent: self.volume.min(100),
        }
    }
}
