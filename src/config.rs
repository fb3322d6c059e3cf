use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::locale::Locale;
use crate::normalize::DEFAULT_BATCH_SIZE;
use crate::ranges::RangeSet;

/// Environment variable consulted when no `--config` flag is given.
pub const CONFIG_ENV: &str = "GRADE_BAND_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub ranges: RangeSet,
    pub locale: Locale,
    /// Re-run categorization against the saved bands after every upload
    /// instead of waiting for the next explicit save.
    pub recategorize_on_upload: bool,
    pub batch_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ranges: RangeSet::standard(),
            locale: Locale::default(),
            recategorize_on_upload: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl AppConfig {
    /// Loads from `explicit`, else from `$GRADE_BAND_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        };

        match path {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: AppConfig =
            serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.batch_size = config.batch_size.max(1);
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
