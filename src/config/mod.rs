//! Configuration management for bc-hierarchy
//!
//! Settings are read from a TOML file:
//!
//! - `BCH_CONFIG_PATH` if that environment variable is set
//! - otherwise `~/.bc-hierarchy/config.toml`
//!
//! A missing file is not an error; every setting has a default.
//!
//! ```toml
//! [expansion]
//! max-parallel = 8         # sibling dependencies enriched concurrently
//! name-suffix-length = 5   # random characters appended to display names
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use bc_hierarchy::config::Config;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load().await?;
//! println!("fan-out: {}", config.expansion.max_parallel);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONFIG_PATH_ENV, DEFAULT_MAX_PARALLEL,
    DEFAULT_NAME_SUFFIX_LENGTH, MAX_NAME_SUFFIX_LENGTH,
};
use crate::core::HierarchyError;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Expansion engine settings
    #[serde(default)]
    pub expansion: ExpansionConfig,
}

/// Settings of the hierarchy expansion engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExpansionConfig {
    /// Maximum number of sibling dependencies enriched concurrently
    pub max_parallel: usize,
    /// Length of the random disambiguator appended to display names
    pub name_suffix_length: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_parallel: DEFAULT_MAX_PARALLEL,
            name_suffix_length: DEFAULT_NAME_SUFFIX_LENGTH,
        }
    }
}

impl ExpansionConfig {
    /// Check the settings are usable.
    pub fn validate(&self) -> Result<(), HierarchyError> {
        if self.max_parallel == 0 {
            return Err(HierarchyError::ConfigError {
                message: "expansion.max-parallel must be at least 1".to_string(),
            });
        }
        if self.name_suffix_length == 0 || self.name_suffix_length > MAX_NAME_SUFFIX_LENGTH {
            return Err(HierarchyError::ConfigError {
                message: format!(
                    "expansion.name-suffix-length must be between 1 and {MAX_NAME_SUFFIX_LENGTH}"
                ),
            });
        }
        Ok(())
    }
}

impl Config {
    /// Load the configuration from its default location.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load from `path` if given, otherwise from the default location.
    ///
    /// Returns the default configuration when the file does not exist.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load and validate the configuration at `path`.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| HierarchyError::ConfigError {
            message: format!("{}: {}", path.display(), e.to_string().trim()),
        })?;
        config.expansion.validate()?;
        Ok(config)
    }

    /// Location of the configuration file.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?;
        Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }
}
