//! Engine defaults, loadable from JSON.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::region::Region;

/// Defaults applied when a query leaves a count or the region unspecified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Genres kept by the "top genres" display.
    #[serde(default = "EngineConfig::default_top_genres")]
    pub top_genres: usize,
    /// Titles ranked per genre.
    #[serde(default = "EngineConfig::default_titles_per_genre")]
    pub titles_per_genre: usize,
    #[serde(default)]
    pub default_region: Region,
}

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
    #[error("config is not valid JSON: {0}")]
    Parse(String),
}

impl EngineConfig {
    const fn default_top_genres() -> usize {
        5
    }

    const fn default_titles_per_genre() -> usize {
        5
    }

    /// Parse and validate a JSON document. Omitted fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::ZeroCount`] for zero counts.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCount`] when a count is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.top_genres == 0 {
            return Err(ConfigError::ZeroCount {
                field: "top_genres",
            });
        }
        if self.titles_per_genre == 0 {
            return Err(ConfigError::ZeroCount {
                field: "titles_per_genre",
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_genres: Self::default_top_genres(),
            titles_per_genre: Self::default_titles_per_genre(),
            default_region: Region::All,
        }
    }
}
