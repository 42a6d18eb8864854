//! Engine configuration.
//!
//! A flat TOML document; every key is optional and falls back to its default:
//!
//! ```toml
//! strategy = "minimax"        # or "mcts"
//! depth = 3
//! simulations = 200
//! exploration = 1.4
//! terminal_scoring = "decisive"  # or "static"
//! seed = 42
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::search::{SearchLimits, Strategy, TerminalScoring};
use crate::types::MAX_DEPTH;

/// Everything a [`Searcher`](crate::search::Searcher) needs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub strategy: Strategy,
    pub terminal_scoring: TerminalScoring,
    /// Seed for MCTS rollouts; entropy when absent
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub limits: SearchLimits,
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Reject values the searches cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;
        if limits.simulations == 0 {
            return Err(ConfigError::Invalid {
                field: "simulations",
                message: "must be at least 1".to_string(),
            });
        }
        if !limits.exploration.is_finite() || limits.exploration < 0.0 {
            return Err(ConfigError::Invalid {
                field: "exploration",
                message: format!("must be a finite non-negative number, got {}", limits.exploration),
            });
        }
        if limits.depth.raw() > MAX_DEPTH {
            return Err(ConfigError::Invalid {
                field: "depth",
                message: format!("must be at most {MAX_DEPTH}, got {}", limits.depth.raw()),
            });
        }
        Ok(())
    }
}
