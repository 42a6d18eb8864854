//! Error types for the search core and its configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the searches and the rules adapter
#[derive(Error, Debug)]
pub enum SearchError {
    /// The rules engine reported no legal moves for a position it does not consider terminal
    #[error("position has no legal moves but is not terminal")]
    StuckPosition,

    /// MCTS was asked to run without any simulations
    #[error("simulation budget must be positive, got {0}")]
    EmptyBudget(u32),

    /// The search finished without a single candidate move at the root
    #[error("no candidate moves at the root (terminal position?)")]
    NoCandidates,

    /// A FEN string could not be turned into a position
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },
}

/// Errors raised while loading or validating an engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for this engine
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value the searches cannot work with
    #[error("invalid config value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}
