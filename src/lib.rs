//! Move search for chess: Monte Carlo Tree Search with UCB1 and depth-limited
//! minimax with alpha-beta pruning, both over a hand-crafted evaluation.
//!
//! Board representation and move generation come from the `chess` crate,
//! wrapped by [`rules::ChessPosition`] which adds the game-over rules the
//! searches rely on. Scores are always from White's point of view.

pub mod config;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;
pub mod types;

pub use config::EngineConfig;
pub use error::{ConfigError, SearchError};
pub use eval::{evaluate, Evaluator, HandCrafted};
pub use rules::{ChessPosition, GameState, Outcome};
pub use search::{SearchReport, Searcher, Strategy};
