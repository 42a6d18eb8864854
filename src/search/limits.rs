//! Search limits.
//!
//! Handles:
//! - Fixed depth for minimax
//! - Fixed simulation budget and exploration constant for MCTS

use serde::{Deserialize, Serialize};

use super::mcts::{DEFAULT_EXPLORATION, DEFAULT_SIMULATIONS};
use crate::types::Depth;

/// Default minimax depth in plies
pub const DEFAULT_DEPTH: Depth = Depth::new(3);

/// Search limits configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Minimax depth
    pub depth: Depth,
    /// MCTS simulations per move decision
    pub simulations: u32,
    /// UCB1 exploration constant
    pub exploration: f64,
}

impl SearchLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(depth: u32) -> Self {
        Self {
            depth: Depth::new(depth),
            ..Default::default()
        }
    }

    pub fn simulations(simulations: u32) -> Self {
        Self {
            simulations,
            ..Default::default()
        }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            simulations: DEFAULT_SIMULATIONS,
            exploration: DEFAULT_EXPLORATION,
        }
    }
}
