//! Search module for the chess engine.
//!
//! Two independent strategies choose a move for a single position:
//! - `minimax`: depth-limited alpha-beta over the hand-crafted evaluation
//! - `mcts`: Monte Carlo Tree Search with UCB1 and random rollouts
//!
//! `Searcher` is the driver that picks a strategy from the configuration,
//! runs it once and reports the result with basic statistics.

pub mod mcts;
pub mod minimax;
mod limits;

pub use limits::{SearchLimits, DEFAULT_DEPTH};
pub use minimax::{Minimax, SearchResult, TerminalScoring};

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::SearchError;
use crate::eval::HandCrafted;
use crate::rules::{ChessPosition, GameState};
use crate::types::{Color, Move, NodeCount, Score};
use mcts::{Mcts, RandomRollout};

/// Which search picks the move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Minimax,
    #[default]
    Mcts,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Minimax => write!(f, "minimax"),
            Strategy::Mcts => write!(f, "mcts"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" => Ok(Strategy::Minimax),
            "mcts" => Ok(Strategy::Mcts),
            other => Err(format!("unknown strategy '{other}', expected 'minimax' or 'mcts'")),
        }
    }
}

/// Search statistics collected during search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Minimax nodes visited, or MCTS tree nodes created
    pub nodes: NodeCount,
    pub time_ms: u64,
}

impl SearchStats {
    pub fn nps(&self) -> u64 {
        if self.time_ms > 0 {
            self.nodes * 1000 / self.time_ms
        } else {
            0
        }
    }
}

/// Outcome of one move decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    /// None when the position is already over
    pub best_move: Option<Move>,
    /// Minimax score; MCTS does not produce one
    pub score: Option<Score>,
    pub stats: SearchStats,
}

/// Main search controller
#[derive(Debug)]
pub struct Searcher {
    strategy: Strategy,
    limits: SearchLimits,
    terminal: TerminalScoring,
    rng: StdRng,
}

impl Searcher {
    pub fn new(strategy: Strategy, limits: SearchLimits, terminal: TerminalScoring, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            strategy,
            limits,
            terminal,
            rng,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.strategy, config.limits, config.terminal_scoring, config.seed)
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[inline]
    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Choose a move for `position` with the configured strategy
    pub fn search(&mut self, position: &ChessPosition) -> Result<SearchReport, SearchError> {
        let start = Instant::now();
        debug!(strategy = %self.strategy, fen = %position.board(), "search started");

        let (best_move, score, nodes) = match self.strategy {
            Strategy::Minimax => {
                let maximizing = position.side_to_move() == Color::White;
                let mut minimax = Minimax::new(HandCrafted, self.terminal);
                let result = minimax.search(position, self.limits.depth, maximizing)?;
                (result.best_move, Some(result.score), minimax.nodes())
            }
            Strategy::Mcts => {
                let rollout = RandomRollout::new(&mut self.rng);
                let mut mcts = Mcts::new(rollout, self.limits.simulations, self.limits.exploration);
                let tree = mcts.grow(position)?;
                (tree.best_move(), None, tree.len() as NodeCount)
            }
        };

        let stats = SearchStats {
            nodes,
            time_ms: start.elapsed().as_millis() as u64,
        };

        match best_move {
            Some(m) => info!(
                strategy = %self.strategy,
                best_move = %m,
                nodes = stats.nodes,
                time_ms = stats.time_ms,
                "search finished"
            ),
            None => info!(strategy = %self.strategy, "search finished without a move"),
        }

        Ok(SearchReport {
            best_move,
            score,
            stats,
        })
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Depth, Square};

    const MATE_IN_ONE: &str = "7k/8/6K1/8/8/8/8/R7 w - - 0 1";

    fn position(fen: &str) -> ChessPosition {
        ChessPosition::from_fen(fen).unwrap()
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("minimax".parse::<Strategy>(), Ok(Strategy::Minimax));
        assert_eq!("MCTS".parse::<Strategy>(), Ok(Strategy::Mcts));
        assert!("alphazero".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Minimax.to_string(), "minimax");
    }

    #[test]
    fn test_stats_nps() {
        let stats = SearchStats { nodes: 5000, time_ms: 250 };
        assert_eq!(stats.nps(), 20_000);
        assert_eq!(SearchStats::default().nps(), 0);
    }

    #[test]
    fn test_minimax_strategy_reports_score() {
        let pos = position(MATE_IN_ONE);
        let mut searcher = Searcher::new(
            Strategy::Minimax,
            SearchLimits::depth(2),
            TerminalScoring::Decisive,
            None,
        );
        let report = searcher.search(&pos).unwrap();
        assert_eq!(report.best_move, Some(Move::new(Square::A1, Square::A8, None)));
        assert_eq!(report.score, Some(Score::white_mates_in(1)));
        assert!(report.stats.nodes > 1);
    }

    #[test]
    fn test_minimax_black_minimizes() {
        let pos = position("r7/8/8/8/8/6k1/8/7K b - - 0 1");
        let mut searcher = Searcher::new(Strategy::Minimax, SearchLimits::depth(1), TerminalScoring::Decisive, None);
        let report = searcher.search(&pos).unwrap();
        assert_eq!(report.best_move, Some(Move::new(Square::A8, Square::A1, None)));
        assert_eq!(report.score, Some(Score::black_mates_in(1)));
    }

    #[test]
    fn test_mcts_strategy_finds_mate() {
        let pos = position(MATE_IN_ONE);
        let mut searcher = Searcher::new(Strategy::Mcts, SearchLimits::simulations(200), TerminalScoring::default(), Some(7));
        let report = searcher.search(&pos).unwrap();
        assert_eq!(report.best_move, Some(Move::new(Square::A1, Square::A8, None)));
        assert_eq!(report.score, None);
        // Re-selecting the terminal mate node adds no nodes
        assert!(report.stats.nodes > 20 && report.stats.nodes <= 201);
    }

    #[test]
    fn test_seeded_searchers_agree() {
        let pos = position("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
        let limits = SearchLimits::simulations(30);
        let a = Searcher::new(Strategy::Mcts, limits, TerminalScoring::default(), Some(11)).search(&pos).unwrap();
        let b = Searcher::new(Strategy::Mcts, limits, TerminalScoring::default(), Some(11)).search(&pos).unwrap();
        assert_eq!(a.best_move, b.best_move);
    }

    #[test]
    fn test_game_over_yields_no_move() {
        let mated = position("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        for strategy in [Strategy::Minimax, Strategy::Mcts] {
            let mut searcher = Searcher::new(strategy, SearchLimits::new(), TerminalScoring::Decisive, Some(1));
            let report = searcher.search(&mated).unwrap();
            assert_eq!(report.best_move, None, "{strategy}");
        }
    }

    #[test]
    fn test_zero_simulations_is_an_error() {
        let mut searcher = Searcher::new(Strategy::Mcts, SearchLimits::simulations(0), TerminalScoring::default(), Some(1));
        let err = searcher.search(&ChessPosition::starting()).unwrap_err();
        assert!(matches!(err, SearchError::EmptyBudget(0)));
    }

    #[test]
    fn test_default_searcher_uses_config_defaults() {
        let searcher = Searcher::default();
        assert_eq!(searcher.strategy(), Strategy::Mcts);
        assert_eq!(searcher.limits().depth, Depth::new(3));
        assert_eq!(searcher.limits().simulations, 200);
    }
}
