//! Depth-limited minimax search with alpha-beta pruning.
//!
//! Explicit maximizing (White) and minimizing (Black) branches over
//! white-perspective scores. Moves are tried in the rules engine's
//! enumeration order and only a strict improvement replaces the best move,
//! so ties keep the first move found.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::SearchError;
use crate::eval::Evaluator;
use crate::rules::{GameState, Outcome};
use crate::types::{Depth, NodeCount, Ply, Score};

/// How terminal positions are scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalScoring {
    /// Static evaluation, exactly like a horizon node
    Static,
    /// Checkmate as a mate-in-ply sentinel, any draw as 0
    #[default]
    Decisive,
}

/// Result from a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<M> {
    pub best_move: Option<M>,
    pub score: Score,
}

/// Alpha-beta searcher driven by a static evaluator
#[derive(Debug, Clone)]
pub struct Minimax<E> {
    evaluator: E,
    terminal: TerminalScoring,
    nodes: NodeCount,
}

impl<E> Minimax<E> {
    pub fn new(evaluator: E, terminal: TerminalScoring) -> Self {
        Self {
            evaluator,
            terminal,
            nodes: 0,
        }
    }

    /// Nodes visited by the last call to [`Minimax::search`]
    #[inline]
    pub fn nodes(&self) -> NodeCount {
        self.nodes
    }

    /// Search `depth` plies below `state`.
    ///
    /// `maximizing` is true when White is to move. The best move is `None`
    /// at depth 0 and at terminal positions. `state` is never mutated.
    pub fn search<S>(&mut self, state: &S, depth: Depth, maximizing: bool) -> Result<SearchResult<S::Move>, SearchError>
    where
        S: GameState,
        E: Evaluator<S>,
    {
        self.nodes = 0;
        self.alpha_beta(state, depth, Ply::ZERO, maximizing, Score::neg_infinity(), Score::infinity())
    }

    fn alpha_beta<S>(
        &mut self,
        state: &S,
        depth: Depth,
        ply: Ply,
        maximizing: bool,
        mut alpha: Score,
        mut beta: Score,
    ) -> Result<SearchResult<S::Move>, SearchError>
    where
        S: GameState,
        E: Evaluator<S>,
    {
        self.nodes += 1;

        if let Some(outcome) = state.outcome() {
            return Ok(SearchResult {
                best_move: None,
                score: self.terminal_score(state, outcome, ply),
            });
        }

        if depth.is_horizon() {
            return Ok(SearchResult {
                best_move: None,
                score: Score::cp(self.evaluator.evaluate(state)),
            });
        }

        let moves = state.legal_moves();
        if moves.is_empty() {
            return Err(SearchError::StuckPosition);
        }

        let mut best_move = None;
        let mut best_score = if maximizing {
            Score::neg_infinity()
        } else {
            Score::infinity()
        };

        for m in moves {
            let child = state.after(m);
            let result = self.alpha_beta(&child, depth - 1, ply.next(), !maximizing, alpha, beta)?;
            let score = result.score;

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(m);
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(m);
                }
                beta = beta.min(best_score);
            }

            if beta <= alpha {
                trace!(ply = ply.raw(), %m, "cutoff");
                break;
            }
        }

        Ok(SearchResult {
            best_move,
            score: best_score,
        })
    }

    fn terminal_score<S>(&self, state: &S, outcome: Outcome, ply: Ply) -> Score
    where
        S: GameState,
        E: Evaluator<S>,
    {
        match (self.terminal, outcome) {
            (TerminalScoring::Static, _) => Score::cp(self.evaluator.evaluate(state)),
            (TerminalScoring::Decisive, Outcome::WhiteWin) => Score::white_mates_in(ply.raw()),
            (TerminalScoring::Decisive, Outcome::BlackWin) => Score::black_mates_in(ply.raw()),
            (TerminalScoring::Decisive, Outcome::Draw) => Score::draw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{evaluate, HandCrafted};
    use crate::rules::ChessPosition;
    use crate::types::{Color, Move, Square};

    fn position(fen: &str) -> ChessPosition {
        ChessPosition::from_fen(fen).unwrap()
    }

    fn searcher() -> Minimax<HandCrafted> {
        Minimax::new(HandCrafted, TerminalScoring::Decisive)
    }

    /// Full-width minimax without pruning, same terminal handling
    fn full_width(state: &ChessPosition, depth: u32, ply: i32, maximizing: bool) -> Score {
        if let Some(outcome) = state.outcome() {
            return match outcome {
                Outcome::WhiteWin => Score::white_mates_in(ply),
                Outcome::BlackWin => Score::black_mates_in(ply),
                Outcome::Draw => Score::draw(),
            };
        }
        if depth == 0 {
            return Score::cp(evaluate(state));
        }
        let scores = state
            .legal_moves()
            .into_iter()
            .map(|m| full_width(&state.after(m), depth - 1, ply + 1, !maximizing));
        if maximizing {
            scores.max().unwrap()
        } else {
            scores.min().unwrap()
        }
    }

    #[test]
    fn test_depth_zero_is_static_eval() {
        let pos = ChessPosition::starting();
        let result = searcher().search(&pos, Depth::ZERO, true).unwrap();
        assert_eq!(result, SearchResult { best_move: None, score: Score::cp(0) });
    }

    #[test]
    fn test_depth_one_picks_best_static_move() {
        let pos = ChessPosition::starting();
        let mut minimax = searcher();
        let result = minimax.search(&pos, Depth::ONE, true).unwrap();

        let moves = pos.legal_moves();
        assert_eq!(moves.len(), 20);
        let best = moves.iter().map(|&m| evaluate(&pos.after(m))).max().unwrap();
        assert_eq!(result.score, Score::cp(best));

        // First move in enumeration order that reaches the maximum
        let first = moves.iter().copied().find(|&m| evaluate(&pos.after(m)) == best);
        assert_eq!(result.best_move, first);
        assert_eq!(minimax.nodes(), 21);
    }

    #[test]
    fn test_finds_mate_in_one() {
        // Ra8# is the only mate
        let pos = position("7k/8/6K1/8/8/8/8/R7 w - - 0 1");
        let result = searcher().search(&pos, Depth::ONE, true).unwrap();
        assert_eq!(result.best_move, Some(Move::new(Square::A1, Square::A8, None)));
        assert_eq!(result.score, Score::white_mates_in(1));

        let result = Minimax::new(HandCrafted, TerminalScoring::Static)
            .search(&pos, Depth::ONE, true)
            .unwrap();
        assert!(result.best_move.is_some());
        assert!(!result.score.is_mate_score());
    }

    #[test]
    fn test_black_finds_mate_in_one() {
        // Colour-mirrored version of the position above: ...Ra1#
        let pos = position("r7/8/8/8/8/6k1/8/7K b - - 0 1");
        let result = searcher().search(&pos, Depth::ONE, false).unwrap();
        assert_eq!(result.best_move, Some(Move::new(Square::A8, Square::A1, None)));
        assert_eq!(result.score, Score::black_mates_in(1));
    }

    #[test]
    fn test_terminal_root_returns_no_move() {
        let mated = position("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        let result = searcher().search(&mated, Depth::new(3), true).unwrap();
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, Score::black_mates_in(0));

        let result = Minimax::new(HandCrafted, TerminalScoring::Static)
            .search(&mated, Depth::new(3), true)
            .unwrap();
        assert_eq!(result, SearchResult { best_move: None, score: Score::cp(evaluate(&mated)) });
    }

    #[test]
    fn test_alpha_beta_matches_full_width() {
        let samples = [
            ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 2),
            ("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4", 2),
            ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3),
            ("6k1/5ppp/8/8/8/8/P4PPP/6K1 b - - 0 1", 3),
            ("7k/8/6K1/8/8/8/8/R7 w - - 0 1", 3),
        ];
        for (fen, depth) in samples {
            let pos = position(fen);
            let maximizing = pos.side_to_move() == Color::White;
            let pruned = searcher().search(&pos, Depth::new(depth), maximizing).unwrap();
            assert_eq!(pruned.score, full_width(&pos, depth, 0, maximizing), "{fen}");
        }
    }

    #[test]
    fn test_deterministic_and_non_mutating() {
        let pos = position("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let before = pos.clone();
        let first = searcher().search(&pos, Depth::new(2), true).unwrap();
        let second = searcher().search(&pos, Depth::new(2), true).unwrap();
        assert_eq!(first, second);
        assert_eq!(pos, before);
    }

    #[derive(Clone)]
    struct Stuck;

    impl GameState for Stuck {
        type Move = u8;
        fn legal_moves(&self) -> Vec<u8> {
            Vec::new()
        }
        fn play(&mut self, _mv: u8) {}
        fn outcome(&self) -> Option<Outcome> {
            None
        }
        fn side_to_move(&self) -> Color {
            Color::White
        }
    }

    #[test]
    fn test_stuck_position_fails_loudly() {
        let mut minimax = Minimax::new(|_: &Stuck| 0, TerminalScoring::Decisive);
        let err = minimax.search(&Stuck, Depth::ONE, true).unwrap_err();
        assert!(matches!(err, SearchError::StuckPosition));
        // At the horizon the evaluator answers before moves are needed.
        assert!(minimax.search(&Stuck, Depth::ZERO, true).is_ok());
    }
}
