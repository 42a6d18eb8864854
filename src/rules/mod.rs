//! Rules engine boundary.
//!
//! The searches never look inside a position. They only enumerate moves,
//! apply them to copies, and ask whether (and how) the game has ended.
//! [`ChessPosition`] is the concrete implementation backed by the `chess` crate.

mod chess_position;

pub use chess_position::{mirror_square, ChessPosition};

use std::fmt;
use std::hash::Hash;

use crate::types::Color;

/// Final result of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    WhiteWin,
    BlackWin,
    Draw,
}

impl Outcome {
    /// Rollout value from White's perspective: +1 win, -1 loss, 0 draw
    #[inline]
    pub const fn value(self) -> f64 {
        match self {
            Outcome::WhiteWin => 1.0,
            Outcome::BlackWin => -1.0,
            Outcome::Draw => 0.0,
        }
    }

    /// The side that lost when `side` is checkmated
    #[inline]
    pub const fn mated(side: Color) -> Self {
        match side {
            Color::White => Outcome::BlackWin,
            Color::Black => Outcome::WhiteWin,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::WhiteWin => "1-0",
            Outcome::BlackWin => "0-1",
            Outcome::Draw => "1/2-1/2",
        })
    }
}

/// A two-player, perfect-information game position.
///
/// Enumeration order of [`legal_moves`](GameState::legal_moves) must be
/// stable for a fixed position so that both searches are reproducible.
pub trait GameState: Clone {
    /// Edge label between two positions
    type Move: Copy + Eq + Hash + fmt::Debug + fmt::Display;

    /// All legal moves for the side to move
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Apply a legal move in place
    fn play(&mut self, mv: Self::Move);

    /// The position after `mv`, leaving `self` untouched
    fn after(&self, mv: Self::Move) -> Self {
        let mut next = self.clone();
        next.play(mv);
        next
    }

    /// `Some` once the game is over
    fn outcome(&self) -> Option<Outcome>;

    #[inline]
    fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    fn side_to_move(&self) -> Color;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_values() {
        assert_eq!(Outcome::WhiteWin.value(), 1.0);
        assert_eq!(Outcome::BlackWin.value(), -1.0);
        assert_eq!(Outcome::Draw.value(), 0.0);
        assert_eq!(Outcome::mated(Color::Black), Outcome::WhiteWin);
        assert_eq!(Outcome::Draw.to_string(), "1/2-1/2");
    }
}
