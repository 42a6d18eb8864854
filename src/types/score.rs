//! Score type for minimax search.
//!
//! Scores are always from White's point of view: positive favours White.
//! Regular centipawn scores and mate sentinels share one integer line so that
//! plain integer comparison orders them correctly.

use std::fmt;

use super::Value;

// Special score values
const SCORE_INFINITY: i32 = 1_000_000;
const SCORE_MATE: i32 = 900_000;
const SCORE_DRAW: i32 = 0;

// Anything beyond this is a mate score. Static evaluation never gets close.
const SCORE_MATE_BOUND: i32 = SCORE_MATE - 1_000;

/// A search score from White's perspective.
///
/// White delivering mate in N plies is encoded as `SCORE_MATE - N`,
/// Black delivering mate in N plies as `-SCORE_MATE + N`, so faster mates
/// compare as better for the side delivering them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Score(pub i32);

impl Score {
    /// Create a new score from centipawns
    #[inline]
    pub const fn cp(centipawns: Value) -> Self {
        Score(centipawns)
    }

    /// White mates `ply` plies from the root
    #[inline]
    pub const fn white_mates_in(ply: i32) -> Self {
        Score(SCORE_MATE - ply)
    }

    /// Black mates `ply` plies from the root
    #[inline]
    pub const fn black_mates_in(ply: i32) -> Self {
        Score(-SCORE_MATE + ply)
    }

    /// Draw score
    #[inline]
    pub const fn draw() -> Self {
        Score(SCORE_DRAW)
    }

    /// Infinity (for alpha-beta bounds)
    #[inline]
    pub const fn infinity() -> Self {
        Score(SCORE_INFINITY)
    }

    /// Negative infinity
    #[inline]
    pub const fn neg_infinity() -> Self {
        Score(-SCORE_INFINITY)
    }

    /// Get the raw value
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Check if White is mating
    #[inline]
    pub const fn is_white_mate(self) -> bool {
        self.0 >= SCORE_MATE_BOUND && self.0 < SCORE_INFINITY
    }

    /// Check if Black is mating
    #[inline]
    pub const fn is_black_mate(self) -> bool {
        self.0 <= -SCORE_MATE_BOUND && self.0 > -SCORE_INFINITY
    }

    /// Check if this is any kind of mate score
    #[inline]
    pub const fn is_mate_score(self) -> bool {
        self.is_white_mate() || self.is_black_mate()
    }

    /// Get mate distance in plies (if this is a mate score)
    #[inline]
    pub const fn mate_distance(self) -> Option<i32> {
        if self.is_white_mate() {
            Some(SCORE_MATE - self.0)
        } else if self.is_black_mate() {
            Some(self.0 + SCORE_MATE)
        } else {
            None
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mate_distance() {
            Some(plies) if self.is_white_mate() => write!(f, "mate {}", (plies + 1) / 2),
            Some(plies) => write!(f, "mate -{}", (plies + 1) / 2),
            None => write!(f, "cp {}", self.0),
        }
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score({})", self)
    }
}
