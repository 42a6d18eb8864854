//! Static position evaluation.
//!
//! Scores are centipawns from White's point of view and only depend on the
//! piece placement, never on whose turn it is.

pub mod hce;

pub use hce::evaluate;

use crate::rules::ChessPosition;
use crate::types::Value;

/// A static evaluation function used at the minimax horizon
pub trait Evaluator<S> {
    fn evaluate(&self, state: &S) -> Value;
}

/// Any `Fn(&S) -> Value` can serve as an evaluator.
impl<S, F> Evaluator<S> for F
where
    F: Fn(&S) -> Value,
{
    #[inline]
    fn evaluate(&self, state: &S) -> Value {
        self(state)
    }
}

/// The hand-crafted evaluation in [`hce`]
#[derive(Debug, Clone, Copy, Default)]
pub struct HandCrafted;

impl Evaluator<ChessPosition> for HandCrafted {
    #[inline]
    fn evaluate(&self, state: &ChessPosition) -> Value {
        hce::evaluate(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_and_hce_agree() {
        let pos = ChessPosition::from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        let closure = |p: &ChessPosition| evaluate(p);
        assert_eq!(closure.evaluate(&pos), HandCrafted.evaluate(&pos));
    }
}
