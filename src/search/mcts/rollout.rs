//! Rollout policies for MCTS.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SearchError;
use crate::rules::GameState;

/// Estimates the value of a position by playing it out
pub trait Rollout<S: GameState> {
    /// Play from `state` to the end of the game on a private copy.
    ///
    /// Returns +1 for a White win, -1 for a Black win and 0 for a draw.
    fn play(&mut self, state: &S) -> Result<f64, SearchError>;
}

/// Uniformly random legal moves until the game is over
#[derive(Debug, Clone)]
pub struct RandomRollout<R> {
    rng: R,
}

impl<R: Rng> RandomRollout<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<S: GameState, R: Rng> Rollout<S> for RandomRollout<R> {
    fn play(&mut self, state: &S) -> Result<f64, SearchError> {
        let mut game = state.clone();
        loop {
            if let Some(outcome) = game.outcome() {
                return Ok(outcome.value());
            }
            let moves = game.legal_moves();
            let &mv = moves.choose(&mut self.rng).ok_or(SearchError::StuckPosition)?;
            game.play(mv);
        }
    }
}
