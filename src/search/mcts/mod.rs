//! Implements [Monte Carlo Tree Search] (MCTS) with UCB1 selection.
//!
//! 1. Selection: from the root, descend to the child with the highest UCB1
//!    while the current node is fully expanded and not terminal.
//! 2. Expansion: add one child for the first untried move and step into it.
//! 3. Simulation: play random moves from the new node until the game ends.
//! 4. Backpropagation: add the result to every node on the path to the root.
//!
//! The tree is rebuilt on every call and dropped once a move is chosen.
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

mod rollout;
mod tree;

pub use rollout::{RandomRollout, Rollout};
pub use tree::{Node, NodeId, Tree};

use tracing::{debug, trace};

use crate::error::SearchError;
use crate::rules::GameState;

/// Default exploration constant, sqrt(2) rounded to one decimal
pub const DEFAULT_EXPLORATION: f64 = 1.4;

/// Default number of simulations per move decision
pub const DEFAULT_SIMULATIONS: u32 = 200;

/// MCTS searcher
#[derive(Debug, Clone)]
pub struct Mcts<R> {
    rollout: R,
    simulations: u32,
    exploration: f64,
}

impl<R> Mcts<R> {
    pub fn new(rollout: R, simulations: u32, exploration: f64) -> Self {
        Self {
            rollout,
            simulations,
            exploration,
        }
    }

    #[inline]
    pub fn simulations(&self) -> u32 {
        self.simulations
    }

    #[inline]
    pub fn exploration(&self) -> f64 {
        self.exploration
    }

    /// Run the full simulation budget from `root` and return the resulting tree
    pub fn grow<S>(&mut self, root: &S) -> Result<Tree<S>, SearchError>
    where
        S: GameState,
        R: Rollout<S>,
    {
        if self.simulations == 0 {
            return Err(SearchError::EmptyBudget(self.simulations));
        }

        let mut tree = Tree::new(root.clone());

        for iteration in 0..self.simulations {
            let selected = self.select(&tree)?;

            // A terminal node is simulated as it is.
            let leaf = tree.expand(selected).unwrap_or(selected);

            let value = self.rollout.play(tree.node(leaf).state())?;
            tree.backpropagate(leaf, value);

            trace!(iteration, leaf = leaf.index(), value, "simulation");
        }

        debug!(
            simulations = self.simulations,
            nodes = tree.len(),
            root_children = tree.root().children().len(),
            "mcts tree grown"
        );

        Ok(tree)
    }

    /// Most visited root move after the full simulation budget.
    ///
    /// Fails with [`SearchError::NoCandidates`] when the root is terminal.
    pub fn best_move<S>(&mut self, root: &S) -> Result<S::Move, SearchError>
    where
        S: GameState,
        R: Rollout<S>,
    {
        self.grow(root)?.best_move().ok_or(SearchError::NoCandidates)
    }

    fn select<S: GameState>(&self, tree: &Tree<S>) -> Result<NodeId, SearchError> {
        let mut current = NodeId::ROOT;
        loop {
            let node = tree.node(current);
            if node.is_terminal() || !node.is_fully_expanded() {
                return Ok(current);
            }
            // Fully expanded with no children means a non-terminal position without moves.
            current = tree
                .best_ucb1_child(current, self.exploration)
                .ok_or(SearchError::StuckPosition)?;
        }
    }
}
