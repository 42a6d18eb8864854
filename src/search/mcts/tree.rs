//! Arena-backed MCTS tree.
//!
//! Nodes live in one `Vec` and refer to each other by index. Parent links are
//! plain indices and own nothing; the whole arena is dropped after a search.

use crate::rules::GameState;
use crate::types::Color;

/// Handle of a node inside a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root is always the first node
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One explored position
#[derive(Debug, Clone)]
pub struct Node<S: GameState> {
    state: S,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Move that led here from the parent, None for the root
    mv: Option<S::Move>,
    /// Legal moves in enumeration order; the first `children.len()` are expanded
    moves: Vec<S::Move>,
    terminal: bool,
    visits: u32,
    /// Accumulated rollout value for the side that moved into this node
    wins: f64,
}

impl<S: GameState> Node<S> {
    fn new(state: S, parent: Option<NodeId>, mv: Option<S::Move>) -> Self {
        let terminal = state.is_terminal();
        let moves = if terminal { Vec::new() } else { state.legal_moves() };
        Self {
            state,
            parent,
            children: Vec::new(),
            mv,
            moves,
            terminal,
            visits: 0,
            wins: 0.0,
        }
    }

    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn mv(&self) -> Option<S::Move> {
        self.mv
    }

    #[inline]
    pub fn visits(&self) -> u32 {
        self.visits
    }

    #[inline]
    pub fn wins(&self) -> f64 {
        self.wins
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// One child per legal move
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.children.len() == self.moves.len()
    }

    /// First legal move without a child yet
    #[inline]
    pub fn next_untried(&self) -> Option<S::Move> {
        self.moves.get(self.children.len()).copied()
    }
}

/// The search tree of a single MCTS call
#[derive(Debug, Clone)]
pub struct Tree<S: GameState> {
    nodes: Vec<Node<S>>,
}

impl<S: GameState> Tree<S> {
    pub fn new(root: S) -> Self {
        Self {
            nodes: vec![Node::new(root, None, None)],
        }
    }

    #[inline]
    pub fn root(&self) -> &Node<S> {
        &self.nodes[NodeId::ROOT.0]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Expand the first untried move of `parent` and return the new child
    pub fn expand(&mut self, parent: NodeId) -> Option<NodeId> {
        let node = &self.nodes[parent.0];
        if node.terminal {
            return None;
        }
        let mv = node.next_untried()?;
        let state = node.state.after(mv);

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(state, Some(parent), Some(mv)));
        self.nodes[parent.0].children.push(id);
        Some(id)
    }

    /// UCB1 of `id` as seen from its parent; unvisited nodes are infinitely urgent
    pub fn ucb1(&self, id: NodeId, exploration: f64) -> f64 {
        let node = &self.nodes[id.0];
        if node.visits == 0 {
            return f64::INFINITY;
        }
        let parent_visits = node
            .parent
            .map_or(node.visits, |parent| self.nodes[parent.0].visits);
        let visits = f64::from(node.visits);
        node.wins / visits + exploration * (f64::from(parent_visits).ln() / visits).sqrt()
    }

    /// Child of `id` with the highest UCB1, first one on ties
    pub fn best_ucb1_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        first_max_by(self.nodes[id.0].children.iter().copied(), |&child| self.ucb1(child, exploration))
    }

    /// Walk from `id` to the root adding one visit and the rollout `value`.
    ///
    /// `value` is from White's perspective. Each node stores it for the side
    /// that moved into the node (the opposite of its side to move), which is
    /// the side choosing between siblings at the parent.
    pub fn backpropagate(&mut self, id: NodeId, value: f64) {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = &mut self.nodes[id.0];
            node.visits += 1;
            node.wins += match node.state.side_to_move() {
                Color::Black => value,
                Color::White => -value,
            };
            current = node.parent;
        }
    }

    /// Most visited child of the root, first one on ties
    pub fn most_visited_child(&self) -> Option<NodeId> {
        first_max_by(self.root().children.iter().copied(), |&child| f64::from(self.nodes[child.0].visits))
    }

    /// Move leading to the most visited child of the root
    pub fn best_move(&self) -> Option<S::Move> {
        self.most_visited_child().and_then(|id| self.nodes[id.0].mv)
    }
}

/// Like `Iterator::max_by_key` but keeps the first maximum instead of the last
fn first_max_by<I, F>(items: I, mut key: F) -> Option<NodeId>
where
    I: Iterator<Item = NodeId>,
    F: FnMut(&NodeId) -> f64,
{
    let mut best: Option<(NodeId, f64)> = None;
    for item in items {
        let value = key(&item);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((item, value)),
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Outcome;

    /// Counting game: add 1 or 2, the game ends at 4 or more.
    #[derive(Debug, Clone, PartialEq)]
    struct Count {
        total: u8,
        white_to_move: bool,
    }

    impl GameState for Count {
        type Move = u8;

        fn legal_moves(&self) -> Vec<u8> {
            if self.total >= 4 { Vec::new() } else { vec![1, 2] }
        }

        fn play(&mut self, mv: u8) {
            self.total += mv;
            self.white_to_move = !self.white_to_move;
        }

        fn outcome(&self) -> Option<Outcome> {
            (self.total >= 4).then_some(Outcome::Draw)
        }

        fn side_to_move(&self) -> Color {
            if self.white_to_move { Color::White } else { Color::Black }
        }
    }

    fn tree() -> Tree<Count> {
        Tree::new(Count { total: 0, white_to_move: true })
    }

    #[test]
    fn test_expand_in_enumeration_order() {
        let mut tree = tree();
        assert!(!tree.root().is_fully_expanded());
        let first = tree.expand(NodeId::ROOT).unwrap();
        let second = tree.expand(NodeId::ROOT).unwrap();
        assert_eq!(tree.expand(NodeId::ROOT), None);
        assert!(tree.root().is_fully_expanded());

        assert_eq!(tree.node(first).mv(), Some(1));
        assert_eq!(tree.node(second).mv(), Some(2));
        assert_eq!(tree.node(first).parent(), Some(NodeId::ROOT));
        assert_eq!(tree.root().children(), &[first, second]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_terminal_nodes_are_never_expanded() {
        let mut tree = Tree::new(Count { total: 4, white_to_move: true });
        assert!(tree.root().is_terminal());
        assert!(tree.root().is_fully_expanded());
        assert_eq!(tree.expand(NodeId::ROOT), None);
    }

    #[test]
    fn test_backpropagation_signs() {
        let mut tree = tree();
        let child = tree.expand(NodeId::ROOT).unwrap(); // Black to move
        let grandchild = tree.expand(child).unwrap(); // White to move

        // White wins the rollout from the grandchild.
        tree.backpropagate(grandchild, 1.0);

        // Black moved into the grandchild: bad for Black.
        assert_eq!(tree.node(grandchild).wins(), -1.0);
        // White moved into the child: good for White.
        assert_eq!(tree.node(child).wins(), 1.0);
        // Root has White to move, same rule applies.
        assert_eq!(tree.root().wins(), -1.0);

        // A Black win flips every sign.
        tree.backpropagate(grandchild, -1.0);
        assert_eq!(tree.node(grandchild).wins(), 0.0);
        assert_eq!(tree.node(child).wins(), 0.0);
        for id in [NodeId::ROOT, child, grandchild] {
            assert_eq!(tree.node(id).visits(), 2);
        }
    }

    #[test]
    fn test_ucb1() {
        let mut tree = tree();
        let first = tree.expand(NodeId::ROOT).unwrap();
        let second = tree.expand(NodeId::ROOT).unwrap();
        assert_eq!(tree.ucb1(first, 1.4), f64::INFINITY);

        tree.backpropagate(first, 1.0);
        // second is still unvisited, so it is preferred over any visited sibling
        assert_eq!(tree.best_ucb1_child(NodeId::ROOT, 1.4), Some(second));

        tree.backpropagate(second, 0.0);
        // first: 1/1 + 1.4 * sqrt(ln 2 / 1), second: 0 + same exploration term
        let expected = 1.0 + 1.4 * 2f64.ln().sqrt();
        assert!((tree.ucb1(first, 1.4) - expected).abs() < 1e-12);
        assert_eq!(tree.best_ucb1_child(NodeId::ROOT, 1.4), Some(first));
    }

    #[test]
    fn test_ties_keep_first_child() {
        let mut tree = tree();
        let first = tree.expand(NodeId::ROOT).unwrap();
        let second = tree.expand(NodeId::ROOT).unwrap();
        assert_eq!(tree.best_ucb1_child(NodeId::ROOT, 1.4), Some(first));

        tree.backpropagate(first, 0.0);
        tree.backpropagate(second, 0.0);
        assert_eq!(tree.most_visited_child(), Some(first));
        assert_eq!(tree.best_move(), Some(1));

        tree.backpropagate(second, 0.0);
        assert_eq!(tree.best_move(), Some(2));
    }
}
