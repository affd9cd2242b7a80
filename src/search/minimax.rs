use crate::config::GameConfig;
use crate::state::{GameState, Player};
use crate::tree::{GameTree, NodeId};

use super::{SearchReport, SearchStats};

/// Unpruned minimax over the full game tree.
///
/// By default each child's subtree is released as soon as its value is known,
/// so memory stays proportional to the search depth. [`Self::keep_tree`]
/// retains every expanded node instead.
pub struct Minimax<'c> {
    config: &'c GameConfig,
    keep_tree: bool,
    stats: SearchStats,
}

impl<'c> Minimax<'c> {
    pub fn new(config: &'c GameConfig) -> Self {
        Self { config, keep_tree: false, stats: SearchStats::default() }
    }

    /// Keep expanded subtrees in the arena after they are evaluated.
    pub fn keep_tree(mut self, keep: bool) -> Self {
        self.keep_tree = keep;
        self
    }

    /// Search a fresh tree rooted at `root` with the full depth budget.
    pub fn run(&mut self, root: &GameState) -> SearchReport {
        let mut tree = GameTree::new(self.config, root.clone());
        let value = self.search_tree(&mut tree);
        SearchReport { value, nodes_visited: self.stats.nodes, path: None }
    }

    /// Search an existing tree from its root, caching values in place.
    pub fn search_tree(&mut self, tree: &mut GameTree<'_>) -> i32 {
        self.stats.nodes = 0;
        self.stats.peak_nodes = tree.len() as u64;
        let root = tree.root();
        let value = self.minimax(tree, root, self.config.max_depth());
        log::debug!("minimax: value={} nodes={} peak={}", value, self.stats.nodes, self.stats.peak_nodes);
        value
    }

    /// Statistics from the last call to [`Self::run`] or [`Self::search_tree`].
    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    fn minimax(&mut self, tree: &mut GameTree<'_>, id: NodeId, budget: usize) -> i32 {
        self.stats.nodes += 1;
        let evaluation = tree[id].evaluate();
        if budget == 0 || evaluation.is_terminal() {
            let value = evaluation.value_or(self.config.pos_inf());
            tree[id].evaluation = value;
            return value;
        }

        let children = tree.expand(id);
        self.stats.peak_nodes = self.stats.peak_nodes.max(tree.len() as u64);
        let mover = tree[id].turn;
        let mut value = mover.sentinel(self.config);
        for child in children {
            let child_value = self.minimax(tree, child, budget - 1);
            if !self.keep_tree {
                tree.collapse(child);
            }
            value = match mover {
                Player::Max => value.max(child_value),
                Player::Min => value.min(child_value),
            };
            tree[id].evaluation = value;
        }
        value
    }
}
