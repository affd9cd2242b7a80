use crate::config::GameConfig;
use crate::state::{GameState, Player};
use crate::tree::{GameTree, NodeId};

use super::{SearchError, SearchReport, SearchStats};

/// A score together with the node that achieved it.
///
/// Alpha and beta are carried as bounds rather than bare scores so the
/// winning leaf survives to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound {
    pub node: Option<NodeId>,
    pub score: i32,
}

impl Bound {
    #[inline]
    fn unset(score: i32) -> Self { Self { node: None, score } }
}

/// Alpha-beta search over a [`GameTree`].
///
/// Without path recording, every searched child's subtree is dropped as soon
/// as its value is known and the bound is re-pointed at that child, so the
/// winning node reported at the root is one of the root's children. With
/// recording, the whole explored tree is kept and the bound names the
/// principal leaf.
pub struct AlphaBeta<'c> {
    config: &'c GameConfig,
    record_path: bool,
    stats: SearchStats,
}

impl<'c> AlphaBeta<'c> {
    pub fn new(config: &'c GameConfig) -> Self {
        Self { config, record_path: false, stats: SearchStats::default() }
    }

    /// Search a fresh tree rooted at `root`.
    pub fn run(&mut self, root: &GameState, record_path: bool) -> Result<SearchReport, SearchError> {
        let mut tree = GameTree::new(self.config, root.clone());
        let best = self.search_tree(&mut tree, record_path)?;
        let path = match (record_path, best.node) {
            (true, Some(leaf)) => Some(tree.path_to_root(leaf)),
            _ => None,
        };
        Ok(SearchReport { value: best.score, nodes_visited: self.stats.nodes, path })
    }

    /// Search `tree` from its root and verify the result.
    ///
    /// After the call every root child holds its backed-up value in
    /// `evaluation`; pruned children hold a bound that cannot beat the best.
    pub fn search_tree(&mut self, tree: &mut GameTree<'_>, record_path: bool) -> Result<Bound, SearchError> {
        self.record_path = record_path;
        self.stats.nodes = 0;
        self.stats.peak_nodes = tree.len() as u64;

        let root = tree.root();
        let alpha = Bound::unset(self.config.neg_inf());
        let beta = Bound::unset(self.config.pos_inf());
        let best = self.alpha_beta(tree, root, self.config.max_depth(), alpha, beta);

        let leaf = best.node.ok_or(SearchError::NoPrincipalLeaf)?;
        let cached = tree[leaf].evaluation;
        if cached != best.score {
            return Err(SearchError::LeafMismatch { returned: best.score, cached });
        }
        if record_path {
            let depth = tree[leaf].depth - tree[root].depth;
            let len = tree.path_to_root(leaf).len();
            if len != depth + 1 {
                return Err(SearchError::PathLength { len, depth });
            }
        }
        log::debug!(
            "alpha-beta: value={} nodes={} peak={}",
            best.score,
            self.stats.nodes,
            self.stats.peak_nodes
        );
        Ok(best)
    }

    #[inline]
    pub fn last_stats(&self) -> SearchStats { self.stats }

    fn alpha_beta(&mut self, tree: &mut GameTree<'_>, id: NodeId, budget: usize, mut alpha: Bound, mut beta: Bound) -> Bound {
        self.stats.nodes += 1;
        let evaluation = tree[id].evaluate();
        if budget == 0 || evaluation.is_terminal() {
            let score = evaluation.value_or(self.config.pos_inf());
            tree[id].evaluation = score;
            return Bound { node: Some(id), score };
        }

        let children = tree.expand(id);
        self.stats.peak_nodes = self.stats.peak_nodes.max(tree.len() as u64);
        let mover = tree[id].turn;
        let mut best = Bound::unset(mover.sentinel(self.config));

        for child in children {
            let mut found = self.alpha_beta(tree, child, budget - 1, alpha, beta);
            if !self.record_path {
                tree.collapse(child);
                found.node = Some(child);
            }
            match mover {
                Player::Max => {
                    if best.node.is_none() || found.score > best.score {
                        best = found;
                    }
                    tree[id].evaluation = best.score;
                    if best.score > alpha.score {
                        alpha = best;
                    }
                    if beta.score <= best.score {
                        break;
                    }
                }
                Player::Min => {
                    if best.node.is_none() || found.score < best.score {
                        best = found;
                    }
                    tree[id].evaluation = best.score;
                    if best.score < beta.score {
                        beta = best;
                    }
                    if best.score <= alpha.score {
                        break;
                    }
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;
    use crate::search::Minimax;
    use crate::tile::Tile;
    use rand::{rngs::StdRng, SeedableRng};

    fn t(a: u8, b: u8) -> Tile { Tile::new(a, b) }

    #[test]
    fn principal_line_is_consistent() {
        let cfg = GameConfig::new(3, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..5 {
            let game = Game::random_deal(&cfg, &mut rng);
            let root = GameState::initial(&game);
            let report = AlphaBeta::new(&cfg).run(&root, true).unwrap();
            let path = report.path.as_ref().unwrap();
            let leaf = &path[0];
            assert!(leaf.is_terminal());
            assert_eq!(leaf.evaluation, report.value);
            let top = path.last().unwrap();
            assert_eq!((top.depth, &top.max_hand, &top.min_hand), (0, &root.max_hand, &root.min_hand));
            // each step is the child produced by the recorded move
            for w in path.windows(2) {
                let (child, parent) = (&w[0], &w[1]);
                let mv = child.last_move.unwrap();
                let mut replay = parent.apply(mv, &cfg);
                replay.evaluation = child.evaluation;
                assert_eq!(&replay, child);
            }
        }
    }

    #[test]
    fn pruning_keeps_root_children_honest() {
        let cfg = GameConfig::new(3, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..5 {
            let game = Game::random_deal(&cfg, &mut rng);
            let mut pruned = GameTree::new(&cfg, GameState::initial(&game));
            let mut exact = pruned.clone();
            let best = AlphaBeta::new(&cfg).search_tree(&mut pruned, false).unwrap();
            let value = Minimax::new(&cfg).keep_tree(true).search_tree(&mut exact);
            assert_eq!(best.score, value);

            // the chosen root child is exactly optimal; no other child beats it
            let root = pruned.root();
            let chosen = best.node.unwrap();
            assert_eq!(pruned.parent(chosen), Some(root));
            let exact_kids = exact.children(exact.root()).to_vec();
            let pos = pruned.children(root).iter().position(|&c| c == chosen).unwrap();
            assert_eq!(exact[exact_kids[pos]].evaluation, value);
            for &c in pruned.children(root) {
                assert!(pruned[c].evaluation <= value);
            }
        }
    }

    #[test]
    fn without_recording_only_root_children_remain() {
        let cfg = GameConfig::new(3, 3).unwrap();
        let game = Game::from_hands(&cfg, vec![t(0, 1), t(1, 2), t(2, 3)], vec![t(0, 0), t(1, 3), t(3, 3)]);
        let mut tree = GameTree::new(&cfg, GameState::initial(&game));
        let mut search = AlphaBeta::new(&cfg);
        search.search_tree(&mut tree, false).unwrap();
        assert_eq!(tree.len(), 4);
        assert!(search.last_stats().peak_nodes > 4);
    }

    #[test]
    fn terminal_root_is_its_own_leaf() {
        let cfg = GameConfig::new(2, 2).unwrap();
        let game = Game::from_hands(&cfg, vec![t(0, 0), t(1, 1)], vec![t(0, 2), t(2, 2)]);
        let mut root = GameState::initial(&game);
        root.min_hand.clear();
        let report = AlphaBeta::new(&cfg).run(&root, true).unwrap();
        assert_eq!(report.value, -2);
        assert_eq!(report.nodes_visited, 1);
        assert_eq!(report.path.unwrap().len(), 1);
    }
}
