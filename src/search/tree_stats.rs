//! Shape of the complete game tree, measured without a search.
//!
//! The walk uses an explicit stack of owned states, independent of
//! [`crate::tree::GameTree`], so it can cross-check the recursive searches.

use std::fmt;

use crate::config::GameConfig;
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub leaf_nodes: u64,
    pub expanded_nodes: u64,
    /// Sum of child counts over expanded nodes.
    pub children_sum: u64,
    /// Smallest and largest leaf score.
    pub min_value: i32,
    pub max_value: i32,
    pub min_leaf_depth: usize,
    pub max_leaf_depth: usize,
}

impl TreeStats {
    #[inline]
    pub fn total_nodes(&self) -> u64 { self.leaf_nodes + self.expanded_nodes }

    pub fn average_branching_factor(&self) -> f64 {
        if self.expanded_nodes == 0 {
            return 0.0;
        }
        self.children_sum as f64 / self.expanded_nodes as f64
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Nodes: {}", self.total_nodes())?;
        writeln!(f, "Expanded Nodes: {}", self.expanded_nodes)?;
        writeln!(f, "Leaf Nodes: {}", self.leaf_nodes)?;
        writeln!(f, "Average Branching Factor: {:.3}", self.average_branching_factor())?;
        writeln!(f, "Leaf Values: [{}, {}]", self.min_value, self.max_value)?;
        writeln!(f, "Leaf Depths: [{}, {}]", self.min_leaf_depth, self.max_leaf_depth)
    }
}

/// Walk every node reachable from `root` within the configured depth budget.
///
/// ```
/// use dominoes_search::config::GameConfig;
/// use dominoes_search::game::Game;
/// use dominoes_search::search::generate_tree_stats;
/// use dominoes_search::state::GameState;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let cfg = GameConfig::new(2, 2).unwrap();
/// let game = Game::random_deal(&cfg, &mut StdRng::seed_from_u64(3));
/// let stats = generate_tree_stats(&cfg, &GameState::initial(&game));
/// assert_eq!(stats.total_nodes(), stats.children_sum + 1);
/// ```
pub fn generate_tree_stats(config: &GameConfig, root: &GameState) -> TreeStats {
    let mut stats = TreeStats {
        leaf_nodes: 0,
        expanded_nodes: 0,
        children_sum: 0,
        min_value: config.pos_inf(),
        max_value: config.neg_inf(),
        min_leaf_depth: usize::MAX,
        max_leaf_depth: 0,
    };

    let mut stack = vec![(root.clone(), config.max_depth())];
    while let Some((state, budget)) = stack.pop() {
        let evaluation = state.evaluate();
        if budget == 0 || evaluation.is_terminal() {
            let value = evaluation.value_or(config.pos_inf());
            stats.leaf_nodes += 1;
            stats.min_value = stats.min_value.min(value);
            stats.max_value = stats.max_value.max(value);
            stats.min_leaf_depth = stats.min_leaf_depth.min(state.depth);
            stats.max_leaf_depth = stats.max_leaf_depth.max(state.depth);
            continue;
        }

        let moves = state.legal_moves();
        stats.expanded_nodes += 1;
        stats.children_sum += moves.len() as u64;
        // reversed so children pop in move order
        for mv in moves.into_iter().rev() {
            stack.push((state.apply(mv, config), budget - 1));
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;
    use crate::search::{cross_check, run_minimax};
    use crate::tile::Tile;
    use rand::{rngs::StdRng, SeedableRng};

    fn t(a: u8, b: u8) -> Tile { Tile::new(a, b) }

    #[test]
    fn counts_a_hand_built_tree() {
        // Opening (0,1): min plays (0,0), max goes out with (1,2).
        // Opening (1,2): min plays (2,2), max goes out with (0,1).
        let cfg = GameConfig::new(2, 2).unwrap();
        let game = Game::from_hands(&cfg, vec![t(0, 1), t(1, 2)], vec![t(0, 0), t(2, 2)]);
        let stats = generate_tree_stats(&cfg, &GameState::initial(&game));
        assert_eq!(stats.expanded_nodes, 5);
        assert_eq!(stats.leaf_nodes, 2);
        assert_eq!(stats.total_nodes(), 7);
        assert_eq!((stats.min_value, stats.max_value), (0, 4));
        assert_eq!((stats.min_leaf_depth, stats.max_leaf_depth), (3, 3));
        assert!((stats.average_branching_factor() - 1.2).abs() < 1e-9);
    }

    #[test]
    fn leaf_depths_respect_the_budget() {
        let cfg = GameConfig::new(4, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(77);
        for _ in 0..3 {
            let game = Game::random_deal(&cfg, &mut rng);
            let stats = generate_tree_stats(&cfg, &GameState::initial(&game));
            assert!(stats.max_leaf_depth <= cfg.max_depth());
            assert!(stats.min_leaf_depth >= 3);
            assert!(stats.max_value <= cfg.total_points());
            assert!(stats.min_value >= -cfg.total_points());
        }
    }

    #[test]
    fn display_lists_counts() {
        let cfg = GameConfig::new(2, 2).unwrap();
        let game = Game::from_hands(&cfg, vec![t(0, 1), t(1, 2)], vec![t(0, 0), t(2, 2)]);
        let text = generate_tree_stats(&cfg, &GameState::initial(&game)).to_string();
        assert!(text.starts_with("Total Nodes: 7\n"));
        assert!(text.contains("Average Branching Factor: 1.200"));
    }

    #[test]
    #[ignore = "solves a full double-six deal twice; minutes in debug builds"]
    fn double_six_full_cross_check() {
        let cfg = GameConfig::default();
        let game = Game::random_deal(&cfg, &mut StdRng::seed_from_u64(2019));
        let root = GameState::initial(&game);
        let (full, pruned) = cross_check(&cfg, &root).unwrap();
        assert!(full.value.abs() <= cfg.total_points());
        assert!(pruned.nodes_visited <= full.nodes_visited);
        assert_eq!(run_minimax(&cfg, &root).nodes_visited, generate_tree_stats(&cfg, &root).total_nodes());
    }
}
