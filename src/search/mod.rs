//! Exact full-information search.
//!
//! Two searchers share one surface:
//! - [`Minimax`]: unpruned post-order minimax, the reference value.
//! - [`AlphaBeta`]: fail-hard alpha-beta carrying the winning leaf, so the
//!   principal line can be rebuilt from parent links.
//!
//! Both are single-threaded and deterministic. They mutate the arena they
//! are given (expansion and cached evaluations) and nothing else.
//!
//! ```
//! use dominoes_search::config::GameConfig;
//! use dominoes_search::game::Game;
//! use dominoes_search::search::{run_alpha_beta, run_minimax};
//! use dominoes_search::state::GameState;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let cfg = GameConfig::new(3, 4).unwrap();
//! let game = Game::random_deal(&cfg, &mut StdRng::seed_from_u64(11));
//! let root = GameState::initial(&game);
//!
//! let full = run_minimax(&cfg, &root);
//! let pruned = run_alpha_beta(&cfg, &root, true).unwrap();
//! assert_eq!(full.value, pruned.value);
//! assert!(pruned.nodes_visited <= full.nodes_visited);
//! ```

use std::fmt;

use crate::config::GameConfig;
use crate::state::GameState;
use crate::tile::Tile;

mod alpha_beta;
mod minimax;
pub mod tree_stats;

pub use alpha_beta::{AlphaBeta, Bound};
pub use minimax::Minimax;
pub use tree_stats::{generate_tree_stats, TreeStats};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("alpha-beta value {alpha_beta} disagrees with minimax value {minimax}")]
    ValueMismatch { minimax: i32, alpha_beta: i32 },
    #[error("alpha-beta finished without a principal leaf")]
    NoPrincipalLeaf,
    #[error("principal leaf caches {cached} but search returned {returned}")]
    LeafMismatch { returned: i32, cached: i32 },
    #[error("recorded path has {len} states, expected depth {depth} + 1")]
    PathLength { len: usize, depth: usize },
    #[error("node-count mismatch: minimax visited {visited}, tree walk found {walked}")]
    NodeCountMismatch { visited: u64, walked: u64 },
    #[error("sample budget must be at least 1")]
    EmptySampleBudget,
    #[error("no opponent hand of {hand_size} fits a pool of {pool_size} tiles")]
    NoDeterminizations { hand_size: usize, pool_size: usize },
    #[error("{tile} played at depth {depth} was not in the mover's pool")]
    UnknownTile { tile: Tile, depth: usize },
    #[error("no sample voted for a move at depth {depth}")]
    NoVotes { depth: usize },
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Counters from the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub peak_nodes: u64,
}

/// Outcome of one exact search from a root.
///
/// `path`, when recorded, runs from the principal leaf back to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub value: i32,
    pub nodes_visited: u64,
    pub path: Option<Vec<GameState>>,
}

impl SearchReport {
    /// Recorded path in play order (root first).
    pub fn path_from_root(&self) -> impl Iterator<Item = &GameState> {
        self.path.iter().flat_map(|p| p.iter().rev())
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes Visited: {}", self.nodes_visited)?;
        writeln!(f, "Minimax Value: {}", self.value)?;
        if self.path.is_some() {
            writeln!(f, "\nPath:")?;
            for state in self.path_from_root() {
                writeln!(f, "{}", state)?;
            }
        }
        Ok(())
    }
}

/// Full minimax from `root` with the configured depth budget.
pub fn run_minimax(config: &GameConfig, root: &GameState) -> SearchReport {
    Minimax::new(config).run(root)
}

/// Alpha-beta from `root`, optionally keeping the principal line.
pub fn run_alpha_beta(config: &GameConfig, root: &GameState, record_path: bool) -> Result<SearchReport, SearchError> {
    AlphaBeta::new(config).run(root, record_path)
}

/// Run both searches and fail if their root values differ.
pub fn cross_check(config: &GameConfig, root: &GameState) -> Result<(SearchReport, SearchReport), SearchError> {
    let full = run_minimax(config, root);
    let pruned = run_alpha_beta(config, root, false)?;
    if full.value != pruned.value {
        return Err(SearchError::ValueMismatch { minimax: full.value, alpha_beta: pruned.value });
    }
    Ok((full, pruned))
}
