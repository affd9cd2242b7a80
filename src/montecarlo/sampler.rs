use std::ops::Range;

use crate::config::GameConfig;
use crate::search::{AlphaBeta, SearchError};
use crate::state::{GameState, Player};
use crate::tile::Tile;
use crate::tree::GameTree;

/// Read-only inputs shared by every worker during one ply.
pub(super) struct SampleSet<'a> {
    pub config: &'a GameConfig,
    pub state: &'a GameState,
    /// Side whose hand is hidden from the mover.
    pub opponent: Player,
    pub pool: &'a [Tile],
    /// Sampled opponent hands as index sets into `pool`.
    pub hands: &'a [Vec<usize>],
    /// Number of root children, identical across samples.
    pub branching: usize,
}

/// One worker's private result.
#[derive(Debug, Clone, Default)]
pub(super) struct Tally {
    pub votes: Vec<u64>,
    pub samples: usize,
    pub nodes: u64,
}

impl Tally {
    pub fn merge(mut self, other: Tally) -> Tally {
        if self.votes.len() < other.votes.len() {
            self.votes.resize(other.votes.len(), 0);
        }
        for (acc, v) in self.votes.iter_mut().zip(other.votes) {
            *acc += v;
        }
        self.samples += other.samples;
        self.nodes += other.nodes;
        self
    }
}

/// Split `0..samples` into `workers` contiguous ranges; the last one takes the remainder.
pub(super) fn segments(samples: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.clamp(1, samples.max(1));
    let size = samples / workers;
    (0..workers)
        .map(|w| {
            let start = w * size;
            let end = if w == workers - 1 { samples } else { start + size };
            start..end
        })
        .collect()
}

/// Solve each sampled world in `range` and vote for its best root child.
///
/// Stops after the first sample when the mover has a single legal move.
pub(super) fn process_segment(set: &SampleSet<'_>, range: Range<usize>) -> Result<Tally, SearchError> {
    let mut tally = Tally { votes: vec![0; set.branching], ..Tally::default() };
    let mut search = AlphaBeta::new(set.config);
    let mut working = set.state.clone();
    let mut tree = GameTree::new(set.config, working.clone());
    let mover = set.state.turn;

    for sample in &set.hands[range.clone()] {
        let hand = working.hand_mut(set.opponent);
        hand.clear();
        hand.extend(sample.iter().map(|&i| set.pool[i]));
        tree.reset(working.clone());

        search.search_tree(&mut tree, false)?;
        tally.nodes += search.last_stats().nodes;
        tally.samples += 1;

        let root = tree.root();
        let children = tree.children(root);
        let mut best = 0;
        for (i, &child) in children.iter().enumerate().skip(1) {
            let value = tree[child].evaluation;
            let current = tree[children[best]].evaluation;
            let better = match mover {
                Player::Max => value > current,
                Player::Min => value < current,
            };
            if better {
                best = i;
            }
        }
        if best >= tally.votes.len() {
            tally.votes.resize(children.len(), 0);
        }
        tally.votes[best] += 1;

        if children.len() == 1 {
            break;
        }
    }
    log::trace!("segment {:?}: samples={} votes={:?}", range, tally.samples, tally.votes);
    Ok(tally)
}
