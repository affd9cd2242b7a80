//! Arena-backed search tree.
//!
//! Nodes own their payload by value; `parent` is a plain index used only to
//! walk back from a leaf, so dropping the arena drops everything at once.

use std::ops::{Index, IndexMut};

use crate::config::GameConfig;
use crate::state::GameState;

/// Handle to a node inside one [`GameTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    state: GameState,
    parent: Option<NodeId>,
    /// `None` until expanded.
    children: Option<Vec<NodeId>>,
}

/// A search tree rooted at a single state, grown on demand.
#[derive(Debug, Clone)]
pub struct GameTree<'c> {
    config: &'c GameConfig,
    nodes: Vec<Node>,
}

impl<'c> GameTree<'c> {
    pub fn new(config: &'c GameConfig, root: GameState) -> Self {
        Self { config, nodes: vec![Node { state: root, parent: None, children: None }] }
    }

    #[inline]
    pub fn root(&self) -> NodeId { NodeId(0) }

    /// Number of nodes materialized so far.
    #[inline]
    pub fn len(&self) -> usize { self.nodes.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> { self.nodes[id.0].parent }

    /// Children of `id`, empty if it has not been expanded.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes[id.0].children.as_deref().unwrap_or(&[])
    }

    #[inline]
    pub fn is_expanded(&self, id: NodeId) -> bool { self.nodes[id.0].children.is_some() }

    /// Generate the children of `id` (one per legal move, in move order).
    ///
    /// Expanding an already expanded node returns the existing children.
    pub fn expand(&mut self, id: NodeId) -> Vec<NodeId> {
        if let Some(children) = &self.nodes[id.0].children {
            return children.clone();
        }
        let parent_state = &self.nodes[id.0].state;
        let children_states: Vec<GameState> = parent_state
            .legal_moves()
            .into_iter()
            .map(|mv| parent_state.apply(mv, self.config))
            .collect();

        let first = self.nodes.len();
        let ids: Vec<NodeId> = (first..first + children_states.len()).map(NodeId).collect();
        self.nodes.extend(
            children_states
                .into_iter()
                .map(|state| Node { state, parent: Some(id), children: None }),
        );
        self.nodes[id.0].children = Some(ids.clone());
        ids
    }

    /// Forget the subtree under `id`, which must be the newest subtree in the
    /// arena (true right after it has been searched depth-first). The node
    /// keeps its own cached evaluation.
    pub fn collapse(&mut self, id: NodeId) {
        if let Some(children) = self.nodes[id.0].children.take() {
            if let Some(first) = children.first() {
                debug_assert!(first.0 > id.0);
                self.nodes.truncate(first.0);
            }
        }
    }

    /// Drop every node but the root and clear its children, keeping capacity.
    pub fn reset(&mut self, root: GameState) {
        self.nodes.clear();
        self.nodes.push(Node { state: root, parent: None, children: None });
    }

    /// States from `id` back to the root, leaf first.
    ///
    /// Snapshots are plain [`GameState`] values and hold no subtree.
    pub fn path_to_root(&self, id: NodeId) -> Vec<GameState> {
        let mut path = Vec::with_capacity(self.nodes[id.0].state.depth + 1);
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            path.push(self.nodes[node.0].state.clone());
            cursor = self.nodes[node.0].parent;
        }
        path
    }
}

impl Index<NodeId> for GameTree<'_> {
    type Output = GameState;
    fn index(&self, id: NodeId) -> &GameState { &self.nodes[id.0].state }
}

impl IndexMut<NodeId> for GameTree<'_> {
    fn index_mut(&mut self, id: NodeId) -> &mut GameState { &mut self.nodes[id.0].state }
}
