//! Quest graph - deduplicated nodes, directed edges, adjacency.
//!
//! Nodes and edges are built once per construction pass from immutable input
//! and never mutated afterwards; the exploration subsystems only read
//! topology. Transient per-node state (positions, statuses) lives in the
//! layout and progress subsystems, keyed by node index.

mod builder;

pub use builder::build_graph;

use std::collections::HashMap;

use questtree_domain::{Edge, QuestNode};

/// Immutable quest dependency graph.
#[derive(Debug, Clone)]
pub struct QuestGraph {
    nodes: Vec<QuestNode>,
    index: HashMap<String, usize>,
    edges: Vec<(usize, usize)>,
    forward: Vec<Vec<usize>>,
    reverse: Vec<Vec<usize>>,
}

impl QuestGraph {
    pub(crate) fn new(nodes: Vec<QuestNode>, edge_pairs: Vec<(usize, usize)>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        let mut forward = vec![Vec::new(); nodes.len()];
        let mut reverse = vec![Vec::new(); nodes.len()];
        for &(source, target) in &edge_pairs {
            forward[source].push(target);
            reverse[target].push(source);
        }
        Self {
            nodes,
            index,
            edges: edge_pairs,
            forward,
            reverse,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[QuestNode] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> &QuestNode {
        &self.nodes[idx]
    }

    /// Node index for a quest id, if the id resolves.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&QuestNode> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }

    /// Deduplicated edge list as (source index, target index) pairs.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Edge list in the id-pair serialization shape.
    pub fn edge_ids(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges
            .iter()
            .map(|&(s, t)| Edge::new(self.nodes[s].id.clone(), self.nodes[t].id.clone()))
    }

    /// Direct successors ("leads to") of a node.
    pub fn successors(&self, idx: usize) -> &[usize] {
        &self.forward[idx]
    }

    /// Direct predecessors ("previous") of a node.
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        &self.reverse[idx]
    }

    /// Whether a node is a depth-0 root with at least one outgoing edge.
    ///
    /// These roots get their horizontal position locked by the layout.
    pub fn is_lockable_root(&self, idx: usize) -> bool {
        self.nodes[idx].depth == 0 && !self.forward[idx].is_empty()
    }
}
