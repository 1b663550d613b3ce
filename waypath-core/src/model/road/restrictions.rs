//! Forbidden turns keyed by node triples

use hashbrown::HashSet;
use petgraph::graph::NodeIndex;

/// Set of forbidden `(previous, via, next)` node transitions
#[derive(Debug, Clone, Default)]
pub struct TurnRestrictions {
    forbidden: HashSet<(NodeIndex, NodeIndex, NodeIndex)>,
    via_nodes: HashSet<NodeIndex>,
}

impl TurnRestrictions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the transition was already forbidden
    pub fn insert(&mut self, previous: NodeIndex, via: NodeIndex, next: NodeIndex) -> bool {
        self.via_nodes.insert(via);
        self.forbidden.insert((previous, via, next))
    }

    pub fn forbids(&self, previous: NodeIndex, via: NodeIndex, next: NodeIndex) -> bool {
        self.forbidden.contains(&(previous, via, next))
    }

    /// Whether any restriction turns at `node`
    pub fn is_via(&self, node: NodeIndex) -> bool {
        self.via_nodes.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.forbidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forbidden.is_empty()
    }
}
