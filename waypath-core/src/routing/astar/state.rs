use std::cmp::Ordering;

use petgraph::graph::NodeIndex;

/// Search label of a node.
///
/// `previous` is only tracked at via nodes of turn restrictions, elsewhere
/// the label collapses to the plain node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(super) struct Label {
    pub(super) node: NodeIndex,
    pub(super) previous: Option<NodeIndex>,
}

#[derive(Copy, Clone, Debug)]
pub(super) struct State {
    /// Accumulated cost plus heuristic
    pub(super) estimate: f64,
    pub(super) heuristic: f64,
    pub(super) cost: f64,
    pub(super) label: Label,
}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by estimate (reversed from standard Rust BinaryHeap),
        // ties go to the smaller heuristic, then the smaller label
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.heuristic.total_cmp(&self.heuristic))
            .then_with(|| other.label.cmp(&self.label))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}
