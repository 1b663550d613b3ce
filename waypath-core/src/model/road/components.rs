//! Road network components - nodes, edges and per-mode costs

use geo::Point;
use serde::Serialize;

use crate::{Mode, NodeId};

/// Road graph node
#[derive(Debug, Clone, PartialEq)]
pub struct RoadNode {
    /// Backing store identifier of the node
    pub id: NodeId,
    /// Node coordinates, x is longitude and y is latitude
    pub geometry: Point<f64>,
}

/// Costs of a single mode on a directed edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModeCost {
    pub forward: f64,
    /// Cost of the opposite direction when the raw segment allows it
    pub reverse: Option<f64>,
}

impl ModeCost {
    /// Entry of the mirrored edge, forward and reverse swapped
    pub(crate) fn mirrored(self) -> Option<Self> {
        self.reverse.map(|reverse| ModeCost {
            forward: reverse,
            reverse: Some(self.forward),
        })
    }
}

/// Per-mode cost table of an edge, `None` means impassable for that mode
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModeCosts([Option<ModeCost>; 3]);

impl ModeCosts {
    pub fn get(&self, mode: Mode) -> Option<&ModeCost> {
        self.0[mode.index()].as_ref()
    }

    pub fn set(&mut self, mode: Mode, cost: ModeCost) {
        self.0[mode.index()] = Some(cost);
    }

    pub fn allows(&self, mode: Mode) -> bool {
        self.0[mode.index()].is_some()
    }

    pub fn modes(&self) -> impl Iterator<Item = Mode> + '_ {
        Mode::ALL.into_iter().filter(|mode| self.allows(*mode))
    }
}

/// Directed road graph edge, unique per (source, target) pair
#[derive(Debug, Clone, PartialEq)]
pub struct RoadEdge {
    /// Physical length in meters
    pub length: f64,
    pub costs: ModeCosts,
}

impl RoadEdge {
    pub fn new(length: f64) -> Self {
        Self {
            length,
            costs: ModeCosts::default(),
        }
    }

    /// Forward cost of this edge for `mode` if it is passable
    pub fn cost(&self, mode: Mode) -> Option<f64> {
        self.costs.get(mode).map(|cost| cost.forward)
    }
}
