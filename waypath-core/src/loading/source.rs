use serde::Deserialize;

use crate::{Error, Mode, NodeId, RawEdgeId};

/// Raw node row
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

/// Raw edge row of a single mode, one physical segment
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EdgeRecord {
    pub id: RawEdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub cost: f64,
    /// Absent or non-finite when the segment is one-way
    pub reverse_cost: Option<f64>,
    pub length: f64,
}

/// Raw turn restriction row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TurnRestrictionRecord {
    pub from_edge: RawEdgeId,
    pub via_node: NodeId,
    pub to_edge: RawEdgeId,
}

/// Read-only access to the three relations the road graph is built from.
///
/// Any error returned here aborts loading, a partially read graph is never
/// exposed.
pub trait GraphSource: Send + Sync {
    fn load_nodes(&self) -> Result<Vec<NodeRecord>, Error>;

    fn load_edges(&self, mode: Mode) -> Result<Vec<EdgeRecord>, Error>;

    fn load_turn_restrictions(&self) -> Result<Vec<TurnRestrictionRecord>, Error>;
}

impl<T: GraphSource + ?Sized> GraphSource for Box<T> {
    fn load_nodes(&self) -> Result<Vec<NodeRecord>, Error> {
        (**self).load_nodes()
    }

    fn load_edges(&self, mode: Mode) -> Result<Vec<EdgeRecord>, Error> {
        (**self).load_edges(mode)
    }

    fn load_turn_restrictions(&self) -> Result<Vec<TurnRestrictionRecord>, Error> {
        (**self).load_turn_restrictions()
    }
}
