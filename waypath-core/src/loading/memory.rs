use hashbrown::HashMap;

use super::source::{EdgeRecord, GraphSource, NodeRecord, TurnRestrictionRecord};
use crate::{Error, Mode};

/// Graph source over rows already held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub nodes: Vec<NodeRecord>,
    pub edges: HashMap<Mode, Vec<EdgeRecord>>,
    pub turn_restrictions: Vec<TurnRestrictionRecord>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_node(mut self, id: i64, lat: f64, lon: f64) -> Self {
        self.nodes.push(NodeRecord { id, lat, lon });
        self
    }

    #[must_use]
    pub fn with_edge(mut self, mode: Mode, edge: EdgeRecord) -> Self {
        self.edges.entry(mode).or_default().push(edge);
        self
    }

    #[must_use]
    pub fn with_turn_restriction(mut self, from_edge: i64, via_node: i64, to_edge: i64) -> Self {
        self.turn_restrictions.push(TurnRestrictionRecord {
            from_edge,
            via_node,
            to_edge,
        });
        self
    }
}

impl GraphSource for InMemorySource {
    fn load_nodes(&self) -> Result<Vec<NodeRecord>, Error> {
        Ok(self.nodes.clone())
    }

    fn load_edges(&self, mode: Mode) -> Result<Vec<EdgeRecord>, Error> {
        Ok(self.edges.get(&mode).cloned().unwrap_or_default())
    }

    fn load_turn_restrictions(&self) -> Result<Vec<TurnRestrictionRecord>, Error> {
        Ok(self.turn_restrictions.clone())
    }
}
