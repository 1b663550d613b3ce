use geo::Point;
use hashbrown::{HashMap, hash_map::Entry};
use log::{debug, info, warn};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

use super::source::{EdgeRecord, GraphSource, NodeRecord, TurnRestrictionRecord};
use crate::model::{ModeCost, RoadEdge, RoadGraph, RoadNode, TurnRestrictions};
use crate::{Error, Mode, NodeId, RawEdgeId};

/// Loads every relation of `source` into a new road graph
///
/// # Errors
///
/// Returns an error if any relation cannot be read or contains rows that
/// would leave the graph inconsistent. No partial graph is returned.
pub fn create_road_graph<S>(source: &S) -> Result<RoadGraph, Error>
where
    S: GraphSource + ?Sized,
{
    let mut builder = GraphBuilder::new();
    builder.load(source)?;
    let graph = builder.build();

    info!(
        "Road graph created: {} nodes, {} edges, {} forbidden turns",
        graph.node_count(),
        graph.edge_count(),
        graph.restriction_count()
    );

    // Row deserialization leaves a lot of freed memory at the top of the
    // heap. Hand it back to the system now that the graph is built.
    //
    // # Safety
    //
    // This call is safe to use on linux with glibc implementation
    // which is checked by the cfg attribute in compile time.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    unsafe {
        if libc::malloc_trim(0) == 0 {
            debug!("No heap memory released after loading");
        } else {
            debug!("Successfully trimmed unused heap memory");
        }
    }
    Ok(graph)
}

/// Incremental road graph construction.
///
/// Edges are merged per `(source, target)` pair through a keyed index, costs
/// of different modes on the same pair land on one [`RoadEdge`]. Every phase
/// is guarded, so loading twice from the same source changes nothing.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: DiGraph<RoadNode, RoadEdge>,
    node_lookup: HashMap<NodeId, NodeIndex>,
    edge_lookup: HashMap<(NodeIndex, NodeIndex), EdgeIndex>,
    /// Directed pairs materialised by each raw edge row. Every mode has its
    /// own edge relation, so raw ids are only unique within a mode.
    raw_edges: HashMap<(Mode, RawEdgeId), Vec<(NodeIndex, NodeIndex)>>,
    loaded_modes: [bool; 3],
    restrictions_loaded: bool,
    restrictions: [TurnRestrictions; 3],
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, id: NodeId) -> Option<&RoadNode> {
        self.node_lookup
            .get(&id)
            .and_then(|&index| self.graph.node_weight(index))
    }

    pub fn edge(&self, source: NodeId, target: NodeId) -> Option<&RoadEdge> {
        let source = *self.node_lookup.get(&source)?;
        let target = *self.node_lookup.get(&target)?;
        self.edge_lookup
            .get(&(source, target))
            .and_then(|&edge| self.graph.edge_weight(edge))
    }

    /// Run all loading phases: nodes, then edges of every mode, then
    /// turn restrictions
    pub fn load<S>(&mut self, source: &S) -> Result<(), Error>
    where
        S: GraphSource + ?Sized,
    {
        self.load_nodes(source)?;
        for mode in Mode::ALL {
            self.load_edges(source, mode)?;
        }
        self.load_turn_restrictions(source)?;
        Ok(())
    }

    /// Load the node table, skipped when nodes are already present.
    ///
    /// Returns the number of nodes added.
    pub fn load_nodes<S>(&mut self, source: &S) -> Result<usize, Error>
    where
        S: GraphSource + ?Sized,
    {
        if self.graph.node_count() > 0 {
            debug!("Nodes already loaded, skipping");
            return Ok(0);
        }

        let records = source.load_nodes()?;
        self.graph.reserve_nodes(records.len());
        self.node_lookup.reserve(records.len());
        for record in &records {
            self.add_node(record)?;
        }
        info!("Loaded {} nodes", records.len());
        Ok(records.len())
    }

    pub fn add_node(&mut self, record: &NodeRecord) -> Result<NodeIndex, Error> {
        if !(record.lat.is_finite() && record.lon.is_finite())
            || record.lat.abs() > 90.0
            || record.lon.abs() > 180.0
        {
            return Err(Error::InvalidData(format!(
                "node {} has invalid coordinates ({}, {})",
                record.id, record.lat, record.lon
            )));
        }

        match self.node_lookup.entry(record.id) {
            Entry::Occupied(_) => Err(Error::InvalidData(format!(
                "duplicate node id {}",
                record.id
            ))),
            Entry::Vacant(entry) => {
                let index = self.graph.add_node(RoadNode {
                    id: record.id,
                    geometry: Point::new(record.lon, record.lat),
                });
                entry.insert(index);
                Ok(index)
            }
        }
    }

    /// Load the edge rows of `mode`, skipped when that mode is already loaded.
    ///
    /// Returns the number of rows processed.
    pub fn load_edges<S>(&mut self, source: &S, mode: Mode) -> Result<usize, Error>
    where
        S: GraphSource + ?Sized,
    {
        if self.loaded_modes[mode.index()] {
            debug!("Edges for {mode} already loaded, skipping");
            return Ok(0);
        }

        let records = source.load_edges(mode)?;
        for record in &records {
            self.add_edge(mode, record)?;
        }
        self.loaded_modes[mode.index()] = true;
        info!("Loaded {} {mode} edge rows", records.len());
        Ok(records.len())
    }

    /// Merge one raw segment into the graph.
    ///
    /// A negative or non-finite forward cost marks the segment as not
    /// traversable forward. A finite, non-negative reverse cost additionally
    /// materialises the mirrored edge with forward and reverse swapped.
    pub fn add_edge(&mut self, mode: Mode, record: &EdgeRecord) -> Result<(), Error> {
        let source = self.resolve_edge_node(record, record.source)?;
        let target = self.resolve_edge_node(record, record.target)?;

        if !record.length.is_finite() || record.length < 0.0 {
            return Err(Error::InvalidData(format!(
                "edge {} has invalid length {}",
                record.id, record.length
            )));
        }

        let forward = Some(record.cost).filter(|cost| is_traversable(*cost));
        let reverse = record.reverse_cost.filter(|cost| is_traversable(*cost));

        if let Some(cost) = forward {
            self.upsert_edge(
                record.id,
                (source, target),
                record.length,
                mode,
                ModeCost {
                    forward: cost,
                    reverse,
                },
            );
        }
        if let Some(cost) = reverse {
            self.upsert_edge(
                record.id,
                (target, source),
                record.length,
                mode,
                ModeCost {
                    forward: cost,
                    reverse: forward,
                },
            );
        }
        if forward.is_none() && reverse.is_none() {
            debug!("Edge {} is impassable for {mode}", record.id);
        }
        Ok(())
    }

    fn resolve_edge_node(&self, record: &EdgeRecord, node: NodeId) -> Result<NodeIndex, Error> {
        self.node_lookup.get(&node).copied().ok_or_else(|| {
            Error::InvalidData(format!(
                "edge {} references unknown node {node}",
                record.id
            ))
        })
    }

    fn upsert_edge(
        &mut self,
        raw_id: RawEdgeId,
        key: (NodeIndex, NodeIndex),
        length: f64,
        mode: Mode,
        cost: ModeCost,
    ) {
        let edge = match self.edge_lookup.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => *entry.insert(self.graph.add_edge(
                key.0,
                key.1,
                RoadEdge::new(length),
            )),
        };
        let weight = &mut self.graph[edge];
        weight.length = length;
        weight.costs.set(mode, cost);

        let pairs = self.raw_edges.entry((mode, raw_id)).or_default();
        if !pairs.contains(&key) {
            pairs.push(key);
        }
    }

    /// Load and resolve turn restrictions, skipped when already loaded.
    ///
    /// Must run after the edge phases, restrictions are resolved against the
    /// pairs each raw edge produced. Returns the number of forbidden
    /// transitions added.
    pub fn load_turn_restrictions<S>(&mut self, source: &S) -> Result<usize, Error>
    where
        S: GraphSource + ?Sized,
    {
        if self.restrictions_loaded {
            debug!("Turn restrictions already loaded, skipping");
            return Ok(0);
        }

        let records = source.load_turn_restrictions()?;
        let mut added = 0;
        let mut unresolved = 0;
        for record in &records {
            match self.add_turn_restriction(record) {
                0 => unresolved += 1,
                count => added += count,
            }
        }
        self.restrictions_loaded = true;

        if unresolved > 0 {
            warn!(
                "{unresolved} of {} turn restrictions do not match any loaded edge pair and were ignored",
                records.len()
            );
        }
        info!("Loaded {added} forbidden turns");
        Ok(added)
    }

    /// Expand a raw restriction into node triples, separately per mode.
    ///
    /// Within a mode, every pair `(a, via)` of the incoming raw edge combined
    /// with every pair `(via, c)` of the outgoing raw edge forbids
    /// `a -> via -> c`. Returns the number of triples inserted over all
    /// modes.
    pub fn add_turn_restriction(&mut self, record: &TurnRestrictionRecord) -> usize {
        let Some(&via) = self.node_lookup.get(&record.via_node) else {
            debug!("Turn restriction {record:?} references unknown via node");
            return 0;
        };

        let mut added = 0;
        for mode in Mode::ALL {
            let (Some(incoming), Some(outgoing)) = (
                self.raw_edges.get(&(mode, record.from_edge)),
                self.raw_edges.get(&(mode, record.to_edge)),
            ) else {
                continue;
            };
            let restrictions = &mut self.restrictions[mode.index()];
            for &(previous, _) in incoming.iter().filter(|(_, head)| *head == via) {
                for &(_, next) in outgoing.iter().filter(|(tail, _)| *tail == via) {
                    restrictions.insert(previous, via, next);
                    added += 1;
                }
            }
        }
        if added == 0 {
            debug!("Turn restriction {record:?} matches no edges meeting at the via node");
        }
        added
    }

    pub fn build(self) -> RoadGraph {
        RoadGraph::new(self.graph, self.node_lookup, self.restrictions)
    }
}

fn is_traversable(cost: f64) -> bool {
    cost.is_finite() && cost >= 0.0
}
