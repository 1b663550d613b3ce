//! Immutable road graph snapshot with its spatial and heuristic indices

use std::fmt;

use geo::{Distance, Haversine, Point};
use hashbrown::HashMap;
use log::debug;
use petgraph::{
    Directed,
    graph::{DiGraph, Edges, NodeIndex},
    visit::EdgeRef,
};
use rstar::{RTree, primitives::GeomWithData};

use super::{RoadEdge, RoadNode, TurnRestrictions};
use crate::{CostField, Mode, NodeId};

/// Node position on the unit sphere, tagged with its graph index.
///
/// Chord length between unit vectors grows monotonically with great-circle
/// distance, so a Euclidean nearest neighbour query is a great-circle one.
pub type IndexedNode = GeomWithData<[f64; 3], NodeIndex>;

/// Road network for all modes.
///
/// Built once by the loader and read-only afterwards, so it can be shared
/// between threads without locking.
pub struct RoadGraph {
    pub(crate) graph: DiGraph<RoadNode, RoadEdge>,
    node_lookup: HashMap<NodeId, NodeIndex>,
    /// Forbidden turns resolved against each mode's own edges
    restrictions: [TurnRestrictions; 3],
    spatial: [RTree<IndexedNode>; 3],
    /// Lowest field value per meter of great-circle distance, by mode and field
    heuristic_scales: [[f64; 2]; 3],
}

impl fmt::Debug for RoadGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoadGraph")
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .field("restrictions", &self.restriction_count())
            .finish_non_exhaustive()
    }
}

impl RoadGraph {
    pub(crate) fn new(
        graph: DiGraph<RoadNode, RoadEdge>,
        node_lookup: HashMap<NodeId, NodeIndex>,
        restrictions: [TurnRestrictions; 3],
    ) -> Self {
        let spatial = Mode::ALL.map(|mode| build_spatial_index(&graph, mode));
        let heuristic_scales = compute_heuristic_scales(&graph);

        for mode in Mode::ALL {
            debug!(
                "{mode}: {} routable nodes, heuristic scales {:?}",
                spatial[mode.index()].size(),
                heuristic_scales[mode.index()]
            );
        }

        Self {
            graph,
            node_lookup,
            restrictions,
            spatial,
            heuristic_scales,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Forbidden turns of `mode`
    pub fn restrictions(&self, mode: Mode) -> &TurnRestrictions {
        &self.restrictions[mode.index()]
    }

    /// Forbidden turns over all modes
    pub fn restriction_count(&self) -> usize {
        self.restrictions.iter().map(TurnRestrictions::len).sum()
    }

    pub fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_lookup.get(&id).copied()
    }

    pub fn node(&self, index: NodeIndex) -> Option<&RoadNode> {
        self.graph.node_weight(index)
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&RoadNode> {
        self.node_index(id).and_then(|index| self.node(index))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RoadNode> {
        self.graph.node_weights()
    }

    /// Outgoing edges of `node`
    pub fn edges(&self, node: NodeIndex) -> Edges<'_, RoadEdge, Directed> {
        self.graph.edges(node)
    }

    /// The merged edge from `source` to `target`, if any
    pub fn edge_between(&self, source: NodeId, target: NodeId) -> Option<&RoadEdge> {
        let source = self.node_index(source)?;
        let target = self.node_index(target)?;
        self.graph
            .find_edge(source, target)
            .and_then(|edge| self.graph.edge_weight(edge))
    }

    /// Whether `node` has an outgoing edge passable in `mode`
    pub fn is_routable(&self, node: NodeIndex, mode: Mode) -> bool {
        self.graph
            .edges(node)
            .any(|edge| edge.weight().costs.allows(mode))
    }

    /// Whether any edge at all was loaded for `mode`
    pub fn has_mode(&self, mode: Mode) -> bool {
        self.spatial[mode.index()].size() > 0
    }

    pub(crate) fn spatial_index(&self, mode: Mode) -> &RTree<IndexedNode> {
        &self.spatial[mode.index()]
    }

    pub(crate) fn heuristic_scale(&self, mode: Mode, field: CostField) -> f64 {
        self.heuristic_scales[mode.index()][field.index()]
    }

    pub(crate) fn great_circle(&self, a: NodeIndex, b: NodeIndex) -> f64 {
        great_circle(&self.graph[a].geometry, &self.graph[b].geometry)
    }
}

/// Great-circle distance in meters
pub(crate) fn great_circle(a: &Point<f64>, b: &Point<f64>) -> f64 {
    Haversine.distance(*a, *b)
}

/// Position of a lon/lat point on the unit sphere
pub(crate) fn unit_vector(point: &Point<f64>) -> [f64; 3] {
    let lat = point.y().to_radians();
    let lon = point.x().to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

fn build_spatial_index(graph: &DiGraph<RoadNode, RoadEdge>, mode: Mode) -> RTree<IndexedNode> {
    let entries = graph
        .node_indices()
        .filter(|&node| {
            graph
                .edges(node)
                .any(|edge| edge.weight().costs.allows(mode))
        })
        .map(|node| IndexedNode::new(unit_vector(&graph[node].geometry), node))
        .collect();
    RTree::bulk_load(entries)
}

fn compute_heuristic_scales(graph: &DiGraph<RoadNode, RoadEdge>) -> [[f64; 2]; 3] {
    let mut scales = [[f64::INFINITY; 2]; 3];

    for edge in graph.edge_references() {
        let span = great_circle(
            &graph[edge.source()].geometry,
            &graph[edge.target()].geometry,
        );
        // Coincident endpoints add nothing to the straight-line bound
        if span <= 0.0 {
            continue;
        }
        let weight = edge.weight();
        for mode in weight.costs.modes() {
            let Some(cost) = weight.cost(mode) else {
                continue;
            };
            let by_mode = &mut scales[mode.index()];
            by_mode[CostField::Cost.index()] = by_mode[CostField::Cost.index()].min(cost / span);
            by_mode[CostField::Length.index()] =
                by_mode[CostField::Length.index()].min(weight.length / span);
        }
    }

    // No constraining edge means no usable lower bound
    for by_mode in &mut scales {
        for scale in by_mode.iter_mut() {
            if !scale.is_finite() {
                *scale = 0.0;
            }
        }
    }
    scales
}
