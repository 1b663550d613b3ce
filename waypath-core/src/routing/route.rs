use geo::{Coord, LineString, Point};
use geojson::{Feature, Geometry};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue, json};

use super::{SearchLimits, astar::astar_indices, nearest::nearest_index};
use crate::{CostModel, Error, NodeId, RoadGraph};

/// Shortest path between two graph nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    /// Visited nodes from start to goal, both included
    pub nodes: Vec<NodeId>,
    /// Accumulated cost under the search's cost model
    pub cost: f64,
    /// Accumulated physical length in meters
    pub length: f64,
}

impl RouteResult {
    pub fn start(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn goal(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Node coordinates along the route
    pub fn line_string(&self, graph: &RoadGraph) -> LineString<f64> {
        self.nodes
            .iter()
            .filter_map(|&id| graph.node_by_id(id))
            .map(|node| Coord::from(node.geometry))
            .collect()
    }

    /// Convert the route to a `GeoJSON` Feature, merging `properties` into
    /// the route summary
    pub fn to_feature(&self, graph: &RoadGraph, properties: Map<String, JsonValue>) -> Feature {
        let line = self.line_string(graph);

        let mut summary = Map::new();
        summary.insert("cost".to_string(), json!(self.cost));
        summary.insert("length_m".to_string(), json!(self.length));
        summary.insert("node_count".to_string(), json!(self.nodes.len()));
        summary.extend(properties);

        Feature {
            bbox: None,
            geometry: Some(Geometry::new((&line).into())),
            id: None,
            properties: Some(summary),
            foreign_members: None,
        }
    }
}

/// Snap both points to the network and route between them.
///
/// Returns `Ok(None)` when the goal is unreachable in the requested mode.
///
/// # Errors
///
/// [`Error::UnresolvableWaypoint`] with index 0 or 1 when a point cannot be
/// snapped, plus any error of [`astar`](super::astar).
pub fn route_between_points(
    graph: &RoadGraph,
    from: &Point<f64>,
    to: &Point<f64>,
    model: &CostModel,
    limits: &SearchLimits,
) -> Result<Option<RouteResult>, Error> {
    model.validate()?;
    let start = nearest_index(graph, from, model.mode)
        .ok_or(Error::UnresolvableWaypoint { index: 0 })?;
    let goal =
        nearest_index(graph, to, model.mode).ok_or(Error::UnresolvableWaypoint { index: 1 })?;
    astar_indices(graph, start, goal, model, limits)
}
