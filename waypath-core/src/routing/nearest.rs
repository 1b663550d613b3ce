//! Snapping coordinates to the closest node usable in a mode

use geo::Point;
use petgraph::graph::NodeIndex;

use crate::model::road::network::{great_circle, unit_vector};
use crate::{Mode, NodeId, RoadGraph};

/// Closest node to `point` with at least one outgoing edge usable in `mode`.
///
/// Returns the node identifier together with its great-circle distance in
/// meters, or `None` when no node qualifies (for example when no edge was
/// loaded for `mode`). Among equally distant nodes the smallest identifier
/// wins.
pub fn nearest_node(graph: &RoadGraph, point: &Point<f64>, mode: Mode) -> Option<(NodeId, f64)> {
    nearest_index(graph, point, mode).map(|index| {
        let node = &graph.graph[index];
        (node.id, great_circle(point, &node.geometry))
    })
}

pub(crate) fn nearest_index(graph: &RoadGraph, point: &Point<f64>, mode: Mode) -> Option<NodeIndex> {
    if !(point.x().is_finite() && point.y().is_finite()) {
        return None;
    }

    let query = unit_vector(point);
    let mut candidates = graph
        .spatial_index(mode)
        .nearest_neighbor_iter_with_distance_2(&query);
    let (first, best_distance) = candidates.next()?;

    let mut winner = first.data;
    for (candidate, distance) in candidates {
        if distance > best_distance {
            break;
        }
        if graph.graph[candidate.data].id < graph.graph[winner].id {
            winner = candidate.data;
        }
    }
    Some(winner)
}

/// Flat scan with the same contract as [`nearest_node`]
pub fn nearest_node_scan(
    graph: &RoadGraph,
    point: &Point<f64>,
    mode: Mode,
) -> Option<(NodeId, f64)> {
    graph
        .graph
        .node_indices()
        .filter(|&index| graph.is_routable(index, mode))
        .map(|index| {
            let node = &graph.graph[index];
            (node.id, great_circle(point, &node.geometry))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
}
