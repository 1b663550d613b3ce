//! Exact multi-stop ordering with Held–Karp over pairwise A* costs

use geo::Point;
use itertools::iproduct;
use log::debug;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{RouteResult, SearchLimits, astar::astar_indices, nearest::nearest_index};
use crate::{CostModel, Error, MAX_TOUR_WAYPOINTS, RoadGraph};

/// Whether the tour returns to its first waypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TourKind {
    /// Hamiltonian path starting at waypoint 0, ending anywhere
    #[default]
    Open,
    /// Cycle starting and ending at waypoint 0
    Closed,
}

/// Optimal visiting order of a waypoint set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tour {
    /// Waypoint indices in visiting order, always starting with 0
    pub order: Vec<usize>,
    pub total_cost: f64,
    pub kind: TourKind,
    /// Routes between consecutive waypoints, including the return leg of a
    /// closed tour
    pub legs: Vec<RouteResult>,
}

/// Visit every point with the lowest total cost.
///
/// Each point is snapped to its nearest node usable in `model.mode`, all
/// `k·(k-1)` pairwise routes are computed in parallel and Held–Karp picks the
/// order. Runs in `O(k² · 2^k)` time, so at most [`MAX_TOUR_WAYPOINTS`]
/// points are accepted.
///
/// # Errors
///
/// - [`Error::InvalidInput`] for an empty point list or invalid scalar
/// - [`Error::TooManyWaypoints`] above [`MAX_TOUR_WAYPOINTS`]
/// - [`Error::UnresolvableWaypoint`] when a point cannot be snapped
/// - [`Error::InfeasibleTour`] when unreachable pairs leave no complete tour
/// - [`Error::DeadlineExceeded`] / [`Error::Cancelled`] from `limits`
pub fn solve_tour(
    graph: &RoadGraph,
    points: &[Point<f64>],
    model: &CostModel,
    kind: TourKind,
    limits: &SearchLimits,
) -> Result<Tour, Error> {
    model.validate()?;
    if points.is_empty() {
        return Err(Error::InvalidInput("a tour needs at least one waypoint".to_string()));
    }
    if points.len() > MAX_TOUR_WAYPOINTS {
        return Err(Error::TooManyWaypoints {
            count: points.len(),
            max: MAX_TOUR_WAYPOINTS,
        });
    }

    let nodes = points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            nearest_index(graph, point, model.mode).ok_or(Error::UnresolvableWaypoint { index })
        })
        .collect::<Result<Vec<NodeIndex>, _>>()?;

    let mut routes = pairwise_routes(graph, &nodes, model, limits)?;
    let costs: Vec<Vec<f64>> = routes
        .iter()
        .enumerate()
        .map(|(from, row)| {
            row.iter()
                .enumerate()
                .map(|(to, route)| match route {
                    _ if from == to => 0.0,
                    Some(route) => route.cost,
                    None => f64::INFINITY,
                })
                .collect()
        })
        .collect();

    let (order, total_cost) = held_karp(&costs, kind).ok_or(Error::InfeasibleTour)?;
    debug!("Tour over {} waypoints costs {total_cost}", points.len());

    let mut stops = order.clone();
    if kind == TourKind::Closed && order.len() > 1 {
        stops.push(order[0]);
    }
    let legs = stops
        .windows(2)
        .map(|pair| routes[pair[0]][pair[1]].take().ok_or(Error::InfeasibleTour))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Tour {
        order,
        total_cost,
        kind,
        legs,
    })
}

/// Routes between all ordered pairs, `None` on the diagonal and for
/// unreachable pairs
fn pairwise_routes(
    graph: &RoadGraph,
    nodes: &[NodeIndex],
    model: &CostModel,
    limits: &SearchLimits,
) -> Result<Vec<Vec<Option<RouteResult>>>, Error> {
    let count = nodes.len();
    let pairs: Vec<(usize, usize)> = iproduct!(0..count, 0..count)
        .filter(|(from, to)| from != to)
        .collect();

    let results = pairs
        .par_iter()
        .map(|&(from, to)| astar_indices(graph, nodes[from], nodes[to], model, limits))
        .collect::<Result<Vec<_>, _>>()?;

    let mut matrix = vec![vec![None; count]; count];
    for ((from, to), route) in pairs.into_iter().zip(results) {
        matrix[from][to] = route;
    }
    Ok(matrix)
}

/// Held–Karp over a dense cost matrix with waypoint 0 as the fixed start.
///
/// `costs[i][j]` is the cost from `i` to `j`, `f64::INFINITY` for missing
/// connections. Returns the visiting order and its total cost, or `None` when
/// no finite tour exists. Among equal-cost tours the one found first in
/// subset order is kept.
///
/// The table grows as `k · 2^k`, so matrices with more than
/// [`MAX_TOUR_WAYPOINTS`] rows, and non-square matrices, are rejected with
/// `None` as well.
pub fn held_karp(costs: &[Vec<f64>], kind: TourKind) -> Option<(Vec<usize>, f64)> {
    let count = costs.len();
    if count == 0 || count > MAX_TOUR_WAYPOINTS {
        return None;
    }
    if costs.iter().any(|row| row.len() != count) {
        return None;
    }
    if count == 1 {
        return Some((vec![0], 0.0));
    }

    // Subsets range over waypoints 1..count, bit `j` stands for waypoint `j + 1`
    let stops = count - 1;
    let full = (1usize << stops) - 1;
    let slot = |subset: usize, last: usize| subset * stops + last;

    let mut best = vec![f64::INFINITY; (full + 1) * stops];
    let mut parent = vec![usize::MAX; (full + 1) * stops];

    for last in 0..stops {
        best[slot(1 << last, last)] = costs[0][last + 1];
    }

    for subset in 1..=full {
        for last in (0..stops).filter(|last| subset & (1 << last) != 0) {
            let current = best[slot(subset, last)];
            if !current.is_finite() {
                continue;
            }
            for next in (0..stops).filter(|next| subset & (1 << next) == 0) {
                let candidate = current + costs[last + 1][next + 1];
                let target = slot(subset | (1 << next), next);
                if candidate < best[target] {
                    best[target] = candidate;
                    parent[target] = last;
                }
            }
        }
    }

    let (mut last, total) = (0..stops)
        .map(|last| {
            let closing = match kind {
                TourKind::Open => 0.0,
                TourKind::Closed => costs[last + 1][0],
            };
            (last, best[slot(full, last)] + closing)
        })
        .filter(|(_, total)| total.is_finite())
        .fold(None, |acc: Option<(usize, f64)>, item| match acc {
            Some(current) if current.1 <= item.1 => Some(current),
            _ => Some(item),
        })?;

    let mut order = Vec::with_capacity(count);
    let mut subset = full;
    loop {
        order.push(last + 1);
        let previous = parent[slot(subset, last)];
        subset &= !(1 << last);
        if subset == 0 {
            break;
        }
        last = previous;
    }
    order.push(0);
    order.reverse();

    Some((order, total))
}
