//! A* over the road graph with per-mode costs and turn restrictions

mod state;

use std::collections::BinaryHeap;

use hashbrown::{HashMap, HashSet, hash_map::Entry};
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use self::state::{Label, State};
use super::{RouteResult, SearchLimits};
use crate::{CostModel, Error, NodeId, RoadGraph};

/// Frontier pops between two deadline/cancellation checks
const LIMIT_CHECK_INTERVAL: usize = 256;

/// Shortest path from `start` to `goal` under `model`.
///
/// Returns `Ok(None)` when the goal is not reachable in the requested mode,
/// which is an ordinary outcome rather than an error. Edges without a cost
/// entry for the mode are skipped and, when the model enforces them, no
/// forbidden `(previous, via, next)` turn is ever taken.
///
/// # Errors
///
/// [`Error::UnknownNode`] for identifiers missing from the graph,
/// [`Error::InvalidInput`] for an invalid cost scalar and
/// [`Error::DeadlineExceeded`] / [`Error::Cancelled`] when `limits` fire.
pub fn astar(
    graph: &RoadGraph,
    start: NodeId,
    goal: NodeId,
    model: &CostModel,
    limits: &SearchLimits,
) -> Result<Option<RouteResult>, Error> {
    model.validate()?;
    let start = graph.node_index(start).ok_or(Error::UnknownNode(start))?;
    let goal = graph.node_index(goal).ok_or(Error::UnknownNode(goal))?;
    astar_indices(graph, start, goal, model, limits)
}

pub(crate) fn astar_indices(
    graph: &RoadGraph,
    start: NodeIndex,
    goal: NodeIndex,
    model: &CostModel,
    limits: &SearchLimits,
) -> Result<Option<RouteResult>, Error> {
    let restrictions = graph.restrictions(model.mode);
    let enforce_restrictions = model.turn_restrictions && !restrictions.is_empty();
    let heuristic_scale = graph.heuristic_scale(model.mode, model.field);

    // Straight-line distance times the lowest cost per meter of the mode
    // never overestimates, see `RoadGraph::heuristic_scale`.
    let heuristic = |node: NodeIndex| {
        if heuristic_scale > 0.0 {
            model.scale(graph.great_circle(node, goal) * heuristic_scale)
        } else {
            0.0
        }
    };
    let label_of = |node: NodeIndex, previous: Option<NodeIndex>| Label {
        node,
        previous: previous.filter(|_| enforce_restrictions && restrictions.is_via(node)),
    };

    let mut costs: HashMap<Label, f64> = HashMap::new();
    let mut parents: HashMap<Label, Label> = HashMap::new();
    let mut settled: HashSet<Label> = HashSet::new();
    let mut frontier = BinaryHeap::new();

    let start_label = label_of(start, None);
    let start_heuristic = heuristic(start);
    costs.insert(start_label, 0.0);
    frontier.push(State {
        estimate: start_heuristic,
        heuristic: start_heuristic,
        cost: 0.0,
        label: start_label,
    });

    let mut pops = 0usize;
    while let Some(State { cost, label, .. }) = frontier.pop() {
        pops += 1;
        // First pop included, so a search cancelled upfront never runs
        if pops % LIMIT_CHECK_INTERVAL == 1 {
            limits.check()?;
        }

        if label.node == goal {
            return Ok(Some(reconstruct(graph, &parents, label, cost)));
        }

        // Skip labels already expanded with a better cost
        if !settled.insert(label) {
            continue;
        }

        for edge in graph.edges(label.node) {
            let next = edge.target();
            let Some(step) = model.edge_cost(edge.weight()) else {
                continue;
            };
            if label
                .previous
                .is_some_and(|previous| restrictions.forbids(previous, label.node, next))
            {
                continue;
            }

            let next_label = label_of(next, Some(label.node));
            if settled.contains(&next_label) {
                continue;
            }
            let next_cost = cost + step;

            let improved = match costs.entry(next_label) {
                Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    true
                }
                Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        true
                    } else {
                        false
                    }
                }
            };
            if improved {
                let next_heuristic = heuristic(next);
                parents.insert(next_label, label);
                frontier.push(State {
                    estimate: next_cost + next_heuristic,
                    heuristic: next_heuristic,
                    cost: next_cost,
                    label: next_label,
                });
            }
        }
    }

    Ok(None)
}

fn reconstruct(
    graph: &RoadGraph,
    parents: &HashMap<Label, Label>,
    goal: Label,
    cost: f64,
) -> RouteResult {
    let mut path = vec![goal.node];
    let mut current = goal;
    while let Some(&parent) = parents.get(&current) {
        path.push(parent.node);
        current = parent;
    }
    path.reverse();

    let length = path
        .windows(2)
        .filter_map(|pair| graph.graph.find_edge(pair[0], pair[1]))
        .map(|edge| graph.graph[edge].length)
        .sum();

    RouteResult {
        nodes: path.iter().map(|&node| graph.graph[node].id).collect(),
        cost,
        length,
    }
}
