//! Shortest paths, nearest-node lookups and exact multi-stop tours

pub mod astar;
pub mod dijkstra;
mod limits;
pub mod nearest;
mod route;
pub mod tour;

pub use astar::astar;
pub use dijkstra::dijkstra_costs;
pub use limits::{CancelToken, SearchLimits};
pub use nearest::{nearest_node, nearest_node_scan};
pub use route::{RouteResult, route_between_points};
pub use tour::{Tour, TourKind, held_karp, solve_tour};
