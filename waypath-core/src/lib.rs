//! Multi-modal road network routing engine.
//!
//! The crate loads a directed road graph with per-mode costs from a tabular
//! backing store, snaps coordinates to graph nodes, computes turn-restriction
//! aware shortest paths with A* and orders small waypoint sets exactly with
//! Held–Karp. A cosine similarity scorer for recommendation ranking lives
//! alongside the graph code.

pub mod algo;
pub mod cache;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use cache::GraphCache;
pub use error::Error;
pub use loading::{DataSourceConfig, GraphSource, create_road_graph};
pub use model::{CostField, CostModel, Mode, RoadGraph};

/// Identifier of a node in the backing store
pub type NodeId = i64;

/// Identifier of a raw edge row in the backing store
pub type RawEdgeId = i64;

/// Largest waypoint set accepted by the exact tour solver.
///
/// Held–Karp runs in `O(k² · 2^k)` time and `O(k · 2^k)` memory, which stays
/// interactive up to roughly fifteen stops.
pub const MAX_TOUR_WAYPOINTS: usize = 15;
