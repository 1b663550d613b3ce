use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Road graph is not loaded yet")]
    GraphNotLoaded,
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Too many waypoints: got {count}, at most {max} are supported")]
    TooManyWaypoints { count: usize, max: usize },
    #[error("Waypoint {index} could not be snapped to the road network")]
    UnresolvableWaypoint { index: usize },
    #[error("No feasible tour connects all waypoints")]
    InfeasibleTour,
    #[error("Search deadline exceeded")]
    DeadlineExceeded,
    #[error("Search cancelled")]
    Cancelled,
}
