pub use crate::MAX_TOUR_WAYPOINTS;

// Graph model and loading
pub use crate::cache::GraphCache;
pub use crate::loading::{
    CsvSource, DataSourceConfig, GraphBuilder, GraphSource, InMemorySource, create_road_graph,
};
pub use crate::model::{CostField, CostModel, Mode, RoadGraph};

// Queries
pub use crate::algo::similarity::{cosine_similarity, rank_by_similarity, term_frequencies};
pub use crate::routing::{
    CancelToken, RouteResult, SearchLimits, Tour, TourKind, astar, nearest_node,
    route_between_points, solve_tour,
};

// Identifiers
pub use crate::NodeId;
pub use crate::RawEdgeId;
