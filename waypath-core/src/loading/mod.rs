//! This module is responsible for reading nodes, per-mode edges and turn
//! restrictions from a backing store and building the road graph.

mod builder;
mod config;
pub mod csv_source;
mod memory;
mod source;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use csv_source::CsvSource;
pub use builder::{GraphBuilder, create_road_graph};
pub use config::DataSourceConfig;
pub use memory::InMemorySource;
pub use source::{EdgeRecord, GraphSource, NodeRecord, TurnRestrictionRecord};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSource;
