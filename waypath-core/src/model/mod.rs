//! Data model for road network routing
//!
//! Contains the travel modes, cost selection and the immutable road graph.

pub mod mode;
pub mod road;

pub use mode::{CostField, CostModel, Mode};
pub use road::{ModeCost, ModeCosts, RoadEdge, RoadGraph, RoadNode, TurnRestrictions};
