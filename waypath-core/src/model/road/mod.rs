//! Road network model

pub mod components;
pub mod network;
pub mod restrictions;

pub use components::{ModeCost, ModeCosts, RoadEdge, RoadNode};
pub use network::{IndexedNode, RoadGraph};
pub use restrictions::TurnRestrictions;
