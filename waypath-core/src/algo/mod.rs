//! Algorithms independent of the road graph

pub mod similarity;
