//! `route` and `nearest` commands

use anyhow::{Context, Result};
use geo::Point;
use serde_json::{Map, Value as JsonValue, json};
use waypath_core::prelude::*;

use crate::config::RoutingConfig;

/// Route between two coordinates, `None` when the goal is unreachable
pub fn find_route(
    graph: &RoadGraph,
    from: &Point<f64>,
    to: &Point<f64>,
    routing: &RoutingConfig,
    geojson: bool,
) -> Result<Option<JsonValue>> {
    let model = routing.cost_model();
    let Some(route) = route_between_points(graph, from, to, &model, &routing.limits())
        .context("Routing failed")?
    else {
        return Ok(None);
    };

    if geojson {
        let mut properties = Map::new();
        properties.insert("mode".to_string(), json!(model.mode));
        properties.insert("cost_field".to_string(), json!(model.field));
        let feature = route.to_feature(graph, properties);
        Ok(Some(serde_json::to_value(feature)?))
    } else {
        Ok(Some(serde_json::to_value(&route)?))
    }
}

/// Nearest node usable in `mode`, `null` on an empty network
pub fn find_nearest(graph: &RoadGraph, at: &Point<f64>, mode: Mode) -> JsonValue {
    match nearest_node(graph, at, mode) {
        Some((node, distance)) => json!({ "node": node, "distance_m": distance }),
        None => JsonValue::Null,
    }
}
