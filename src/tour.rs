//! `tour` command

use anyhow::{Context, Result};
use geo::Point;
use serde_json::{Value as JsonValue, json};
use waypath_core::prelude::*;

use crate::config::RoutingConfig;

/// Solve the waypoint tour and describe it as JSON.
///
/// Besides the tour itself the output lists the network node every waypoint
/// was snapped to.
pub fn plan_tour(graph: &RoadGraph, points: &[Point<f64>], routing: &RoutingConfig) -> Result<JsonValue> {
    let model = routing.cost_model();
    let tour = solve_tour(graph, points, &model, routing.tour_kind, &routing.limits())
        .context("Tour planning failed")?;

    let snapped: Vec<JsonValue> = points
        .iter()
        .map(|point| match nearest_node(graph, point, model.mode) {
            Some((node, distance)) => json!({ "node": node, "distance_m": distance }),
            None => JsonValue::Null,
        })
        .collect();

    let mut value = serde_json::to_value(&tour)?;
    value["waypoints"] = JsonValue::Array(snapped);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use waypath_core::loading::EdgeRecord;

    use super::*;

    fn square() -> RoadGraph {
        let corners = [(1, 0.0, 0.0), (2, 0.0, 0.001), (3, 0.001, 0.001), (4, 0.001, 0.0)];
        let mut source = InMemorySource::new();
        for (id, lat, lon) in corners {
            source = source.with_node(id, lat, lon);
        }
        for (id, (source_id, target_id)) in [(1, 2), (2, 3), (3, 4), (4, 1)].into_iter().enumerate() {
            source = source.with_edge(
                Mode::Car,
                EdgeRecord {
                    id: id as i64,
                    source: source_id,
                    target: target_id,
                    cost: 10.0,
                    reverse_cost: Some(10.0),
                    length: 111.0,
                },
            );
        }
        create_road_graph(&source).unwrap()
    }

    #[test]
    fn closed_tour_visits_every_corner() {
        let graph = square();
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.001, 0.001),
            Point::new(0.001, 0.0),
            Point::new(0.0, 0.001),
        ];
        let routing = RoutingConfig {
            tour_kind: TourKind::Closed,
            ..RoutingConfig::default()
        };

        let value = plan_tour(&graph, &points, &routing).unwrap();
        assert_eq!(value["total_cost"], json!(40.0));
        assert_eq!(value["kind"], "closed");
        assert_eq!(value["legs"].as_array().unwrap().len(), 4);
        assert_eq!(value["waypoints"][1]["node"], 3);
    }

    #[test]
    fn oversized_tour_is_an_error() {
        let graph = square();
        let points = vec![Point::new(0.0, 0.0); MAX_TOUR_WAYPOINTS + 1];
        assert!(plan_tour(&graph, &points, &RoutingConfig::default()).is_err());
    }
}
