//! Batch precomputation of transit line geometries.
//!
//! Every line is a sequence of stops. Consecutive stops are routed over the
//! road network and the legs are joined into a single `LineString` feature,
//! the output is one GeoJSON `FeatureCollection` for all lines.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use geo::Point;
use geojson::{Feature, FeatureCollection};
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::{Map, json};
use tracing::{info, warn};
use waypath_core::prelude::*;

use crate::config::RoutingConfig;

/// Transit line as read from the input file
#[derive(Debug, Clone, Deserialize)]
pub struct TransitLine {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Overrides the configured mode for this line
    #[serde(default)]
    pub mode: Option<Mode>,
    /// Stops as `[lat, lon]`
    pub stops: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrecomputeReport {
    pub written: usize,
    pub skipped: usize,
}

pub fn read_lines(path: &Path) -> Result<Vec<TransitLine>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open lines file '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid lines file '{}'", path.display()))
}

/// Route every line in parallel.
///
/// Lines with an unresolvable stop or an unreachable leg are logged and
/// left out of the collection.
pub fn precompute_lines(
    graph: &RoadGraph,
    lines: &[TransitLine],
    routing: &RoutingConfig,
) -> (FeatureCollection, PrecomputeReport) {
    let results: Vec<Result<Feature>> = lines
        .par_iter()
        .map(|line| {
            line_feature(graph, line, routing)
                .with_context(|| format!("Line '{}' ({})", line.id, line.name))
        })
        .collect();

    let mut report = PrecomputeReport::default();
    let mut features = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(feature) => {
                features.push(feature);
                report.written += 1;
            }
            Err(e) => {
                warn!("Skipping line: {e:#}");
                report.skipped += 1;
            }
        }
    }

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    (collection, report)
}

fn line_feature(graph: &RoadGraph, line: &TransitLine, routing: &RoutingConfig) -> Result<Feature> {
    if line.stops.len() < 2 {
        bail!("needs at least two stops, got {}", line.stops.len());
    }
    // Only the mode changes, configured restriction overrides stay in force
    let model = match line.mode {
        Some(mode) => RoutingConfig {
            mode,
            ..routing.clone()
        }
        .cost_model(),
        None => routing.cost_model(),
    };

    let stops = line
        .stops
        .iter()
        .enumerate()
        .map(|(index, &[lat, lon])| {
            nearest_node(graph, &Point::new(lon, lat), model.mode)
                .map(|(node, _)| node)
                .ok_or_else(|| anyhow!("stop {index} cannot be snapped to the {} network", model.mode))
        })
        .collect::<Result<Vec<NodeId>>>()?;

    let legs = stops
        .par_windows(2)
        .enumerate()
        .map(|(index, pair)| {
            astar(graph, pair[0], pair[1], &model, &routing.limits())?
                .ok_or_else(|| anyhow!("no route between stops {index} and {}", index + 1))
        })
        .collect::<Result<Vec<RouteResult>>>()?;

    let mut joined = RouteResult {
        nodes: vec![stops[0]],
        cost: 0.0,
        length: 0.0,
    };
    for leg in legs {
        joined.nodes.extend(leg.nodes.into_iter().skip(1));
        joined.cost += leg.cost;
        joined.length += leg.length;
    }

    let mut properties = Map::new();
    properties.insert("id".to_string(), json!(line.id));
    properties.insert("name".to_string(), json!(line.name));
    properties.insert("mode".to_string(), json!(model.mode));
    properties.insert("stop_count".to_string(), json!(line.stops.len()));
    Ok(joined.to_feature(graph, properties))
}

pub fn write_collection(path: &Path, collection: &FeatureCollection) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, collection)?;
    writer.flush()?;
    Ok(())
}

/// Read lines, route them and write the collection, returning the counts
pub fn run_precompute(
    graph: &RoadGraph,
    lines_path: &Path,
    output: &Path,
    routing: &RoutingConfig,
) -> Result<PrecomputeReport> {
    let lines = read_lines(lines_path)?;
    info!("Precomputing geometries for {} lines", lines.len());

    let (collection, report) = precompute_lines(graph, &lines, routing);
    write_collection(output, &collection)?;
    info!(
        written = report.written,
        skipped = report.skipped,
        "Wrote {}",
        output.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use waypath_core::loading::EdgeRecord;

    use super::*;

    /// Car network 1 <-> 2 <-> 3 along the equator plus a one-way island 4 -> 5
    fn corridor() -> RoadGraph {
        let mut source = InMemorySource::new()
            .with_node(1, 0.0, 0.0)
            .with_node(2, 0.0, 0.001)
            .with_node(3, 0.0, 0.002)
            .with_node(4, 1.0, 1.0)
            .with_node(5, 1.0, 1.001);
        let edges = [(1, 1, 2, Some(5.0)), (2, 2, 3, Some(5.0)), (3, 4, 5, None)];
        for (id, from, to, reverse_cost) in edges {
            source = source.with_edge(
                Mode::Car,
                EdgeRecord {
                    id,
                    source: from,
                    target: to,
                    cost: 5.0,
                    reverse_cost,
                    length: 111.0,
                },
            );
        }
        create_road_graph(&source).unwrap()
    }

    fn one_way(id: i64, source: i64, target: i64) -> EdgeRecord {
        EdgeRecord {
            id,
            source,
            target,
            cost: 5.0,
            reverse_cost: None,
            length: 111.0,
        }
    }

    fn line(id: &str, mode: Option<Mode>, stops: &[[f64; 2]]) -> TransitLine {
        TransitLine {
            id: id.to_string(),
            name: format!("Line {id}"),
            mode,
            stops: stops.to_vec(),
        }
    }

    #[test]
    fn consecutive_legs_are_joined() {
        let graph = corridor();
        let lines = [line("1", None, &[[0.0, 0.0], [0.0, 0.002], [0.0, 0.001]])];
        let (collection, report) = precompute_lines(&graph, &lines, &RoutingConfig::default());

        assert_eq!(report, PrecomputeReport { written: 1, skipped: 0 });
        let feature = &collection.features[0];
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties["cost"], json!(15.0));
        assert_eq!(properties["node_count"], json!(4));
        assert_eq!(properties["id"], json!("1"));
    }

    #[test]
    fn broken_lines_are_skipped() {
        let graph = corridor();
        let lines = [
            line("ok", None, &[[0.0, 0.0], [0.0, 0.002]]),
            line("single", None, &[[0.0, 0.0]]),
            line("nowhere", Some(Mode::Motorbike), &[[0.0, 0.0], [0.0, 0.002]]),
            line("island", None, &[[1.0, 1.0], [0.0, 0.0]]),
        ];
        let (collection, report) = precompute_lines(&graph, &lines, &RoutingConfig::default());
        assert_eq!(report, PrecomputeReport { written: 1, skipped: 3 });
        assert_eq!(collection.features.len(), 1);
    }

    #[test]
    fn files_round_trip_through_disk() {
        let graph = corridor();
        let dir = TempDir::new().unwrap();
        let lines_path = dir.path().join("lines.json");
        let output = dir.path().join("routes.geojson");
        std::fs::write(
            &lines_path,
            r#"[{"id": "7", "name": "Seven", "stops": [[0.0, 0.0], [0.0, 0.002]]}]"#,
        )
        .unwrap();

        let report = run_precompute(&graph, &lines_path, &output, &RoutingConfig::default()).unwrap();
        assert_eq!(report.written, 1);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["type"], "FeatureCollection");
        assert_eq!(written["features"][0]["properties"]["name"], "Seven");
    }

    #[test]
    fn line_mode_keeps_restriction_override() {
        // 1 -> 2 -> 3 with the turn at 2 forbidden
        let source = InMemorySource::new()
            .with_node(1, 0.0, 0.0)
            .with_node(2, 0.0, 0.001)
            .with_node(3, 0.0, 0.002)
            .with_edge(Mode::Car, one_way(1, 1, 2))
            .with_edge(Mode::Car, one_way(2, 2, 3))
            .with_turn_restriction(1, 2, 2);
        let graph = create_road_graph(&source).unwrap();
        let lines = [line("restricted", Some(Mode::Car), &[[0.0, 0.0], [0.0, 0.002]])];

        let enforced = RoutingConfig {
            mode: Mode::Foot,
            ..RoutingConfig::default()
        };
        let (_, report) = precompute_lines(&graph, &lines, &enforced);
        assert_eq!(report, PrecomputeReport { written: 0, skipped: 1 });

        let relaxed = RoutingConfig {
            mode: Mode::Foot,
            turn_restrictions: Some(false),
            ..RoutingConfig::default()
        };
        let (collection, report) = precompute_lines(&graph, &lines, &relaxed);
        assert_eq!(report, PrecomputeReport { written: 1, skipped: 0 });
        let properties = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(properties["mode"], json!("car"));
        assert_eq!(properties["cost"], json!(10.0));
    }
}
