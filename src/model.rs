//! Road graph loading for the command-line consumer

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::info;
use waypath_core::prelude::*;

/// Load the road graph from `source` through `cache`.
///
/// The graph is built once per cache, later calls return the same snapshot.
pub fn load_graph(cache: &GraphCache, source: Option<&DataSourceConfig>) -> Result<Arc<RoadGraph>> {
    let Some(source) = source else {
        bail!("No road network configured, pass --csv, --sqlite or a [source] config section");
    };
    if let Ok(graph) = cache.snapshot() {
        return Ok(graph);
    }

    let start = Instant::now();
    let opened = source
        .open_source()
        .with_context(|| format!("Failed to open road network {source:?}"))?;
    let graph = cache
        .get_or_load(&opened)
        .context("Failed to load road network")?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Road graph ready in {:.2}s",
        start.elapsed().as_secs_f64()
    );
    Ok(graph)
}
