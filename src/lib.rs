//! Command-line consumer of the waypath routing engine.
//!
//! Loads a road network once, then answers a single routing, tour or
//! recommendation query, or runs the transit line precomputation job.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Result, anyhow};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use waypath_core::prelude::*;

pub mod cli;
pub mod config;
pub mod model;
pub mod precompute;
pub mod recommend;
pub mod routing;
pub mod tour;

use cli::{Cli, Commands};
use config::AppConfig;

/// Exit code of a query whose goal is unreachable
pub const EXIT_NO_ROUTE: u8 = 2;

/// Install the fmt subscriber, `log` records of the core are bridged in.
///
/// `level` wins over `RUST_LOG`, the fallback is `info`.
pub fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    let source = cli.source(&config);
    let cache = GraphCache::new();

    match cli.command {
        Commands::Route {
            from,
            to,
            model: model_args,
            geojson,
        } => {
            let graph = model::load_graph(&cache, source.as_ref())?;
            let routing_config = model_args.apply(&config.routing);
            match routing::find_route(&graph, &from, &to, &routing_config, geojson)? {
                Some(route) => print_json(&route)?,
                None => {
                    print_json(&serde_json::Value::Null)?;
                    return Ok(ExitCode::from(EXIT_NO_ROUTE));
                }
            }
        }
        Commands::Nearest { at, mode } => {
            let graph = model::load_graph(&cache, source.as_ref())?;
            let mode = mode.unwrap_or(config.routing.mode);
            print_json(&routing::find_nearest(&graph, &at, mode))?;
        }
        Commands::Tour {
            points,
            closed,
            model: model_args,
        } => {
            let graph = model::load_graph(&cache, source.as_ref())?;
            let mut routing_config = model_args.apply(&config.routing);
            if closed {
                routing_config.tour_kind = TourKind::Closed;
            }
            print_json(&tour::plan_tour(&graph, &points, &routing_config)?)?;
        }
        Commands::Precompute {
            lines,
            output,
            model: model_args,
        } => {
            let graph = model::load_graph(&cache, source.as_ref())?;
            let routing_config = model_args.apply(&config.routing);
            let report = precompute::run_precompute(&graph, &lines, &output, &routing_config)?;
            print_json(&serde_json::json!({
                "written": report.written,
                "skipped": report.skipped,
            }))?;
        }
        Commands::Recommend {
            preference,
            corpus,
            top,
        } => {
            let top = top.unwrap_or(config.recommend.top);
            print_json(&recommend::run_recommend(&preference, &corpus, top)?)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
