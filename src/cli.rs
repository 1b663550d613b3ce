//! Command-line interface of the `waypath` binary

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use geo::Point;
use waypath_core::prelude::*;

use crate::config::{AppConfig, RoutingConfig};

#[derive(Debug, Parser)]
#[command(name = "waypath")]
#[command(about = "Multi-modal road routing over a pgRouting-style network", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, overrides RUST_LOG (e.g. "debug" or "waypath_core=trace")
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Directory with the CSV network, overrides the configured source
    #[arg(long, global = true, conflicts_with = "sqlite")]
    pub csv: Option<PathBuf>,

    /// SQLite network database, overrides the configured source
    #[arg(long, global = true)]
    pub sqlite: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Shortest route between two coordinates
    Route {
        /// Start coordinate (lat,lon)
        #[arg(long, value_parser = parse_lat_lon)]
        from: Point<f64>,
        /// End coordinate (lat,lon)
        #[arg(long, value_parser = parse_lat_lon)]
        to: Point<f64>,
        #[command(flatten)]
        model: ModelArgs,
        /// Print a GeoJSON Feature instead of the plain result
        #[arg(long)]
        geojson: bool,
    },
    /// Nearest network node usable in a mode
    Nearest {
        /// Query coordinate (lat,lon)
        #[arg(long, value_parser = parse_lat_lon)]
        at: Point<f64>,
        #[arg(long, value_parser = parse_mode)]
        mode: Option<Mode>,
    },
    /// Cheapest order to visit a set of waypoints, starting at the first one
    Tour {
        /// Waypoint coordinate (lat,lon), repeat for every stop
        #[arg(long = "point", value_parser = parse_lat_lon, required = true)]
        points: Vec<Point<f64>>,
        /// Return to the first waypoint
        #[arg(long)]
        closed: bool,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Route every transit line and write the geometries as GeoJSON
    Precompute {
        /// JSON array of lines with `id`, `name`, optional `mode` and `stops`
        #[arg(long)]
        lines: PathBuf,
        /// Output GeoJSON FeatureCollection
        #[arg(long)]
        output: PathBuf,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Rank corpus entries by cosine similarity to a preference
    Recommend {
        /// JSON object with `terms` or `text`
        #[arg(long)]
        preference: PathBuf,
        /// JSON array of entries with `id` and `terms` or `text`
        #[arg(long)]
        corpus: PathBuf,
        /// Number of entries to print
        #[arg(long)]
        top: Option<usize>,
    },
}

/// Cost model overrides shared by the routing commands
#[derive(Debug, Clone, Default, Args)]
pub struct ModelArgs {
    /// Travel mode: car, motorbike or foot
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<Mode>,
    /// Edge attribute to minimise: cost or length
    #[arg(long, value_parser = parse_cost_field)]
    pub cost_field: Option<CostField>,
    /// Speed in m/s with `length`, weight with `cost`
    #[arg(long)]
    pub scalar: Option<f64>,
    /// Ignore turn restrictions
    #[arg(long)]
    pub no_turn_restrictions: bool,
    /// Give up after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

impl ModelArgs {
    /// Configured routing defaults with these flags applied on top
    pub fn apply(&self, defaults: &RoutingConfig) -> RoutingConfig {
        let mut routing = defaults.clone();
        if let Some(mode) = self.mode {
            routing.mode = mode;
            // A mode change brings back that mode's restriction default
            routing.turn_restrictions = None;
        }
        if let Some(field) = self.cost_field {
            routing.cost_field = field;
        }
        if self.scalar.is_some() {
            routing.scalar = self.scalar;
        }
        if self.no_turn_restrictions {
            routing.turn_restrictions = Some(false);
        }
        if self.timeout_ms.is_some() {
            routing.timeout_ms = self.timeout_ms;
        }
        routing
    }
}

impl Cli {
    /// Source from the command line, falling back to the config file
    pub fn source(&self, config: &AppConfig) -> Option<DataSourceConfig> {
        if let Some(dir) = &self.csv {
            return Some(DataSourceConfig::Csv { dir: dir.clone() });
        }
        if let Some(path) = &self.sqlite {
            return Some(DataSourceConfig::Sqlite { path: path.clone() });
        }
        config.source.clone()
    }
}

/// Parse `lat,lon` into a point with x = longitude and y = latitude
pub fn parse_lat_lon(s: &str) -> Result<Point<f64>, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| "coordinate must be in format 'lat,lon'".to_string())?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude '{lat}': {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude '{lon}': {e}"))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} is outside [-90, 90]"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} is outside [-180, 180]"));
    }
    Ok(Point::new(lon, lat))
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse().map_err(|e: waypath_core::Error| e.to_string())
}

fn parse_cost_field(s: &str) -> Result<CostField, String> {
    s.parse().map_err(|e: waypath_core::Error| e.to_string())
}
