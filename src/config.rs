//! TOML configuration of the `waypath` binary

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use waypath_core::prelude::*;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Where the road graph is loaded from, may be given on the command line
    pub source: Option<DataSourceConfig>,
    pub routing: RoutingConfig,
    pub recommend: RecommendConfig,
}

/// Defaults for every routing command
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    pub mode: Mode,
    pub cost_field: CostField,
    /// Speed in m/s for `length`, weight for `cost`
    pub scalar: Option<f64>,
    /// Override of the per-mode turn restriction default
    pub turn_restrictions: Option<bool>,
    pub timeout_ms: Option<u64>,
    pub tour_kind: TourKind,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Car,
            cost_field: CostField::Cost,
            scalar: None,
            turn_restrictions: None,
            timeout_ms: None,
            tour_kind: TourKind::Open,
        }
    }
}

impl RoutingConfig {
    pub fn cost_model(&self) -> CostModel {
        let model = CostModel::new(self.mode, self.cost_field).with_scalar(self.scalar);
        match self.turn_restrictions {
            Some(enforce) => model.with_turn_restrictions(enforce),
            None => model,
        }
    }

    /// Fresh limits, the deadline starts counting now
    pub fn limits(&self) -> SearchLimits {
        match self.timeout_ms {
            Some(ms) => SearchLimits::with_timeout(Duration::from_millis(ms)),
            None => SearchLimits::none(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecommendConfig {
    /// How many ranked entries to print
    pub top: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self { top: 10 }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
