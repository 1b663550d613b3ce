//! Travel modes and the cost models built on top of them

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::model::RoadEdge;

/// Travel modality with independent traversability and costs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Car,
    #[serde(alias = "motorcycle")]
    Motorbike,
    #[serde(alias = "walk")]
    Foot,
}

impl Mode {
    /// All modes in loading order
    pub const ALL: [Mode; 3] = [Mode::Car, Mode::Motorbike, Mode::Foot];

    pub(crate) const fn index(self) -> usize {
        match self {
            Mode::Car => 0,
            Mode::Motorbike => 1,
            Mode::Foot => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Car => "car",
            Mode::Motorbike => "motorbike",
            Mode::Foot => "foot",
        }
    }

    /// Whether searches in this mode obey turn restrictions unless told otherwise
    pub const fn obeys_turn_restrictions(self) -> bool {
        !matches!(self, Mode::Foot)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(Mode::Car),
            "motorbike" | "motorcycle" => Ok(Mode::Motorbike),
            "foot" | "walk" => Ok(Mode::Foot),
            other => Err(Error::InvalidInput(format!("unknown travel mode '{other}'"))),
        }
    }
}

/// Which edge attribute drives the accumulated cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostField {
    /// Mode-specific cost stored with the edge
    #[default]
    Cost,
    /// Physical length of the edge in meters
    Length,
}

impl CostField {
    pub(crate) const fn index(self) -> usize {
        match self {
            CostField::Cost => 0,
            CostField::Length => 1,
        }
    }
}

impl FromStr for CostField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cost" => Ok(CostField::Cost),
            "length" => Ok(CostField::Length),
            other => Err(Error::InvalidInput(format!("unknown cost field '{other}'"))),
        }
    }
}

/// Cost model of a single search.
///
/// With [`CostField::Length`] the optional `scalar` is a speed in meters per
/// second and edge costs become travel times (`length / speed`). With
/// [`CostField::Cost`] it is a weight multiplied into every edge cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    pub mode: Mode,
    pub field: CostField,
    pub scalar: Option<f64>,
    pub turn_restrictions: bool,
}

impl CostModel {
    pub fn new(mode: Mode, field: CostField) -> Self {
        Self {
            mode,
            field,
            scalar: None,
            turn_restrictions: mode.obeys_turn_restrictions(),
        }
    }

    #[must_use]
    pub fn with_scalar(mut self, scalar: Option<f64>) -> Self {
        self.scalar = scalar;
        self
    }

    #[must_use]
    pub fn with_turn_restrictions(mut self, enforce: bool) -> Self {
        self.turn_restrictions = enforce;
        self
    }

    /// Reject scalars that would break cost monotonicity
    pub fn validate(&self) -> Result<(), Error> {
        match self.scalar {
            Some(value) if !value.is_finite() || value <= 0.0 => Err(Error::InvalidInput(
                format!("cost scalar must be a positive finite number, got {value}"),
            )),
            _ => Ok(()),
        }
    }

    /// Scaled cost of traversing `edge`, `None` when it is impassable in
    /// this mode
    pub fn edge_cost(&self, edge: &RoadEdge) -> Option<f64> {
        let cost = edge.costs.get(self.mode)?;
        let raw = match self.field {
            CostField::Cost => cost.forward,
            CostField::Length => edge.length,
        };
        Some(self.scale(raw))
    }

    /// Apply the scalar to a raw field value
    pub(crate) fn scale(&self, raw: f64) -> f64 {
        match (self.field, self.scalar) {
            (_, None) => raw,
            (CostField::Length, Some(speed)) => raw / speed,
            (CostField::Cost, Some(weight)) => raw * weight,
        }
    }
}
