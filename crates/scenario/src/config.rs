//! Scenario generation parameters.

use crate::error::ScenarioError;
use std::fmt;
use std::str::FromStr;

/// Name of a cell: the sample's world coordinates truncated toward zero,
/// rendered as `"{x}_{y}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub x: i64,
    pub y: i64,
}

impl CellKey {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Truncate world coordinates toward zero.
    pub fn from_world(x: f64, y: f64) -> Self {
        Self {
            x: x.trunc() as i64,
            y: y.trunc() as i64,
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.x, self.y)
    }
}

impl FromStr for CellKey {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScenarioError::InvalidCellKey(s.to_string());
        let (x, y) = s.split_once('_').ok_or_else(invalid)?;
        Ok(Self {
            x: x.trim().parse().map_err(|_| invalid())?,
            y: y.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// Parameters of a generated scenario.
///
/// The defaults reproduce the values the scenario format was first written
/// with; `ignition` in particular only matches rasters whose sampled extent
/// contains world coordinate (480000, 5100000).
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    /// Sampling interval in pixels
    pub stride: usize,
    /// Elevation-to-horizontal unit factor used for slope
    pub z_factor: f64,
    /// Samples at or below this value are no-data
    pub nodata: f64,
    /// Distance reported to the simulator between neighboring cells
    pub vicinity: u32,
    pub fuel_model_number: u32,
    /// Degrees
    pub wind_direction: f64,
    pub wind_speed: f64,
    /// Cell that starts the fire
    pub ignition: CellKey,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            stride: 100,
            z_factor: 1.0,
            nodata: firegrid_core::NODATA_SENTINEL,
            vicinity: 100,
            fuel_model_number: 1,
            wind_direction: 90.0,
            wind_speed: 10.0,
            ignition: CellKey::new(480000, 5100000),
        }
    }
}
