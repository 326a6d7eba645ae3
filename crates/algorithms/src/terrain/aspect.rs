//! Aspect calculation from DEMs

use super::map_gradient;
use firegrid_core::raster::Raster;
use firegrid_core::Result;
use std::f64::consts::PI;

/// Output format for aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectOutput {
    /// Degrees (0-360, 0=North, clockwise)
    #[default]
    Degrees,
    /// Radians (0-2π)
    Radians,
    /// Compass direction (N, NE, E, SE, S, SW, W, NW) as 1-8
    Compass,
}

/// Parameters for aspect calculation
#[derive(Debug, Clone)]
pub struct AspectParams {
    pub format: AspectOutput,
    /// Value written where the surface is flat and has no direction
    pub flat_value: f64,
}

impl Default for AspectParams {
    fn default() -> Self {
        Self {
            format: AspectOutput::Degrees,
            flat_value: -1.0,
        }
    }
}

const FLAT_THRESHOLD: f64 = 1e-10;

/// Calculate aspect from a DEM
///
/// Aspect is the bearing of steepest descent, clockwise from north:
/// 0° = North, 90° = East, 180° = South, 270° = West.
pub fn aspect(dem: &Raster<f64>, params: AspectParams) -> Result<Raster<f64>> {
    let AspectParams { format, flat_value } = params;

    map_gradient(dem, move |g| {
        if g.dz_dx.abs() < FLAT_THRESHOLD && g.dz_dy.abs() < FLAT_THRESHOLD {
            return flat_value;
        }

        // Descent in (east, north): east = -dz/dx, north = +dz/dy since
        // rows grow southward.
        let mut bearing = (-g.dz_dx).atan2(g.dz_dy);
        if bearing < 0.0 {
            bearing += 2.0 * PI;
        }

        match format {
            AspectOutput::Degrees => bearing.to_degrees(),
            AspectOutput::Radians => bearing,
            AspectOutput::Compass => compass_octant(bearing.to_degrees()),
        }
    })
}

fn compass_octant(deg: f64) -> f64 {
    // N=1 .. NW=8, each sector 45° wide centred on its direction
    (((deg + 22.5) / 45.0).floor() % 8.0) + 1.0
}
