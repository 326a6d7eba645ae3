//! Slope calculation from DEMs

use super::map_gradient;
use firegrid_core::raster::Raster;
use firegrid_core::{Error, Result};

/// Units for slope output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlopeUnits {
    /// Degrees (0-90)
    #[default]
    Degrees,
    /// Percent (0-infinity, typically 0-100+)
    Percent,
    /// Radians (0-π/2)
    Radians,
}

/// Parameters for slope calculation
#[derive(Debug, Clone)]
pub struct SlopeParams {
    /// Output units
    pub units: SlopeUnits,
    /// Multiplier converting elevation units into horizontal units
    pub z_factor: f64,
}

impl Default for SlopeParams {
    fn default() -> Self {
        Self {
            units: SlopeUnits::Degrees,
            z_factor: 1.0,
        }
    }
}

/// Calculate slope from a DEM
///
/// ```text
/// dz/dx = ((c + 2f + i) - (a + 2d + g)) / (8 * cellsize_x)
/// dz/dy = ((g + 2h + i) - (a + 2b + c)) / (8 * cellsize_y)
/// slope = atan(z_factor * sqrt(dz/dx² + dz/dy²))
/// ```
pub fn slope(dem: &Raster<f64>, params: SlopeParams) -> Result<Raster<f64>> {
    if !(params.z_factor.is_finite() && params.z_factor > 0.0) {
        return Err(Error::InvalidParameter {
            name: "z_factor",
            value: params.z_factor.to_string(),
            reason: "must be a positive finite number".into(),
        });
    }

    let z = params.z_factor;
    let units = params.units;

    map_gradient(dem, move |g| {
        let slope_rad = (z * (g.dz_dx * g.dz_dx + g.dz_dy * g.dz_dy).sqrt()).atan();
        match units {
            SlopeUnits::Degrees => slope_rad.to_degrees(),
            SlopeUnits::Percent => slope_rad.tan() * 100.0,
            SlopeUnits::Radians => slope_rad,
        }
    })
}
