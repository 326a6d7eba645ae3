//! Terrain analysis on Digital Elevation Models
//!
//! - Slope: steepness of the surface
//! - Aspect: compass direction of steepest descent
//!
//! Both use Horn's (1981) 3x3 finite differences over the window
//! ```text
//! a b c
//! d e f
//! g h i
//! ```
//! Neighbors outside the raster or holding no-data take the center value,
//! so border pixels get a value. A no-data center yields
//! [`NODATA_SENTINEL`].

mod aspect;
mod slope;

pub use aspect::{aspect, AspectOutput, AspectParams};
pub use slope::{slope, SlopeParams, SlopeUnits};

use crate::maybe_rayon::*;
use firegrid_core::raster::Raster;
use firegrid_core::{Result, NODATA_SENTINEL};
use ndarray::Array2;

/// Horn gradient of one pixel, in elevation units per world unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Gradient {
    /// Positive when elevation increases eastward
    pub dz_dx: f64,
    /// Positive when elevation increases southward (with the row index)
    pub dz_dy: f64,
}

fn horn_gradient(dem: &Raster<f64>, row: usize, col: usize) -> Option<Gradient> {
    let (rows, cols) = dem.shape();
    let data = dem.data();
    let e = data[(row, col)];
    if dem.is_nodata(e) {
        return None;
    }

    let at = |dr: isize, dc: isize| -> f64 {
        let r = row as isize + dr;
        let c = col as isize + dc;
        if r < 0 || c < 0 || r >= rows as isize || c >= cols as isize {
            return e;
        }
        let v = data[(r as usize, c as usize)];
        if dem.is_nodata(v) {
            e
        } else {
            v
        }
    };

    let (a, b, c) = (at(-1, -1), at(-1, 0), at(-1, 1));
    let (d, f) = (at(0, -1), at(0, 1));
    let (g, h, i) = (at(1, -1), at(1, 0), at(1, 1));

    let gt = dem.transform();
    Some(Gradient {
        dz_dx: ((c + 2.0 * f + i) - (a + 2.0 * d + g)) / (8.0 * gt.cell_size_x()),
        dz_dy: ((g + 2.0 * h + i) - (a + 2.0 * b + c)) / (8.0 * gt.cell_size_y()),
    })
}

/// Apply `f` to the gradient of every pixel, producing a raster with the
/// same transform and [`NODATA_SENTINEL`] as no-data.
pub(crate) fn map_gradient<F>(dem: &Raster<f64>, f: F) -> Result<Raster<f64>>
where
    F: Fn(Gradient) -> f64 + Send + Sync,
{
    let (rows, cols) = dem.shape();

    let values: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| horn_gradient(dem, row, col).map_or(NODATA_SENTINEL, &f))
                .collect::<Vec<f64>>()
        })
        .collect();

    let data = Array2::from_shape_vec((rows, cols), values)
        .map_err(|e| firegrid_core::Error::Other(e.to_string()))?;
    dem.derive(data, Some(NODATA_SENTINEL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use firegrid_core::GeoTransform;

    #[test]
    fn test_border_uses_center_value() {
        // z = col on a 10 m grid: interior gradient is 0.1 eastward.
        let mut dem: Raster<f64> = Raster::new(5, 5);
        dem.set_transform(GeoTransform::new(0.0, 50.0, 10.0, -10.0));
        for row in 0..5 {
            for col in 0..5 {
                dem.set(row, col, col as f64).unwrap();
            }
        }

        let interior = horn_gradient(&dem, 2, 2).unwrap();
        assert_relative_eq!(interior.dz_dx, 0.1);
        assert_relative_eq!(interior.dz_dy, 0.0);

        // Left column: the missing west neighbors equal the center.
        let edge = horn_gradient(&dem, 2, 0).unwrap();
        assert_relative_eq!(edge.dz_dx, 0.05);
    }

    #[test]
    fn test_nodata_center() {
        let mut dem: Raster<f64> = Raster::filled(3, 3, 5.0);
        dem.set(1, 1, -9999.0).unwrap();
        dem.set_nodata(Some(-9999.0));

        assert!(horn_gradient(&dem, 1, 1).is_none());
        let out = map_gradient(&dem, |g| g.dz_dx).unwrap();
        assert_eq!(out.get(1, 1).unwrap(), NODATA_SENTINEL);
        assert_eq!(out.get(0, 0).unwrap(), 0.0);
        assert_eq!(out.nodata(), Some(NODATA_SENTINEL));
    }
}
