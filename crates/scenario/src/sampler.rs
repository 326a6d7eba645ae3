//! Fixed-stride sampling of rasters into coarse grids.

use crate::error::Result;
use firegrid_core::{Error, Raster, RasterElement};

/// A raster sample: world coordinate of the pixel's top-left corner and its
/// raw value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// Row-major grid of samples, `ceil(rows / stride)` by `ceil(cols / stride)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledGrid {
    points: Vec<SampledPoint>,
    width: usize,
    height: usize,
}

impl SampledGrid {
    /// Number of sample columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of sample rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&SampledPoint> {
        if row < self.height && col < self.width {
            self.points.get(row * self.width + col)
        } else {
            None
        }
    }

    /// Like [`get`](Self::get) with signed indices, for neighbor offsets.
    pub fn get_signed(&self, row: isize, col: isize) -> Option<&SampledPoint> {
        if row < 0 || col < 0 {
            return None;
        }
        self.get(row as usize, col as usize)
    }

    /// Iterate over rows of samples, north to south.
    pub fn rows(&self) -> impl Iterator<Item = &[SampledPoint]> {
        // chunks() panics on 0; a zero-width grid has no samples to yield
        self.points.chunks(self.width.max(1))
    }

    pub fn points(&self) -> &[SampledPoint] {
        &self.points
    }
}

/// Sample `raster` every `stride` pixels along both axes.
///
/// Visits pixel rows `0, stride, 2*stride, ...` below the raster height and
/// the same columns below its width, reading the top-left pixel of each
/// stride block. No interpolation. When the stride does not divide the raster
/// the last sample row/column sits at the last index the sequence reaches,
/// not at the raster edge.
pub fn sample_grid<T: RasterElement>(raster: &Raster<T>, stride: usize) -> Result<SampledGrid> {
    if stride == 0 {
        return Err(Error::InvalidParameter {
            name: "stride",
            value: stride.to_string(),
            reason: "must be at least 1 pixel".into(),
        }
        .into());
    }

    let (rows, cols) = raster.shape();
    let data = raster.data();
    let width = cols.div_ceil(stride);
    let height = rows.div_ceil(stride);

    let mut points = Vec::with_capacity(width * height);
    for row in (0..rows).step_by(stride) {
        for col in (0..cols).step_by(stride) {
            let (x, y) = raster.pixel_to_world(col, row);
            let value = data[(row, col)].to_f64().unwrap_or(f64::NAN);
            points.push(SampledPoint { x, y, value });
        }
    }

    Ok(SampledGrid {
        points,
        width,
        height,
    })
}
