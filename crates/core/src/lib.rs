//! # firegrid core
//!
//! Core raster types and I/O shared by the firegrid crates.
//!
//! This crate provides:
//! - `Raster<T>`: georeferenced 2D grid with an optional no-data value
//! - `GeoTransform`: affine pixel-to-world mapping
//! - Native single-band GeoTIFF reading and writing

pub mod error;
pub mod io;
pub mod raster;

pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement};

/// No-data sentinel written into derived rasters and honoured by the scenario
/// builder.
pub const NODATA_SENTINEL: f64 = -9999.0;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::NODATA_SENTINEL;
}
