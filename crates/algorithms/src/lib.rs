//! # firegrid algorithms
//!
//! Terrain derivatives computed from elevation rasters.
//!
//! - **terrain**: slope and aspect (Horn 1981)

mod maybe_rayon;
pub mod terrain;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::terrain::{aspect, slope, AspectOutput, AspectParams, SlopeParams, SlopeUnits};
    pub use firegrid_core::prelude::*;
}
