//! End-to-end conversion of an elevation GeoTIFF into a scenario file.
//!
//! Each stage is exposed on its own so callers can report progress between
//! them; [`run`] chains them all.

use crate::builder::build_scenario;
use crate::config::ScenarioConfig;
use crate::error::Result;
use crate::sampler::sample_grid;
use crate::writer::write_scenario;
use crate::Scenario;
use firegrid_algorithms::terrain::{aspect, slope, AspectParams, SlopeParams};
use firegrid_core::io::{read_geotiff, write_geotiff};
use firegrid_core::Raster;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Files touched by one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioPaths {
    pub input: PathBuf,
    pub slope: PathBuf,
    pub aspect: PathBuf,
    pub output: PathBuf,
}

impl ScenarioPaths {
    /// Siblings of `input`: `<stem>_slope.tif`, `<stem>_aspect.tif` and
    /// `<stem>.json`.
    pub fn for_input(input: impl AsRef<Path>) -> Self {
        let input = input.as_ref().to_path_buf();
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sibling = |name: String| input.with_file_name(name);

        Self {
            slope: sibling(format!("{stem}_slope.tif")),
            aspect: sibling(format!("{stem}_aspect.tif")),
            output: sibling(format!("{stem}.json")),
            input,
        }
    }

    /// Replace the JSON destination.
    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        if let Some(output) = output {
            self.output = output;
        }
        self
    }
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// `(width, height)` of the sampled grid
    pub shape: (usize, usize),
    /// Cells written, excluding the template
    pub cells: usize,
}

/// Read the elevation raster.
pub fn read_dem(path: &Path) -> Result<Raster<f64>> {
    let dem: Raster<f64> = read_geotiff(path)?;
    info!("Input: {} x {} ({})", dem.cols(), dem.rows(), path.display());
    Ok(dem)
}

/// Compute slope (degrees) and aspect (degrees) and write them next to the
/// input. Flat windows have no aspect and get the no-data value.
pub fn derive_terrain(dem: &Raster<f64>, paths: &ScenarioPaths, config: &ScenarioConfig) -> Result<()> {
    let slope_params = SlopeParams {
        z_factor: config.z_factor,
        ..Default::default()
    };
    let slope_raster = slope(dem, slope_params)?;
    write_geotiff(&slope_raster, &paths.slope)?;
    debug!("Slope written to {}", paths.slope.display());

    let aspect_params = AspectParams {
        flat_value: config.nodata,
        ..Default::default()
    };
    let aspect_raster = aspect(dem, aspect_params)?;
    write_geotiff(&aspect_raster, &paths.aspect)?;
    debug!("Aspect written to {}", paths.aspect.display());
    Ok(())
}

/// Sample the derived rasters on disk and build the scenario from them.
pub fn scenario_from_derived(paths: &ScenarioPaths, config: &ScenarioConfig) -> Result<Scenario> {
    let slope_raster: Raster<f64> = read_geotiff(&paths.slope)?;
    let aspect_raster: Raster<f64> = read_geotiff(&paths.aspect)?;

    let slope_grid = sample_grid(&slope_raster, config.stride)?;
    let aspect_grid = sample_grid(&aspect_raster, config.stride)?;
    debug!(
        "Sampled {} x {} points every {} pixels",
        slope_grid.width(),
        slope_grid.height(),
        config.stride
    );

    build_scenario(&slope_grid, &aspect_grid, config)
}

/// Run every stage: read, derive, sample, build, write.
pub fn run(paths: &ScenarioPaths, config: &ScenarioConfig) -> Result<PipelineReport> {
    let dem = read_dem(&paths.input)?;
    derive_terrain(&dem, paths, config)?;
    let scenario = scenario_from_derived(paths, config)?;
    write_scenario(&scenario, &paths.output)?;
    info!("Scenario written to {}", paths.output.display());

    let [width, height] = scenario.scenario.shape;
    Ok(PipelineReport {
        shape: (width, height),
        cells: scenario.len(),
    })
}
