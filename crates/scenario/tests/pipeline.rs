//! End-to-end runs of the scenario pipeline on GeoTIFFs written to a
//! temporary directory.

use approx::assert_relative_eq;
use firegrid_core::io::write_geotiff;
use firegrid_core::{GeoTransform, Raster, NODATA_SENTINEL};
use firegrid_scenario::pipeline::{self, ScenarioPaths};
use firegrid_scenario::{assemble_cells, sample_grid, Scenario, ScenarioConfig, ScenarioError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ORIGIN_X: f64 = 480000.0;
const ORIGIN_Y: f64 = 5100000.0;
const CELL: f64 = 10.0;

fn georef<T: firegrid_core::RasterElement>(mut raster: Raster<T>) -> Raster<T> {
    raster.set_transform(GeoTransform::new(ORIGIN_X, ORIGIN_Y, CELL, -CELL));
    raster
}

/// 300x300 DEM rising 1 m per row toward the south.
fn write_ramp_dem(dir: &Path) -> ScenarioPaths {
    let data = (0..300 * 300).map(|i| (i / 300) as f64).collect();
    let dem = georef(Raster::from_vec(data, 300, 300).unwrap());
    let input = dir.join("ramp.tif");
    write_geotiff(&dem, &input).unwrap();
    ScenarioPaths::for_input(&input)
}

fn read_scenario(path: &Path) -> Scenario {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn neighbor_count(scenario: &Scenario, key: &str) -> usize {
    scenario.cell(key).unwrap().neighborhood[0].neighbors().len()
}

#[test]
fn test_full_pipeline_on_ramp() {
    let dir = TempDir::new().unwrap();
    let paths = write_ramp_dem(dir.path());

    let report = pipeline::run(&paths, &ScenarioConfig::default()).unwrap();
    assert_eq!(report.shape, (3, 3));
    assert_eq!(report.cells, 9);

    assert!(paths.slope.exists());
    assert!(paths.aspect.exists());
    assert_eq!(paths.output, dir.path().join("ramp.json"));

    let scenario = read_scenario(&paths.output);
    assert_eq!(scenario.scenario.shape, [3, 3]);
    assert_eq!(scenario.scenario.origin, [0, 0]);

    let origin = scenario.cell("480000_5100000").unwrap();
    assert!(origin.state.ignited);
    assert_eq!(origin.cell_map, vec![[0, 0]]);
    assert_eq!(scenario.cells.entries.values().filter(|c| c.state.ignited).count(), 1);

    // Sample (col 1, row 1) is pixel (100, 100): 1000 m east and south.
    let interior = scenario.cell("481000_5099000").unwrap();
    assert_relative_eq!(interior.config.slope, 0.1_f64.atan().to_degrees(), epsilon = 1e-4);
    assert!(interior.config.aspect.abs() < 1e-6, "faces north, got {}", interior.config.aspect);
    assert_eq!(interior.state.x, 481000);
    assert_eq!(interior.state.y, 5099000);
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let paths = write_ramp_dem(dir.path());
    let config = ScenarioConfig::default();

    pipeline::run(&paths, &config).unwrap();
    let first = fs::read(&paths.output).unwrap();
    pipeline::run(&paths, &config).unwrap();
    let second = fs::read(&paths.output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_cells_are_written_in_row_major_order() {
    let dir = TempDir::new().unwrap();
    let paths = write_ramp_dem(dir.path());
    pipeline::run(&paths, &ScenarioConfig::default()).unwrap();

    let text = fs::read_to_string(&paths.output).unwrap();
    let positions: Vec<usize> = [
        "\"default\"",
        "\"480000_5100000\"",
        "\"481000_5100000\"",
        "\"482000_5100000\"",
        "\"480000_5099000\"",
        "\"482000_5098000\"",
    ]
    .iter()
    .map(|key| text.find(key).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
}

#[test]
fn test_flat_dem_has_no_aspect() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("plateau.tif");
    write_geotiff(&georef(Raster::<f64>::filled(150, 150, 700.0)), &input).unwrap();
    let paths = ScenarioPaths::for_input(&input);

    pipeline::run(&paths, &ScenarioConfig::default()).unwrap();

    let scenario = read_scenario(&paths.output);
    assert_eq!(scenario.len(), 4);
    for cell in scenario.cells.entries.values() {
        assert_eq!(cell.config.slope, 0.0);
        assert_eq!(cell.config.aspect, NODATA_SENTINEL);
    }
}

#[test]
fn test_dem_nodata_tag_marks_voids() {
    let dir = TempDir::new().unwrap();
    let mut dem = georef(Raster::<f64>::filled(200, 200, 350.0));
    dem.set_nodata(Some(-32768.0));
    dem.set(100, 100, -32768.0).unwrap();
    let input = dir.path().join("void_patch.tif");
    write_geotiff(&dem, &input).unwrap();
    let paths = ScenarioPaths::for_input(&input);

    let report = pipeline::run(&paths, &ScenarioConfig::default()).unwrap();
    assert_eq!(report.shape, (2, 2));
    assert_eq!(report.cells, 3);

    let scenario = read_scenario(&paths.output);
    assert!(scenario.cell("481000_5099000").is_none());
    assert_eq!(neighbor_count(&scenario, "480000_5100000"), 2);
    assert_eq!(neighbor_count(&scenario, "481000_5100000"), 1);
}

#[test]
fn test_uniform_derived_rasters() {
    let dir = TempDir::new().unwrap();
    let paths = ScenarioPaths::for_input(dir.path().join("flat.tif"));
    write_geotiff(&georef(Raster::<f64>::filled(300, 300, 15.0)), &paths.slope).unwrap();
    write_geotiff(&georef(Raster::<f64>::filled(300, 300, 45.0)), &paths.aspect).unwrap();

    let scenario = pipeline::scenario_from_derived(&paths, &ScenarioConfig::default()).unwrap();

    assert_eq!(scenario.scenario.shape, [3, 3]);
    assert_eq!(scenario.len(), 9);
    for cell in scenario.cells.entries.values() {
        assert_eq!(cell.config.slope, 15.0);
        assert_eq!(cell.config.aspect, 45.0);
        assert!(cell.neighborhood[0].neighbors().len() <= 4);
    }

    for corner in ["480000_5100000", "482000_5100000", "480000_5098000", "482000_5098000"] {
        assert_eq!(neighbor_count(&scenario, corner), 2, "corner {corner}");
    }
    for edge in ["481000_5100000", "480000_5099000", "482000_5099000", "481000_5098000"] {
        assert_eq!(neighbor_count(&scenario, edge), 3, "edge {edge}");
    }
    assert_eq!(neighbor_count(&scenario, "481000_5099000"), 4);
}

#[test]
fn test_cells_match_valid_slope_samples() {
    let mut slope = georef(Raster::<f64>::filled(5, 5, 12.0));
    for (row, col) in [(0, 1), (2, 2), (4, 0), (3, 4)] {
        slope.set(row, col, NODATA_SENTINEL).unwrap();
    }
    let aspect = georef(Raster::<f64>::filled(5, 5, 180.0));

    let slope_grid = sample_grid(&slope, 1).unwrap();
    let aspect_grid = sample_grid(&aspect, 1).unwrap();
    let (scenario, stats) = assemble_cells(&slope_grid, &aspect_grid, &ScenarioConfig::default()).unwrap();

    assert_eq!(stats.skipped, 4);
    assert_eq!(scenario.len(), 21);

    for row in 0..5 {
        for col in 0..5 {
            let point = slope_grid.get(row, col).unwrap();
            let key = format!("{}_{}", point.x as i64, point.y as i64);
            assert_eq!(scenario.cell(&key).is_some(), point.value > NODATA_SENTINEL, "({col}, {row})");
        }
    }

    for cell in scenario.cells.entries.values() {
        for &[c, r] in cell.neighborhood[0].neighbors() {
            assert!(c < 5 && r < 5);
            assert!(slope_grid.get(r, c).unwrap().value > NODATA_SENTINEL);
        }
    }
}

#[test]
fn test_all_nodata_fails_on_ignition() {
    let dir = TempDir::new().unwrap();
    let mut dem = georef(Raster::<f64>::filled(200, 200, NODATA_SENTINEL));
    dem.set_nodata(Some(NODATA_SENTINEL));
    let input = dir.path().join("void.tif");
    write_geotiff(&dem, &input).unwrap();
    let paths = ScenarioPaths::for_input(&input);

    let err = pipeline::run(&paths, &ScenarioConfig::default()).unwrap_err();
    assert!(matches!(err, ScenarioError::IgnitionCellNotFound { ref key } if key == "480000_5100000"));

    // Derived rasters are left behind but no scenario is written.
    assert!(paths.slope.exists());
    assert!(!paths.output.exists());

    let slope: Raster<f64> = firegrid_core::io::read_geotiff(&paths.slope).unwrap();
    let grid = sample_grid(&slope, 100).unwrap();
    let (scenario, _) = assemble_cells(&grid, &grid, &ScenarioConfig::default()).unwrap();
    assert!(scenario.is_empty());
}

#[test]
fn test_missing_input() {
    let dir = TempDir::new().unwrap();
    let paths = ScenarioPaths::for_input(dir.path().join("absent.tif"));
    let err = pipeline::run(&paths, &ScenarioConfig::default()).unwrap_err();
    assert!(matches!(err, ScenarioError::Raster(firegrid_core::Error::Io(_))));
}
