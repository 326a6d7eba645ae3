//! Assembly of scenario cells from sampled slope and aspect grids.

use crate::config::{CellKey, ScenarioConfig};
use crate::error::Result;
use crate::model::{
    Cell, CellConfig, CellMap, CellState, Cells, DefaultCell, Neighborhood, Scenario, ScenarioHeader,
};
use crate::sampler::SampledGrid;
use firegrid_core::Error;
use tracing::{debug, info, warn};

/// Neighbor offsets as `(d_col, d_row)`: left, right, down, up.
const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];

/// Counters collected while assembling cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScenarioStats {
    /// Grid positions visited
    pub sampled: usize,
    /// Positions skipped as no-data
    pub skipped: usize,
    /// Positions whose key replaced an earlier cell
    pub collisions: usize,
    /// Cells in the final document
    pub cells: usize,
}

/// Build every cell without igniting any of them.
///
/// A position is skipped when its slope is `<= config.nodata`; a neighbor
/// counts only when its slope is `> config.nodata`. Positions are visited
/// row-major and a later cell replaces an earlier one with the same key,
/// keeping the earlier one's position in the output.
pub fn assemble_cells(
    slope: &SampledGrid,
    aspect: &SampledGrid,
    config: &ScenarioConfig,
) -> Result<(Scenario, ScenarioStats)> {
    if slope.shape() != aspect.shape() {
        let (ec, er) = slope.shape();
        let (ac, ar) = aspect.shape();
        return Err(Error::SizeMismatch { er, ec, ar, ac }.into());
    }

    let (width, height) = slope.shape();
    let is_valid = |row: isize, col: isize| {
        slope
            .get_signed(row, col)
            .is_some_and(|p| p.value > config.nodata)
    };

    let mut stats = ScenarioStats::default();
    let mut entries = CellMap::new();

    for row in 0..height {
        for col in 0..width {
            stats.sampled += 1;
            let (Some(s), Some(a)) = (slope.get(row, col), aspect.get(row, col)) else {
                continue;
            };
            if s.value <= config.nodata {
                stats.skipped += 1;
                continue;
            }

            let neighbors: Vec<[usize; 2]> = NEIGHBOR_OFFSETS
                .iter()
                .map(|&(dc, dr)| (col as isize + dc, row as isize + dr))
                .filter(|&(c, r)| is_valid(r, c))
                .map(|(c, r)| [c as usize, r as usize])
                .collect();

            let key = CellKey::from_world(s.x, s.y);
            let cell = Cell {
                config: CellConfig {
                    slope: s.value,
                    aspect: a.value,
                    fuel_model_number: config.fuel_model_number,
                    wind_direction: config.wind_direction,
                    wind_speed: config.wind_speed,
                },
                neighborhood: vec![Neighborhood::Absolute {
                    vicinity: config.vicinity,
                    neighbors,
                }],
                state: CellState {
                    x: key.x,
                    y: key.y,
                    ignited: false,
                },
                cell_map: vec![[col, row]],
            };

            if entries.insert(key.to_string(), cell).is_some() {
                stats.collisions += 1;
                warn!("Cell {} at ({}, {}) replaces an earlier sample", key, col, row);
            }
        }
    }

    stats.cells = entries.len();
    debug!(?stats, "Assembled scenario cells");

    let scenario = Scenario {
        scenario: ScenarioHeader {
            shape: [width, height],
            origin: [0, 0],
        },
        cells: Cells {
            default: DefaultCell::template(config),
            entries,
        },
    };
    Ok((scenario, stats))
}

/// Build the scenario and ignite `config.ignition`.
///
/// Fails with [`ScenarioError::IgnitionCellNotFound`](crate::ScenarioError)
/// when no emitted cell carries that key.
pub fn build_scenario(
    slope: &SampledGrid,
    aspect: &SampledGrid,
    config: &ScenarioConfig,
) -> Result<Scenario> {
    let (mut scenario, stats) = assemble_cells(slope, aspect, config)?;
    info!(
        "Scenario grid {} x {}: {} cells, {} no-data, {} collisions",
        slope.width(),
        slope.height(),
        stats.cells,
        stats.skipped,
        stats.collisions
    );

    scenario.ignite(&config.ignition.to_string())?;
    info!("Ignition at {}", config.ignition);
    Ok(scenario)
}
