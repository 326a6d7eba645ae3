//! # firegrid scenario
//!
//! Turns slope and aspect rasters into the JSON scenario read by a Cell-DEVS
//! wildfire model.
//!
//! ```text
//! elevation.tif ─► slope/aspect ─► sample_grid (×2) ─► build_scenario ─► write_scenario
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod sampler;
pub mod writer;

pub use builder::{assemble_cells, build_scenario, ScenarioStats};
pub use config::{CellKey, ScenarioConfig};
pub use error::{Result, ScenarioError};
pub use model::{
    Cell, CellConfig, CellMap, CellState, Cells, DefaultCell, Neighborhood, Scenario, TemplateConfig,
};
pub use pipeline::{PipelineReport, ScenarioPaths};
pub use sampler::{sample_grid, SampledGrid, SampledPoint};
pub use writer::{to_json_string, write_scenario};
