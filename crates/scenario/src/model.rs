//! Typed records of the scenario JSON document.
//!
//! Field names are those the Cell-DEVS simulator reads; do not rename them.

use crate::config::ScenarioConfig;
use crate::error::{Result, ScenarioError};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Top-level scenario document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub scenario: ScenarioHeader,
    pub cells: Cells,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioHeader {
    /// `[width_samples, height_samples]`
    pub shape: [usize; 2],
    pub origin: [i64; 2],
}

/// The `"default"` template followed by every emitted cell, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cells {
    pub default: DefaultCell,
    #[serde(flatten)]
    pub entries: CellMap,
}

/// Named cells in first-insertion order.
///
/// Inserting an existing key replaces the cell but keeps its position, so a
/// row-major build serializes row-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellMap {
    entries: Vec<(String, Cell)>,
    index: HashMap<String, usize>,
}

impl CellMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, returning the replaced cell.
    pub fn insert(&mut self, key: String, cell: Cell) -> Option<Cell> {
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, cell)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, cell));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Cell> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Cell> {
        let i = *self.index.get(key)?;
        Some(&mut self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Cell> {
        self.entries.iter().map(|(_, c)| c)
    }
}

impl Serialize for CellMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, cell) in &self.entries {
            map.serialize_entry(key, cell)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CellMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct CellMapVisitor;

        impl<'de> Visitor<'de> for CellMapVisitor {
            type Value = CellMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of cell names to cells")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<CellMap, A::Error> {
                let mut cells = CellMap::new();
                while let Some((key, cell)) = access.next_entry::<String, Cell>()? {
                    cells.insert(key, cell);
                }
                Ok(cells)
            }
        }

        deserializer.deserialize_map(CellMapVisitor)
    }
}

/// Write integral values without a fractional part (`10`, not `10.0`).
fn whole_number<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Template entry the simulator falls back to. It is not tied to any sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultCell {
    pub delay: Delay,
    pub state: CellState,
    pub config: TemplateConfig,
    pub neighborhood: Vec<Neighborhood>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delay {
    Inertial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub config: CellConfig,
    pub neighborhood: Vec<Neighborhood>,
    pub state: CellState,
    /// One `[col, row]` sample-grid position
    pub cell_map: Vec<[usize; 2]>,
}

/// Physical parameters of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellConfig {
    /// Degrees from horizontal
    pub slope: f64,
    /// Degrees clockwise from north
    pub aspect: f64,
    pub fuel_model_number: u32,
    pub wind_direction: f64,
    #[serde(serialize_with = "whole_number")]
    pub wind_speed: f64,
}

/// Physical parameters of the template. Its slope is a whole-degree
/// placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    pub slope: u32,
    pub aspect: f64,
    pub fuel_model_number: u32,
    pub wind_direction: f64,
    #[serde(serialize_with = "whole_number")]
    pub wind_speed: f64,
}

/// Initial state. `x`/`y` hold the truncated world coordinates of the
/// sample, not grid indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellState {
    pub x: i64,
    pub y: i64,
    pub ignited: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Neighborhood {
    /// Explicit list of `[col, row]` neighbor positions
    Absolute {
        vicinity: u32,
        neighbors: Vec<[usize; 2]>,
    },
    VonNeumann { vicinity: u32, range: u32 },
}

impl Neighborhood {
    pub fn neighbors(&self) -> &[[usize; 2]] {
        match self {
            Neighborhood::Absolute { neighbors, .. } => neighbors,
            Neighborhood::VonNeumann { .. } => &[],
        }
    }
}

impl DefaultCell {
    /// Template carrying the configured fuel and wind with placeholder terrain.
    pub fn template(config: &ScenarioConfig) -> Self {
        Self {
            delay: Delay::Inertial,
            state: CellState {
                x: 0,
                y: 0,
                ignited: false,
            },
            config: TemplateConfig {
                slope: 20,
                aspect: 90.0,
                fuel_model_number: config.fuel_model_number,
                wind_direction: config.wind_direction,
                wind_speed: config.wind_speed,
            },
            neighborhood: vec![Neighborhood::VonNeumann {
                vicinity: config.vicinity,
                range: 1,
            }],
        }
    }
}

impl Scenario {
    pub fn cell(&self, key: &str) -> Option<&Cell> {
        self.cells.entries.get(key)
    }

    /// Number of cells, not counting the template.
    pub fn len(&self) -> usize {
        self.cells.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.entries.is_empty()
    }

    /// Mark the cell named `key` as ignited.
    pub fn ignite(&mut self, key: &str) -> Result<()> {
        let cell = self
            .cells
            .entries
            .get_mut(key)
            .ok_or_else(|| ScenarioError::IgnitionCellNotFound {
                key: key.to_string(),
            })?;
        cell.state.ignited = true;
        Ok(())
    }
}
