//! Bench configuration: which cells exist and what chemistry each slot holds.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chemistry::Chemistry;
use crate::error::{CellbenchError, Result};

pub const MIN_GROUP: u32 = 1;
pub const MAX_GROUP: u32 = 100;
pub const MIN_CELLS: usize = 1;
pub const MAX_CELLS: usize = 16;
pub const DEFAULT_CELL_COUNT: usize = 8;
pub const DEFAULT_BENCH_NAME: &str = "Bench-001";

/// Configuration of one test bench.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchConfig {
    pub bench_name: String,
    pub group: u32,
    /// Chemistry per slot; slot `i` is cell `i + 1`.
    pub cells: Vec<Chemistry>,
}

/// On-disk shape of a bench file. Chemistry names stay strings until
/// [`BenchConfig::parse`] resolves them.
#[derive(Deserialize)]
struct BenchFile {
    #[serde(default = "default_bench_name")]
    bench_name: String,
    #[serde(default = "default_group")]
    group: u32,
    #[serde(default)]
    cells: Option<Vec<String>>,
}

fn default_bench_name() -> String {
    DEFAULT_BENCH_NAME.to_string()
}
fn default_group() -> u32 {
    MIN_GROUP
}
fn default_cells() -> Vec<Chemistry> {
    vec![Chemistry::default(); DEFAULT_CELL_COUNT]
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            bench_name: default_bench_name(),
            group: default_group(),
            cells: default_cells(),
        }
    }
}

impl BenchConfig {
    /// A bench with the given chemistries and default name/group.
    pub fn with_cells(cells: Vec<Chemistry>) -> Self {
        Self {
            cells,
            ..Default::default()
        }
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.bench_name.trim().is_empty() {
            return Err(CellbenchError::InvalidConfig {
                key: "bench_name",
                message: "must not be blank".to_string(),
            });
        }
        if !(MIN_GROUP..=MAX_GROUP).contains(&self.group) {
            return Err(CellbenchError::InvalidConfig {
                key: "group",
                message: format!(
                    "must be between {MIN_GROUP} and {MAX_GROUP}, got {}",
                    self.group
                ),
            });
        }
        if !(MIN_CELLS..=MAX_CELLS).contains(&self.cells.len()) {
            return Err(CellbenchError::InvalidConfig {
                key: "cells",
                message: format!(
                    "cell count must be between {MIN_CELLS} and {MAX_CELLS}, got {}",
                    self.cells.len()
                ),
            });
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Stable id for a slot: `Cell_{slot+1}_{chemistry}`.
    pub fn cell_id(&self, slot: usize) -> Option<String> {
        self.cells
            .get(slot)
            .map(|chem| format_cell_id(slot, *chem))
    }

    /// `(cell_id, chemistry)` for every slot in order.
    pub fn slots(&self) -> impl Iterator<Item = (String, Chemistry)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(slot, chem)| (format_cell_id(slot, *chem), *chem))
    }

    /// Resize to `count` slots, filling new slots with `fill`.
    pub fn resize(&mut self, count: usize, fill: Chemistry) {
        self.cells.resize(count, fill);
    }

    /// Load and validate a JSON bench file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse and validate JSON.
    pub fn parse(content: &str) -> Result<Self> {
        let file: BenchFile = serde_json::from_str(content)?;
        let cells = match file.cells {
            Some(names) => names
                .iter()
                .map(|name| name.parse::<Chemistry>())
                .collect::<Result<Vec<_>>>()?,
            None => default_cells(),
        };
        let config = Self {
            bench_name: file.bench_name,
            group: file.group,
            cells,
        };
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

fn format_cell_id(slot: usize, chemistry: Chemistry) -> String {
    format!("Cell_{}_{}", slot + 1, chemistry)
}
