//! Configuration types for the simulation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which neighbor cells are reported to an entity on update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NeighborPolicy {
    /// Only in-bounds cells holding an entity
    #[default]
    OccupiedOnly,
    /// Every in-bounds cell, vacant ones carrying no occupant
    IncludeVacant,
}

/// What happens when an entity is added to an occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Refuse the entity with `Error::CellOccupied`
    #[default]
    Reject,
    /// Store the entity but keep the first occupant visible
    KeepFirst,
}

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width and height of the square grid
    pub size: i32,
    pub neighbor_policy: NeighborPolicy,
    pub duplicate_policy: DuplicatePolicy,
}

impl WorldConfig {
    /// Number of cells in the grid, zero for a non-positive size
    pub fn cell_count(&self) -> usize {
        let side = self.size.max(0) as usize;
        side.saturating_mul(side)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 10,
            neighbor_policy: NeighborPolicy::default(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

/// An entity placed at a fixed cell before the simulation starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub x: i32,
    pub y: i32,
    pub category: String,
}

impl EntitySpec {
    pub fn new(x: i32, y: i32, category: impl Into<String>) -> Self {
        Self {
            x,
            y,
            category: category.into(),
        }
    }
}

/// Entities scattered over vacant cells using the scenario seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomPlacement {
    pub count: usize,
    /// Categories assigned round-robin; empty means "Wanderer"
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Simulation scenario configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub world: WorldConfig,
    /// Number of ticks the driver runs
    pub num_ticks: u64,
    /// Random seed for reproducibility
    pub seed: u64,
    pub entities: Vec<EntitySpec>,
    pub random_entities: Option<RandomPlacement>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            num_ticks: 100,
            seed: 0,
            entities: vec![
                EntitySpec::new(2, 3, "Type A"),
                EntitySpec::new(5, 5, "Type B"),
            ],
            random_entities: None,
        }
    }
}

impl ScenarioConfig {
    /// Load a scenario from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: ScenarioConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded scenario config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.world.size <= 0 {
            return Err(Error::InvalidConfig(format!(
                "grid size must be positive, got {}",
                self.world.size
            )));
        }

        if let Some(placement) = &self.random_entities {
            let cells = self.world.cell_count();
            if placement.count > cells {
                return Err(Error::InvalidConfig(format!(
                    "cannot place {} random entities on {} cells",
                    placement.count, cells
                )));
            }
        }

        Ok(())
    }
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_filter: "info,gridsim_world=info,gridsim_store=info".to_string(),
            log_json: false,
        }
    }
}
