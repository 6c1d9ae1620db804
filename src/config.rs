//! Declarative simulation configuration, loaded from JSON.
//!
//! A configuration file maps simulation names to [`SimulationSpec`] entries:
//!
//! ```json
//! {
//!     "lattice": {
//!         "walker_type": "grid",
//!         "times_to_run": 20,
//!         "num_of_steps": 500,
//!         "n_dim": 2,
//!         "obstacles": [[3.0, 3.0]],
//!         "restart_chance": 0.01
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::error::EngineError;

pub const DEFAULT_SEED: u64 = 42;

/// The five walker variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkerKind {
    Regular,
    Step,
    Grid,
    Biased,
    Searcher,
}

/// Everything one simulation needs: walker variant, run counts, environment,
/// restart rules, per-variant knobs, and the axis/radius the statistics
/// report on. Optional fields default to "feature off".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSpec {
    pub walker_type: WalkerKind,
    pub times_to_run: usize,
    pub num_of_steps: usize,
    pub n_dim: usize,

    #[serde(default)]
    pub magic_gates_placements: Vec<Coord>,
    #[serde(default)]
    pub magic_gates_dests: Vec<Coord>,
    #[serde(default)]
    pub obstacles: Vec<Coord>,

    #[serde(default)]
    pub restart_chance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_every: Option<usize>,

    // Step walkers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_step_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_step_size: Option<f64>,

    // Biased walkers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias_direction: Option<Coord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias_strength: Option<f64>,

    // Searcher walkers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Coord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tolerance: Option<f64>,

    // Statistics selectors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Coord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,

    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl SimulationSpec {
    /// Check every scalar field. Coordinate lists are validated again by
    /// `Environment::new`; this catches everything else before any run
    /// starts, so a misconfigured walker never produces partial results.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.times_to_run == 0 {
            return Err(EngineError::config("times_to_run must be positive"));
        }
        if self.num_of_steps == 0 {
            return Err(EngineError::config("num_of_steps must be positive"));
        }
        if self.n_dim == 0 {
            return Err(EngineError::config("n_dim must be positive"));
        }
        if !(0.0..=1.0).contains(&self.restart_chance) {
            return Err(EngineError::config(
                "restart_chance must be between 0 and 1",
            ));
        }
        if self.restart_every == Some(0) {
            return Err(EngineError::config("restart_every must be positive"));
        }

        match self.walker_type {
            WalkerKind::Searcher if self.target.is_none() => {
                return Err(EngineError::config("searcher walkers need a target"));
            }
            _ => {}
        }

        if let Some(axis) = &self.axis {
            if axis.dim() != self.n_dim {
                return Err(EngineError::config(format!(
                    "axis has {} components, expected {}",
                    axis.dim(),
                    self.n_dim
                )));
            }
            if (axis.norm() - 1.0).abs() > 1e-9 {
                return Err(EngineError::config("axis must be a unit vector"));
            }
        }
        if let Some(radius) = self.radius {
            if radius <= 0.0 {
                return Err(EngineError::config("radius must be positive"));
            }
        }
        Ok(())
    }
}

/// Load and parse a configuration file. Validation happens later, per
/// simulation, so one bad entry reports its own name.
pub fn load_config(path: &Path) -> anyhow::Result<BTreeMap<String, SimulationSpec>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file {}", path.display()))?;
    let config: BTreeMap<String, SimulationSpec> = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse configuration file {}", path.display()))?;
    Ok(config)
}
