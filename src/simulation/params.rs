use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::agent::RangePolicy;
use super::combat::CombatPolicy;
use crate::error::SimError;

/// Simulation parameters that control the arena and the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Map width in cells.
    pub map_width: i32,
    /// Map height in cells.
    pub map_height: i32,
    /// Period of the movement tick, in milliseconds.
    pub tick_millis: u64,
    /// Number of agents created by random population.
    pub population: usize,
    /// Length of a run, in seconds.
    pub duration_secs: u64,
    /// How often the map is redrawn, in milliseconds.
    pub display_interval_millis: u64,
    /// Side length of one map cell in the rendered grid.
    pub display_cell: i32,
    /// How fights are decided.
    pub combat_policy: CombatPolicy,
    /// Which radius decides whether two agents can fight.
    pub range_policy: RangePolicy,
    /// Append-only kill log.
    pub log_path: PathBuf,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            map_width: 100,
            map_height: 100,
            tick_millis: 500,
            population: 50,
            duration_secs: 30,
            display_interval_millis: 1000,
            display_cell: 10,
            combat_policy: CombatPolicy::Matrix,
            range_policy: RangePolicy::AttackerRadius,
            log_path: PathBuf::from("log.txt"),
        }
    }
}

impl Params {
    /// Rejects sizes and periods the scheduler cannot work with.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.map_width <= 0 || self.map_height <= 0 {
            return Err(SimError::InvalidParams(format!(
                "map must be at least 1x1, got {}x{}",
                self.map_width, self.map_height
            )));
        }
        if self.tick_millis == 0 {
            return Err(SimError::InvalidParams("tick_millis must be positive".into()));
        }
        if self.display_cell <= 0 {
            return Err(SimError::InvalidParams("display_cell must be positive".into()));
        }
        Ok(())
    }

    /// Movement tick period.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Map redraw period.
    pub fn display_interval(&self) -> Duration {
        Duration::from_millis(self.display_interval_millis)
    }

    /// Total run length.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| SimError::io(path, e))
    }

    /// Loads parameters from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }
}
