//! Configuration types for the scheduling system.

use serde::{Deserialize, Serialize};

use crate::critical_path::CriticalPathConfig;

/// What to do when a requested interval collides with an exclusive resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Fail with `ResourceNotAvailable`.
    #[default]
    Reject,
    /// Move the requested start to the first date every resource is free.
    AutoResolve,
}

/// Configuration for the scheduling coordinator and its calculations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Tasks whose slack magnitude is below this many days are critical.
    pub slack_tolerance_days: f64,
    /// A task is rejected when `expected_start + tolerance <= project start`.
    pub start_date_tolerance_days: u32,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            slack_tolerance_days: 1e-4,
            start_date_tolerance_days: 1,
            verbosity: 0,
        }
    }
}

impl SchedulingConfig {
    /// Extract the critical path calculation settings.
    pub fn critical_path_config(&self) -> CriticalPathConfig {
        CriticalPathConfig {
            slack_tolerance: self.slack_tolerance_days,
            verbosity: self.verbosity,
        }
    }
}
