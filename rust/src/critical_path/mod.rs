//! Critical path calculation.
//!
//! Computes earliest and latest dates for every task of a project with a
//! forward and a backward pass over the precedence graph, derives slack, and
//! extracts the chain of zero-slack tasks that bounds the project duration.

mod calculation;
mod path;
mod types;

pub use calculation::{
    calculate_critical_path, calculate_critical_path_snapshot, CriticalPathError,
};
pub use types::{CriticalPathConfig, CriticalPathResult, TaskTiming};
