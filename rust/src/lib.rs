//! Project scheduling core: critical path analysis, resource availability and
//! implicit dependency derivation.
//!
//! The crate is usable directly from Rust; the `python` feature adds PyO3
//! bindings over the stateless algorithms.

pub mod config;
pub mod critical_path;
pub mod implicit_dependencies;
mod interner;
pub mod logging;
pub mod models;
pub mod scheduler;

#[cfg(feature = "python")]
mod python;

pub use config::{ResolutionMode, SchedulingConfig};
pub use critical_path::{
    calculate_critical_path, calculate_critical_path_snapshot, CriticalPathConfig,
    CriticalPathError, CriticalPathResult, TaskTiming,
};
pub use implicit_dependencies::{derive_implicit_dependencies, ImplicitDependencies};
pub use models::{
    NewTask, Project, ProjectId, Resource, ResourceId, Task, TaskId, TaskSchedule, TaskState,
};
pub use scheduler::{
    Booking, CriticalTaskNotifier, InMemoryStore, NoopNotifier, NotifyError, ProjectLocks,
    RecordingNotifier, ResourceSchedule, ScheduleOutcome, Scheduler, SchedulerError, StoreError,
    TaskStore,
};
