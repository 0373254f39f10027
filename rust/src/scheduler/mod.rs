//! Scheduling coordinator and its collaborators.
//!
//! The coordinator resolves resource availability, derives implicit
//! dependencies and recomputes the project's critical path, then writes the
//! result back through a [`TaskStore`] in one call.

mod core;
mod locks;
mod notify;
mod resource_schedule;
mod store;

pub use core::{ScheduleOutcome, Scheduler, SchedulerError};
pub use locks::ProjectLocks;
pub use notify::{CriticalTaskNotifier, NoopNotifier, NotifyError, RecordingNotifier};
pub use resource_schedule::{Booking, ResourceSchedule};
pub use store::{InMemoryStore, StoreError, TaskStore};
