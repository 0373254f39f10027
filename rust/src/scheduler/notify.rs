//! Notification hook for tasks that land on the critical path.

use std::sync::Mutex;
use thiserror::Error;

use crate::models::{Project, ProjectId, Task, TaskId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);

/// Receives "task X became critical in project P" events.
///
/// Delivery is the implementor's concern; the coordinator only decides whether
/// to raise the event and ignores failures.
pub trait CriticalTaskNotifier {
    fn task_became_critical(&self, project: &Project, task: &Task) -> Result<(), NotifyError>;
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

impl CriticalTaskNotifier for NoopNotifier {
    fn task_became_critical(&self, _project: &Project, _task: &Task) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(ProjectId, TaskId)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(ProjectId, TaskId)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl CriticalTaskNotifier for RecordingNotifier {
    fn task_became_critical(&self, project: &Project, task: &Task) -> Result<(), NotifyError> {
        self.events
            .lock()
            .map_err(|_| NotifyError("event log poisoned".to_string()))?
            .push((project.id, task.id));
        Ok(())
    }
}
