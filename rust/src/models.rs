//! Core data types for the scheduling system.
//!
//! These are the snapshot types exchanged with the persistence collaborator.
//! The scheduling core reads them, fills in [`TaskSchedule`] and hands them back;
//! it never creates or deletes entities itself.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type TaskId = u64;
pub type ResourceId = u64;
pub type ProjectId = u64;

/// Add whole days to a date, clamped to [`NaiveDate::MAX`].
pub(crate) fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Subtract whole days from a date, clamped to [`NaiveDate::MIN`].
pub(crate) fn sub_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Workflow state of a task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    #[default]
    Todo,
    Doing,
    /// Finished tasks no longer occupy their resources.
    Done,
}

impl TaskState {
    pub fn is_done(self) -> bool {
        matches!(self, TaskState::Done)
    }
}

/// Schedule attributes computed by the critical path calculation.
///
/// Replaced wholesale on every recalculation of the owning project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskSchedule {
    /// Earliest start (forward pass).
    pub start_date: NaiveDate,
    /// `start_date + duration`.
    pub end_date: NaiveDate,
    pub latest_start: NaiveDate,
    pub latest_finish: NaiveDate,
    /// `latest_start - start_date`, in days.
    pub slack_days: f64,
    pub is_critical: bool,
}

/// A work item inside a project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub title: String,
    pub duration_days: u32,
    /// Start requested by the caller; scheduling may push it forward.
    pub expected_start_date: NaiveDate,
    #[serde(default)]
    pub state: TaskState,
    #[serde(default)]
    pub resources: BTreeSet<ResourceId>,
    /// Precedence edges: this task cannot start before these finish.
    #[serde(default)]
    pub previous_tasks: BTreeSet<TaskId>,
    /// Informational only, never a scheduling constraint.
    #[serde(default)]
    pub same_time_tasks: BTreeSet<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<TaskSchedule>,
}

impl Task {
    pub fn new(
        id: TaskId,
        project_id: ProjectId,
        title: impl Into<String>,
        duration_days: u32,
        expected_start_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            project_id,
            title: title.into(),
            duration_days,
            expected_start_date,
            state: TaskState::Todo,
            resources: BTreeSet::new(),
            previous_tasks: BTreeSet::new(),
            same_time_tasks: BTreeSet::new(),
            schedule: None,
        }
    }

    pub fn with_predecessors(mut self, ids: impl IntoIterator<Item = TaskId>) -> Self {
        self.previous_tasks.extend(ids);
        self
    }

    pub fn with_resources(mut self, ids: impl IntoIterator<Item = ResourceId>) -> Self {
        self.resources.extend(ids);
        self
    }

    pub fn with_state(mut self, state: TaskState) -> Self {
        self.state = state;
        self
    }

    /// Computed start if the task has been scheduled, otherwise the requested start.
    pub fn start_date(&self) -> NaiveDate {
        self.schedule
            .as_ref()
            .map(|s| s.start_date)
            .unwrap_or(self.expected_start_date)
    }

    pub fn end_date(&self) -> NaiveDate {
        add_days(self.start_date(), self.duration_days)
    }

    pub fn is_critical(&self) -> bool {
        self.schedule.as_ref().is_some_and(|s| s.is_critical)
    }

    pub fn uses_resource(&self, resource_id: ResourceId) -> bool {
        self.resources.contains(&resource_id)
    }
}

/// Insert-time draft of a task; the id is assigned by the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub duration_days: u32,
    pub expected_start_date: NaiveDate,
    #[serde(default)]
    pub state: TaskState,
    #[serde(default)]
    pub resources: BTreeSet<ResourceId>,
    #[serde(default)]
    pub previous_tasks: BTreeSet<TaskId>,
    #[serde(default)]
    pub same_time_tasks: BTreeSet<TaskId>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, duration_days: u32, expected_start_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            duration_days,
            expected_start_date,
            state: TaskState::Todo,
            resources: BTreeSet::new(),
            previous_tasks: BTreeSet::new(),
            same_time_tasks: BTreeSet::new(),
        }
    }

    pub fn with_predecessors(mut self, ids: impl IntoIterator<Item = TaskId>) -> Self {
        self.previous_tasks.extend(ids);
        self
    }

    pub fn with_resources(mut self, ids: impl IntoIterator<Item = ResourceId>) -> Self {
        self.resources.extend(ids);
        self
    }

    pub fn into_task(self, id: TaskId, project_id: ProjectId) -> Task {
        Task {
            id,
            project_id,
            title: self.title,
            duration_days: self.duration_days,
            expected_start_date: self.expected_start_date,
            state: self.state,
            resources: self.resources,
            previous_tasks: self.previous_tasks,
            same_time_tasks: self.same_time_tasks,
            schedule: None,
        }
    }
}

/// Something a task needs to run: a person, a machine, a room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    /// Shared resources never block scheduling.
    #[serde(default)]
    pub concurrent_usage: bool,
}

impl Resource {
    pub fn exclusive(id: ResourceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            concurrent_usage: false,
        }
    }

    pub fn shared(id: ResourceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            concurrent_usage: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub start_date: NaiveDate,
}

impl Project {
    pub fn new(id: ProjectId, name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id,
            name: name.into(),
            start_date,
        }
    }
}
