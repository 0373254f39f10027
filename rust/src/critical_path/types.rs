//! Types for critical path calculation.

use chrono::NaiveDate;

use crate::models::{Task, TaskId, TaskSchedule};

/// Configuration for the critical path calculation.
#[derive(Clone, Debug, PartialEq)]
pub struct CriticalPathConfig {
    /// Tasks with `|slack|` below this many days are critical.
    pub slack_tolerance: f64,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for CriticalPathConfig {
    fn default() -> Self {
        Self {
            slack_tolerance: 1e-4,
            verbosity: 0,
        }
    }
}

impl CriticalPathConfig {
    pub fn is_critical(&self, slack_days: f64) -> bool {
        slack_days.abs() < self.slack_tolerance
    }
}

/// Per-task timing produced by the forward and backward passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskTiming {
    /// Earliest start (forward pass).
    pub start_date: NaiveDate,
    /// Earliest finish (forward pass).
    pub end_date: NaiveDate,
    /// Latest allowable start (backward pass).
    pub latest_start: NaiveDate,
    /// Latest allowable finish (backward pass).
    pub latest_finish: NaiveDate,
}

impl TaskTiming {
    /// Slack = latest_start - start_date, in days.
    pub fn slack_days(&self) -> f64 {
        (self.latest_start - self.start_date).num_days() as f64
    }

    pub fn to_schedule(self, config: &CriticalPathConfig) -> TaskSchedule {
        let slack_days = self.slack_days();
        TaskSchedule {
            start_date: self.start_date,
            end_date: self.end_date,
            latest_start: self.latest_start,
            latest_finish: self.latest_finish,
            slack_days,
            is_critical: config.is_critical(slack_days),
        }
    }
}

/// Result of a critical path calculation over a whole project.
#[derive(Clone, Debug)]
pub struct CriticalPathResult {
    /// Every input task, in input order, with `schedule` filled in.
    pub tasks: Vec<Task>,
    /// Chains of critical tasks, concatenated in path order.
    pub critical_path: Vec<TaskId>,
    /// Every task with (near-)zero slack, in input order.
    pub critical_tasks: Vec<TaskId>,
    /// `max(end_date) - min(start_date)` across all tasks, in days.
    pub project_duration_days: i64,
}

impl CriticalPathResult {
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn schedule(&self, id: TaskId) -> Option<&TaskSchedule> {
        self.task(id).and_then(|t| t.schedule.as_ref())
    }

    pub fn is_critical(&self, id: TaskId) -> bool {
        self.critical_tasks.contains(&id)
    }
}
