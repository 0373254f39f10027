//! PyO3 bindings over the stateless algorithms.
//!
//! Tasks and resources cross the boundary as JSON so the host keeps its own
//! models; results come back as JSON strings.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde_json::json;

use crate::critical_path::{calculate_critical_path_snapshot, CriticalPathConfig};
use crate::models::{Resource, Task};
use crate::scheduler::ResourceSchedule;

fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_tasks(tasks_json: &str) -> PyResult<Vec<Task>> {
    serde_json::from_str(tasks_json).map_err(value_error)
}

fn parse_schedule(resource_json: &str, tasks_json: &str) -> PyResult<ResourceSchedule> {
    let resource: Resource = serde_json::from_str(resource_json).map_err(value_error)?;
    let tasks = parse_tasks(tasks_json)?;
    Ok(ResourceSchedule::from_tasks(resource, &tasks))
}

/// Compute the critical path of a task snapshot.
///
/// # Arguments
/// * `tasks_json` - JSON array of tasks; `None` is rejected like an absent list
/// * `slack_tolerance` - Slack (in days) below which a task counts as critical
///
/// # Returns
/// * JSON object with `tasks`, `critical_path`, `critical_tasks` and
///   `project_duration_days`
///
/// # Raises
/// * ValueError on malformed input, cycles, or when no task is critical
#[pyfunction]
#[pyo3(signature = (tasks_json=None, slack_tolerance=1e-4))]
fn compute_critical_path(tasks_json: Option<&str>, slack_tolerance: f64) -> PyResult<String> {
    let tasks = tasks_json.map(parse_tasks).transpose()?;
    let config = CriticalPathConfig {
        slack_tolerance,
        ..CriticalPathConfig::default()
    };

    let result =
        calculate_critical_path_snapshot(tasks.as_deref(), &config).map_err(value_error)?;
    let body = json!({
        "tasks": result.tasks,
        "critical_path": result.critical_path,
        "critical_tasks": result.critical_tasks,
        "project_duration_days": result.project_duration_days,
    });
    Ok(body.to_string())
}

/// Earliest date at or after `start` when the resource is free for the duration.
#[pyfunction]
#[pyo3(signature = (resource_json, tasks_json, start, duration_days, exclude_title=None))]
fn next_available_date(
    resource_json: &str,
    tasks_json: &str,
    start: NaiveDate,
    duration_days: u32,
    exclude_title: Option<&str>,
) -> PyResult<NaiveDate> {
    let schedule = parse_schedule(resource_json, tasks_json)?;
    Ok(schedule.next_available_date(start, duration_days, exclude_title))
}

/// Whether the resource is free over `[start, start + duration_days)`.
#[pyfunction]
#[pyo3(signature = (resource_json, tasks_json, start, duration_days, exclude_title=None))]
fn is_resource_available(
    resource_json: &str,
    tasks_json: &str,
    start: NaiveDate,
    duration_days: u32,
    exclude_title: Option<&str>,
) -> PyResult<bool> {
    let schedule = parse_schedule(resource_json, tasks_json)?;
    Ok(schedule.is_available(start, duration_days, exclude_title))
}

/// The plansched_rust Python module.
#[pymodule]
fn plansched_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compute_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(next_available_date, m)?)?;
    m.add_function(wrap_pyfunction!(is_resource_available, m)?)?;
    Ok(())
}
