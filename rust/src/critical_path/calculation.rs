//! Critical path calculation using forward and backward passes.

use chrono::{Days, NaiveDate};
use std::collections::VecDeque;
use thiserror::Error;

use crate::interner::{TaskIndex, TaskSlot};
use crate::models::{sub_days, Task, TaskId};
use crate::{log_changes, log_debug};

use super::path::extract_critical_path;
use super::types::{CriticalPathConfig, CriticalPathResult, TaskTiming};

/// Error types for critical path calculation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriticalPathError {
    #[error("Task list is missing")]
    NullTaskList,
    #[error("Task list is empty")]
    EmptyTaskList,
    /// Carries the tasks left unordered: members of a cycle and everything downstream of one.
    #[error("Circular dependency detected among tasks {0:?}")]
    CircularDependency(Vec<TaskId>),
    #[error("No critical task could be identified")]
    NoCriticalTasks,
    #[error("Task {0} appears more than once in the task list")]
    DuplicateTask(TaskId),
    #[error("Task {task} depends on unknown task {predecessor}")]
    UnknownPredecessor { task: TaskId, predecessor: TaskId },
    #[error("Task {0} would finish past the last representable date")]
    DateOutOfRange(TaskId),
}

/// Precedence graph over a task list, stored as an arena indexed by slot.
///
/// Slot `i` is the i-th task of the input slice.
pub(crate) struct TaskGraph<'a> {
    pub index: TaskIndex,
    pub tasks: Vec<&'a Task>,
    /// Predecessor slots, indexed by slot.
    pub predecessors: Vec<Vec<TaskSlot>>,
    /// Successor slots (tasks listing this one as a predecessor), indexed by slot.
    pub successors: Vec<Vec<TaskSlot>>,
}

impl<'a> TaskGraph<'a> {
    pub fn build(tasks: &'a [Task]) -> Result<Self, CriticalPathError> {
        let mut index = TaskIndex::with_capacity(tasks.len());
        for task in tasks {
            index
                .insert(task.id)
                .map_err(|_| CriticalPathError::DuplicateTask(task.id))?;
        }

        let n = tasks.len();
        let mut predecessors: Vec<Vec<TaskSlot>> = vec![Vec::new(); n];
        let mut successors: Vec<Vec<TaskSlot>> = vec![Vec::new(); n];

        for (idx, task) in tasks.iter().enumerate() {
            for &pred_id in &task.previous_tasks {
                let pred = index
                    .slot(pred_id)
                    .ok_or(CriticalPathError::UnknownPredecessor {
                        task: task.id,
                        predecessor: pred_id,
                    })?;
                predecessors[idx].push(pred);
                successors[pred as usize].push(idx as TaskSlot);
            }
        }

        Ok(Self {
            index,
            tasks: tasks.iter().collect(),
            predecessors,
            successors,
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_terminal(&self, slot: usize) -> bool {
        self.successors[slot].is_empty()
    }

    /// Perform topological sort using Kahn's algorithm.
    ///
    /// Returns slots ordered so every task comes after all its predecessors.
    /// Nodes left with positive in-degree once the queue drains are on or behind a cycle.
    pub fn topological_order(&self) -> Result<Vec<TaskSlot>, CriticalPathError> {
        let n = self.len();
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(Vec::len).collect();

        // Seed in input order so ties resolve deterministically
        let mut queue: VecDeque<TaskSlot> = (0..n)
            .filter(|&idx| in_degree[idx] == 0)
            .map(|idx| idx as TaskSlot)
            .collect();

        let mut order: Vec<TaskSlot> = Vec::with_capacity(n);

        while let Some(slot) = queue.pop_front() {
            order.push(slot);
            for &succ in &self.successors[slot as usize] {
                let degree = &mut in_degree[succ as usize];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(succ);
                }
            }
        }

        if order.len() != n {
            let unresolved: Vec<TaskId> = in_degree
                .iter()
                .enumerate()
                .filter(|(_, &degree)| degree > 0)
                .filter_map(|(idx, _)| self.index.id(idx as TaskSlot))
                .collect();
            return Err(CriticalPathError::CircularDependency(unresolved));
        }

        Ok(order)
    }
}

/// Forward pass: earliest start/finish per slot.
///
/// Tasks without predecessors start on their requested date; all others start
/// when their last predecessor finishes. A finish past the end of the calendar
/// is an error.
fn forward_pass(
    graph: &TaskGraph<'_>,
    order: &[TaskSlot],
    verbosity: u8,
) -> Result<Vec<(NaiveDate, NaiveDate)>, CriticalPathError> {
    let mut earliest: Vec<(NaiveDate, NaiveDate)> = graph
        .tasks
        .iter()
        .map(|t| (t.expected_start_date, t.expected_start_date))
        .collect();

    for &slot in order {
        let idx = slot as usize;
        let task = graph.tasks[idx];

        let start = graph.predecessors[idx]
            .iter()
            .map(|&pred| earliest[pred as usize].1)
            .max()
            .unwrap_or(task.expected_start_date);
        let end = start
            .checked_add_days(Days::new(u64::from(task.duration_days)))
            .ok_or(CriticalPathError::DateOutOfRange(task.id))?;
        earliest[idx] = (start, end);

        log_debug!(verbosity, "  forward: task {} [{}, {})", task.id, start, end);
    }

    Ok(earliest)
}

/// Backward pass: latest start/finish per slot.
///
/// Terminal tasks must finish by the latest terminal finish; everything else
/// must finish before its earliest-starting successor's latest start.
fn backward_pass(
    graph: &TaskGraph<'_>,
    order: &[TaskSlot],
    earliest: &[(NaiveDate, NaiveDate)],
    verbosity: u8,
) -> Vec<(NaiveDate, NaiveDate)> {
    let project_finish = (0..graph.len())
        .filter(|&idx| graph.is_terminal(idx))
        .map(|idx| earliest[idx].1)
        .max();

    let mut latest: Vec<(NaiveDate, NaiveDate)> = earliest.to_vec();

    // Reverse topological order: every successor is final before its predecessors
    for &slot in order.iter().rev() {
        let idx = slot as usize;
        let task = graph.tasks[idx];

        let latest_finish = graph.successors[idx]
            .iter()
            .map(|&succ| latest[succ as usize].0)
            .min()
            .or(project_finish)
            .unwrap_or(earliest[idx].1);
        let latest_start = sub_days(latest_finish, task.duration_days);
        latest[idx] = (latest_start, latest_finish);

        log_debug!(
            verbosity,
            "  backward: task {} latest [{}, {})",
            task.id,
            latest_start,
            latest_finish
        );
    }

    latest
}

/// Run both passes, returning timings indexed by slot.
pub(crate) fn compute_timings(
    graph: &TaskGraph<'_>,
    verbosity: u8,
) -> Result<Vec<TaskTiming>, CriticalPathError> {
    let order = graph.topological_order()?;
    let earliest = forward_pass(graph, &order, verbosity)?;
    let latest = backward_pass(graph, &order, &earliest, verbosity);

    Ok(earliest
        .into_iter()
        .zip(latest)
        .map(|((start_date, end_date), (latest_start, latest_finish))| TaskTiming {
            start_date,
            end_date,
            latest_start,
            latest_finish,
        })
        .collect())
}

/// Calculate earliest/latest dates, slack and the critical path for a project.
///
/// # Arguments
/// * `tasks` - Every task of the project; predecessors must refer to tasks in this list
/// * `config` - Slack tolerance and verbosity
///
/// # Returns
/// * `Ok(CriticalPathResult)` with every task's `schedule` filled in
/// * `Err(CriticalPathError::EmptyTaskList)` if `tasks` is empty
/// * `Err(CriticalPathError::CircularDependency)` if the precedence graph has cycles
pub fn calculate_critical_path(
    tasks: &[Task],
    config: &CriticalPathConfig,
) -> Result<CriticalPathResult, CriticalPathError> {
    if tasks.is_empty() {
        return Err(CriticalPathError::EmptyTaskList);
    }

    let graph = TaskGraph::build(tasks)?;
    let timings = compute_timings(&graph, config.verbosity)?;

    let mut scheduled: Vec<Task> = tasks.to_vec();
    let mut critical: Vec<bool> = vec![false; tasks.len()];
    let mut critical_tasks: Vec<TaskId> = Vec::new();

    for (idx, task) in scheduled.iter_mut().enumerate() {
        let schedule = timings[idx].to_schedule(config);
        if schedule.is_critical {
            critical[idx] = true;
            critical_tasks.push(task.id);
        }
        task.schedule = Some(schedule);
    }

    let critical_path = extract_critical_path(&graph, &timings, &critical)?;

    let first_start = timings.iter().map(|t| t.start_date).min();
    let last_end = timings.iter().map(|t| t.end_date).max();
    let project_duration_days = match (first_start, last_end) {
        (Some(start), Some(end)) => (end - start).num_days(),
        _ => 0,
    };

    log_changes!(
        config.verbosity,
        "Critical path over {} tasks: {} critical, duration {} days",
        tasks.len(),
        critical_tasks.len(),
        project_duration_days
    );

    Ok(CriticalPathResult {
        tasks: scheduled,
        critical_path,
        critical_tasks,
        project_duration_days,
    })
}

/// Host-facing entry point: a missing task list is an error of its own.
pub fn calculate_critical_path_snapshot(
    tasks: Option<&[Task]>,
    config: &CriticalPathConfig,
) -> Result<CriticalPathResult, CriticalPathError> {
    match tasks {
        Some(tasks) => calculate_critical_path(tasks, config),
        None => Err(CriticalPathError::NullTaskList),
    }
}
