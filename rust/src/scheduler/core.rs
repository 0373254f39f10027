//! Scheduling coordinator: insert or update one task and recompute its project.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use std::sync::PoisonError;
use thiserror::Error;

use crate::config::{ResolutionMode, SchedulingConfig};
use crate::critical_path::{calculate_critical_path, CriticalPathError, CriticalPathResult};
use crate::implicit_dependencies::derive_implicit_dependencies;
use crate::models::{add_days, NewTask, Project, ProjectId, Resource, ResourceId, Task, TaskId};
use crate::{log_changes, log_checks};

use super::locks::ProjectLocks;
use super::notify::CriticalTaskNotifier;
use super::resource_schedule::ResourceSchedule;
use super::store::{StoreError, TaskStore};

/// Errors that can occur during scheduling.
///
/// Every variant aborts the call before the store is written.
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error(transparent)]
    CriticalPath(#[from] CriticalPathError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(
        "Resource {resource_id} ({resource_name}) is not available for {duration_days} days from {start}; held by tasks {conflicting_tasks:?}"
    )]
    ResourceNotAvailable {
        resource_id: ResourceId,
        resource_name: String,
        start: NaiveDate,
        duration_days: u32,
        conflicting_tasks: Vec<TaskId>,
    },
    #[error("Task start {expected_start} is before project start {project_start}")]
    StartBeforeProject {
        expected_start: NaiveDate,
        project_start: NaiveDate,
    },
    #[error("Invalid task: {0}")]
    InvalidTask(String),
}

/// What a successful insert/update did.
#[derive(Clone, Debug)]
pub struct ScheduleOutcome {
    /// The task as stored, with its computed schedule.
    pub task: Task,
    /// Start requested by the caller.
    pub requested_start: NaiveDate,
    /// Whether auto-resolution moved the requested start.
    pub shifted: bool,
    /// Predecessors derived from exclusive resource contention.
    pub implicit_dependencies: Vec<TaskId>,
    pub critical_path: Vec<TaskId>,
    pub project_duration_days: i64,
    /// Whether a critical-task notification was delivered.
    pub notified: bool,
}

/// Coordinates resource resolution, dependency derivation and critical path
/// recalculation for one task at a time.
pub struct Scheduler<S, N> {
    store: S,
    notifier: N,
    config: SchedulingConfig,
    locks: ProjectLocks,
}

impl<S: TaskStore, N: CriticalTaskNotifier> Scheduler<S, N> {
    pub fn new(store: S, notifier: N, config: SchedulingConfig) -> Self {
        Self {
            store,
            notifier,
            config,
            locks: ProjectLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    /// Insert a new task into a project and recompute the project schedule.
    pub fn insert_task(
        &self,
        project_id: ProjectId,
        draft: NewTask,
        mode: ResolutionMode,
    ) -> Result<ScheduleOutcome, SchedulerError> {
        let lock = self.locks.handle(project_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let project = self.store.project(project_id)?;
        let project_tasks = self.store.project_tasks(project_id)?;

        let mut task = draft.into_task(0, project_id);
        self.check_project_start(&project, task.expected_start_date)?;
        validate_task(&task, None, &project_tasks)?;

        let resources = self.load_resources(&task)?;
        let requested_start = task.expected_start_date;
        task.expected_start_date = self.resolve_start(&task, None, &resources, mode)?;

        // Only drafts that passed every check consume an id
        task.id = self.store.allocate_task_id()?;
        self.schedule_task(&project, project_tasks, task, requested_start, &resources)
    }

    /// Update an existing task and recompute the project schedule.
    ///
    /// The task's stored booking is excluded from its own resource checks.
    pub fn update_task(
        &self,
        project_id: ProjectId,
        mut task: Task,
        mode: ResolutionMode,
    ) -> Result<ScheduleOutcome, SchedulerError> {
        let lock = self.locks.handle(project_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let project = self.store.project(project_id)?;
        let project_tasks = self.store.project_tasks(project_id)?;
        if !project_tasks.iter().any(|t| t.id == task.id) {
            return Err(StoreError::TaskNotFound(task.id).into());
        }

        task.project_id = project_id;
        self.check_project_start(&project, task.expected_start_date)?;
        validate_task(&task, Some(task.id), &project_tasks)?;

        let resources = self.load_resources(&task)?;
        let requested_start = task.expected_start_date;
        task.expected_start_date =
            self.resolve_start(&task, Some(task.id), &resources, mode)?;
        self.schedule_task(&project, project_tasks, task, requested_start, &resources)
    }

    /// Recompute and store the schedule of every task in a project.
    pub fn recalculate_project(
        &self,
        project_id: ProjectId,
    ) -> Result<CriticalPathResult, SchedulerError> {
        let lock = self.locks.handle(project_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        self.store.project(project_id)?;
        let tasks = self.store.project_tasks(project_id)?;
        let result = calculate_critical_path(&tasks, &self.config.critical_path_config())?;
        self.store.save_project_tasks(project_id, &result.tasks)?;

        log_changes!(
            self.config.verbosity,
            "Recalculated project {}: {} tasks, duration {} days",
            project_id,
            result.tasks.len(),
            result.project_duration_days
        );
        Ok(result)
    }

    /// Steps shared by insert and update once the start is resolved.
    ///
    /// The project lock is held by the caller.
    fn schedule_task(
        &self,
        project: &Project,
        mut project_tasks: Vec<Task>,
        task: Task,
        requested_start: NaiveDate,
        resources: &FxHashMap<ResourceId, Resource>,
    ) -> Result<ScheduleOutcome, SchedulerError> {
        let verbosity = self.config.verbosity;
        let shifted = task.expected_start_date != requested_start;

        let derived = derive_implicit_dependencies(&task, &project_tasks, resources);
        if !derived.added.is_empty() {
            log_checks!(
                verbosity,
                "Task {} gains implicit predecessors {:?}",
                task.id,
                derived.added
            );
        }
        let task_id = task.id;

        match project_tasks.iter_mut().find(|t| t.id == task_id) {
            Some(existing) => *existing = derived.task,
            None => project_tasks.push(derived.task),
        }

        let result = calculate_critical_path(&project_tasks, &self.config.critical_path_config())?;
        self.store.save_project_tasks(project.id, &result.tasks)?;

        let task = result
            .task(task_id)
            .cloned()
            .ok_or(StoreError::TaskNotFound(task_id))?;

        log_changes!(
            verbosity,
            "Scheduled task {} in project {}: [{}, {}), critical={}",
            task.id,
            project.id,
            task.start_date(),
            task.end_date(),
            task.is_critical()
        );

        let notified = task.is_critical() && self.notify_critical(project, &task);

        Ok(ScheduleOutcome {
            task,
            requested_start,
            shifted,
            implicit_dependencies: derived.added,
            critical_path: result.critical_path,
            project_duration_days: result.project_duration_days,
            notified,
        })
    }

    fn check_project_start(
        &self,
        project: &Project,
        expected_start: NaiveDate,
    ) -> Result<(), SchedulerError> {
        if add_days(expected_start, self.config.start_date_tolerance_days) <= project.start_date {
            return Err(SchedulerError::StartBeforeProject {
                expected_start,
                project_start: project.start_date,
            });
        }
        Ok(())
    }

    fn load_resources(
        &self,
        task: &Task,
    ) -> Result<FxHashMap<ResourceId, Resource>, SchedulerError> {
        let mut resources =
            FxHashMap::with_capacity_and_hasher(task.resources.len(), Default::default());
        for &id in &task.resources {
            resources.insert(id, self.store.resource(id)?);
        }
        Ok(resources)
    }

    /// Check every required resource; reject or move the start per `mode`.
    ///
    /// Bookings span all projects, so the stored booking of the task being
    /// updated (`own_id`) is dropped by id rather than by title. An
    /// auto-resolved start is the latest of the per-resource next free dates.
    fn resolve_start(
        &self,
        task: &Task,
        own_id: Option<TaskId>,
        resources: &FxHashMap<ResourceId, Resource>,
        mode: ResolutionMode,
    ) -> Result<NaiveDate, SchedulerError> {
        let verbosity = self.config.verbosity;
        let start = task.expected_start_date;
        let duration = task.duration_days;

        let mut schedules: Vec<ResourceSchedule> = Vec::with_capacity(resources.len());
        for &id in &task.resources {
            let Some(resource) = resources.get(&id) else {
                continue;
            };
            let bookings = self.store.resource_tasks(id)?;
            let others = bookings.iter().filter(|t| Some(t.id) != own_id);
            schedules.push(ResourceSchedule::from_tasks(resource.clone(), others));
        }

        let mut blocked = false;
        for schedule in &schedules {
            let conflicts = schedule.conflicts(start, duration, None);
            if conflicts.is_empty() {
                log_checks!(
                    verbosity,
                    "  Resource {} free for task '{}' from {}",
                    schedule.resource().name,
                    task.title,
                    start
                );
                continue;
            }

            log_checks!(
                verbosity,
                "  Resource {} busy for task '{}' from {} ({} conflicts)",
                schedule.resource().name,
                task.title,
                start,
                conflicts.len()
            );

            match mode {
                ResolutionMode::Reject => {
                    return Err(SchedulerError::ResourceNotAvailable {
                        resource_id: schedule.resource().id,
                        resource_name: schedule.resource().name.clone(),
                        start,
                        duration_days: duration,
                        conflicting_tasks: conflicts.iter().map(|b| b.task_id).collect(),
                    });
                }
                ResolutionMode::AutoResolve => blocked = true,
            }
        }

        if !blocked {
            return Ok(start);
        }

        let resolved = schedules
            .iter()
            .map(|s| s.next_available_date(start, duration, None))
            .max()
            .unwrap_or(start);

        log_changes!(
            verbosity,
            "Task '{}' moved from {} to {} to free its resources",
            task.title,
            start,
            resolved
        );
        Ok(resolved)
    }

    /// Raise the critical-task event; failures are logged and swallowed.
    fn notify_critical(&self, project: &Project, task: &Task) -> bool {
        match self.notifier.task_became_critical(project, task) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    project_id = project.id,
                    task_id = task.id,
                    error = %err,
                    "critical task notification failed"
                );
                false
            }
        }
    }
}

/// Data-model invariants a task must satisfy before it is scheduled.
///
/// `stored_id` is the id of the task being updated, `None` for a new draft.
fn validate_task(
    task: &Task,
    stored_id: Option<TaskId>,
    project_tasks: &[Task],
) -> Result<(), SchedulerError> {
    if task.title.trim().is_empty() {
        return Err(SchedulerError::InvalidTask("title must not be empty".to_string()));
    }
    if task.duration_days == 0 {
        return Err(SchedulerError::InvalidTask(format!(
            "task '{}' must have a positive duration",
            task.title
        )));
    }
    if project_tasks
        .iter()
        .any(|t| Some(t.id) != stored_id && t.title == task.title)
    {
        return Err(SchedulerError::InvalidTask(format!(
            "title '{}' is already used in this project",
            task.title
        )));
    }
    if stored_id.is_some_and(|id| task.previous_tasks.contains(&id)) {
        return Err(SchedulerError::InvalidTask(format!(
            "task '{}' cannot depend on itself",
            task.title
        )));
    }
    for &pred in &task.previous_tasks {
        if !project_tasks.iter().any(|t| t.id == pred) {
            return Err(StoreError::TaskNotFound(pred).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskState;
    use crate::scheduler::notify::{NoopNotifier, NotifyError, RecordingNotifier};
    use crate::scheduler::store::InMemoryStore;

    const CRANE: ResourceId = 10;
    const OFFICE: ResourceId = 11;
    const PUMP: ResourceId = 12;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn day(offset: u32) -> NaiveDate {
        add_days(d(2025, 1, 1), offset)
    }

    fn seeded_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.add_project(Project::new(1, "house", day(0))).unwrap();
        store.add_project(Project::new(2, "garage", day(0))).unwrap();
        store.add_resource(Resource::exclusive(CRANE, "crane")).unwrap();
        store.add_resource(Resource::shared(OFFICE, "site office")).unwrap();
        store.add_resource(Resource::exclusive(PUMP, "pump")).unwrap();
        store
    }

    fn scheduler_with<N: CriticalTaskNotifier>(notifier: N) -> Scheduler<InMemoryStore, N> {
        Scheduler::new(seeded_store(), notifier, SchedulingConfig::default())
    }

    fn scheduler() -> Scheduler<InMemoryStore, RecordingNotifier> {
        scheduler_with(RecordingNotifier::new())
    }

    struct FailingNotifier;

    impl CriticalTaskNotifier for FailingNotifier {
        fn task_became_critical(&self, _: &Project, _: &Task) -> Result<(), NotifyError> {
            Err(NotifyError("mail server down".to_string()))
        }
    }

    #[test]
    fn test_insert_schedules_whole_project() {
        let s = scheduler();
        let a = s
            .insert_task(1, NewTask::new("dig", 3, day(0)), ResolutionMode::Reject)
            .unwrap();
        let b = s
            .insert_task(
                1,
                NewTask::new("pour", 2, day(0)).with_predecessors([a.task.id]),
                ResolutionMode::Reject,
            )
            .unwrap();

        assert_eq!(b.task.start_date(), day(3));
        assert_eq!(b.project_duration_days, 5);
        assert_eq!(b.critical_path, vec![a.task.id, b.task.id]);

        // Every stored task carries the recomputed schedule
        for task in s.store().project_tasks(1).unwrap() {
            assert!(task.is_critical());
        }
    }

    #[test]
    fn test_resource_conflict_auto_resolves() {
        let s = scheduler();
        let t1 = s
            .insert_task(
                1,
                NewTask::new("lift beams", 5, day(0)).with_resources([CRANE]),
                ResolutionMode::Reject,
            )
            .unwrap();

        let t2 = s
            .insert_task(
                1,
                NewTask::new("lift trusses", 3, day(0)).with_resources([CRANE]),
                ResolutionMode::AutoResolve,
            )
            .unwrap();

        assert!(t2.shifted);
        assert_eq!(t2.requested_start, day(0));
        assert_eq!(t2.task.expected_start_date, day(5));
        assert_eq!(t2.task.start_date(), day(5));
        assert_eq!(t2.implicit_dependencies, vec![t1.task.id]);
        assert!(t2.task.previous_tasks.contains(&t1.task.id));
    }

    #[test]
    fn test_resource_conflict_rejects_without_writing() {
        let s = scheduler();
        let t1 = s
            .insert_task(
                1,
                NewTask::new("lift beams", 5, day(0)).with_resources([CRANE]),
                ResolutionMode::Reject,
            )
            .unwrap();
        let before = s.store().project_tasks(1).unwrap();

        let err = s
            .insert_task(
                1,
                NewTask::new("lift trusses", 3, day(0)).with_resources([CRANE]),
                ResolutionMode::Reject,
            )
            .unwrap_err();

        match err {
            SchedulerError::ResourceNotAvailable {
                resource_id,
                conflicting_tasks,
                ..
            } => {
                assert_eq!(resource_id, CRANE);
                assert_eq!(conflicting_tasks, vec![t1.task.id]);
            }
            other => panic!("expected resource conflict, got {:?}", other),
        }
        assert_eq!(s.store().project_tasks(1).unwrap(), before);
    }

    #[test]
    fn test_conflicts_cross_project_boundaries() {
        let s = scheduler();
        s.insert_task(
            2,
            NewTask::new("garage lift", 4, day(2)).with_resources([CRANE]),
            ResolutionMode::Reject,
        )
        .unwrap();

        let outcome = s
            .insert_task(
                1,
                NewTask::new("house lift", 3, day(0)).with_resources([CRANE]),
                ResolutionMode::AutoResolve,
            )
            .unwrap();

        assert_eq!(outcome.task.expected_start_date, day(6));
        // Implicit edges stay inside the project
        assert!(outcome.implicit_dependencies.is_empty());
    }

    #[test]
    fn test_shared_resources_and_done_tasks_do_not_block() {
        let s = scheduler();
        let first = s
            .insert_task(
                1,
                NewTask::new("briefing", 5, day(0)).with_resources([OFFICE, CRANE]),
                ResolutionMode::Reject,
            )
            .unwrap();

        let mut finished = first.task.clone();
        finished.state = TaskState::Done;
        s.update_task(1, finished, ResolutionMode::Reject).unwrap();

        let second = s
            .insert_task(
                1,
                NewTask::new("planning", 2, day(1)).with_resources([OFFICE, CRANE]),
                ResolutionMode::Reject,
            )
            .unwrap();
        assert!(!second.shifted);
        assert_eq!(second.task.expected_start_date, day(1));
    }

    #[test]
    fn test_update_does_not_conflict_with_itself() {
        let s = scheduler();
        let mut task = s
            .insert_task(
                1,
                NewTask::new("lift beams", 5, day(0)).with_resources([CRANE]),
                ResolutionMode::Reject,
            )
            .unwrap()
            .task;

        task.duration_days = 7;
        let updated = s.update_task(1, task, ResolutionMode::Reject).unwrap();

        assert!(!updated.shifted);
        assert_eq!(updated.task.end_date(), day(7));
        assert_eq!(s.store().project_tasks(1).unwrap().len(), 1);
    }

    #[test]
    fn test_update_conflicts_with_same_title_in_other_project() {
        let s = scheduler();
        let garage = s
            .insert_task(
                2,
                NewTask::new("lift", 5, day(0)).with_resources([CRANE]),
                ResolutionMode::Reject,
            )
            .unwrap();
        let mut house = s
            .insert_task(
                1,
                NewTask::new("lift", 2, day(10)).with_resources([CRANE]),
                ResolutionMode::Reject,
            )
            .unwrap()
            .task;
        let before = s.store().project_tasks(1).unwrap();

        house.expected_start_date = day(0);
        let err = s.update_task(1, house, ResolutionMode::Reject).unwrap_err();

        match err {
            SchedulerError::ResourceNotAvailable {
                resource_id,
                conflicting_tasks,
                ..
            } => {
                assert_eq!(resource_id, CRANE);
                assert_eq!(conflicting_tasks, vec![garage.task.id]);
            }
            other => panic!("expected resource conflict, got {:?}", other),
        }
        assert_eq!(s.store().project_tasks(1).unwrap(), before);
    }

    #[test]
    fn test_auto_resolve_waits_for_every_resource() {
        let s = scheduler();
        let beams = s
            .insert_task(
                1,
                NewTask::new("lift beams", 5, day(0)).with_resources([CRANE]),
                ResolutionMode::Reject,
            )
            .unwrap();
        let drain = s
            .insert_task(
                1,
                NewTask::new("drain pit", 8, day(0)).with_resources([PUMP]),
                ResolutionMode::Reject,
            )
            .unwrap();

        // Crane frees up on day 5, pump on day 8
        let pour = s
            .insert_task(
                1,
                NewTask::new("pour", 2, day(0)).with_resources([CRANE, PUMP]),
                ResolutionMode::AutoResolve,
            )
            .unwrap();

        assert!(pour.shifted);
        assert_eq!(pour.task.expected_start_date, day(8));
        assert_eq!(pour.task.start_date(), day(8));
        assert_eq!(
            pour.implicit_dependencies,
            vec![beams.task.id, drain.task.id]
        );
    }

    #[test]
    fn test_rejected_inserts_do_not_consume_ids() {
        let s = scheduler();
        let first = s
            .insert_task(
                1,
                NewTask::new("lift beams", 5, day(0)).with_resources([CRANE]),
                ResolutionMode::Reject,
            )
            .unwrap();

        let rejected = vec![
            NewTask::new("zero", 0, day(0)),
            NewTask::new("early", 1, day(0).pred_opt().unwrap()),
            NewTask::new("clash", 2, day(1)).with_resources([CRANE]),
        ];
        for draft in rejected {
            assert!(s.insert_task(1, draft, ResolutionMode::Reject).is_err());
        }

        let second = s
            .insert_task(1, NewTask::new("survey", 1, day(0)), ResolutionMode::Reject)
            .unwrap();
        assert_eq!(second.task.id, first.task.id + 1);
    }

    #[test]
    fn test_project_start_boundary() {
        let s = scheduler();
        let project_start = day(0);

        let err = s
            .insert_task(
                1,
                NewTask::new("early", 1, project_start.pred_opt().unwrap()),
                ResolutionMode::Reject,
            )
            .unwrap_err();
        assert!(matches!(err, SchedulerError::StartBeforeProject { .. }));

        // Same day as the project start is accepted
        assert!(s
            .insert_task(1, NewTask::new("on time", 1, project_start), ResolutionMode::Reject)
            .is_ok());
    }

    #[test]
    fn test_cycle_aborts_without_writing() {
        let s = scheduler();
        let a = s
            .insert_task(1, NewTask::new("a", 2, day(0)), ResolutionMode::Reject)
            .unwrap();
        let b = s
            .insert_task(
                1,
                NewTask::new("b", 2, day(0)).with_predecessors([a.task.id]),
                ResolutionMode::Reject,
            )
            .unwrap();
        let before = s.store().project_tasks(1).unwrap();

        let looped = a.task.clone().with_predecessors([b.task.id]);
        let err = s.update_task(1, looped, ResolutionMode::Reject).unwrap_err();

        assert!(matches!(
            err,
            SchedulerError::CriticalPath(CriticalPathError::CircularDependency(_))
        ));
        assert_eq!(s.store().project_tasks(1).unwrap(), before);
    }

    #[test]
    fn test_invalid_tasks_are_rejected() {
        let s = scheduler();
        let a = s
            .insert_task(1, NewTask::new("a", 2, day(0)), ResolutionMode::Reject)
            .unwrap();

        let cases = vec![
            NewTask::new("  ", 2, day(0)),
            NewTask::new("zero", 0, day(0)),
            NewTask::new("a", 1, day(0)),
        ];
        for draft in cases {
            let err = s.insert_task(1, draft, ResolutionMode::Reject).unwrap_err();
            assert!(matches!(err, SchedulerError::InvalidTask(_)), "{:?}", err);
        }

        let self_ref = a.task.clone().with_predecessors([a.task.id]);
        assert!(matches!(
            s.update_task(1, self_ref, ResolutionMode::Reject).unwrap_err(),
            SchedulerError::InvalidTask(_)
        ));

        let dangling = NewTask::new("b", 1, day(0)).with_predecessors([999]);
        assert!(matches!(
            s.insert_task(1, dangling, ResolutionMode::Reject).unwrap_err(),
            SchedulerError::Store(StoreError::TaskNotFound(999))
        ));
    }

    #[test]
    fn test_not_found_propagates() {
        let s = scheduler();
        assert!(matches!(
            s.insert_task(9, NewTask::new("x", 1, day(0)), ResolutionMode::Reject)
                .unwrap_err(),
            SchedulerError::Store(StoreError::ProjectNotFound(9))
        ));
        assert!(matches!(
            s.update_task(1, Task::new(77, 1, "ghost", 1, day(0)), ResolutionMode::Reject)
                .unwrap_err(),
            SchedulerError::Store(StoreError::TaskNotFound(77))
        ));
        assert!(matches!(
            s.insert_task(
                1,
                NewTask::new("x", 1, day(0)).with_resources([404]),
                ResolutionMode::Reject
            )
            .unwrap_err(),
            SchedulerError::Store(StoreError::ResourceNotFound(404))
        ));
    }

    #[test]
    fn test_critical_tasks_are_notified() {
        let s = scheduler();
        let long = s
            .insert_task(1, NewTask::new("long", 5, day(0)), ResolutionMode::Reject)
            .unwrap();
        let short = s
            .insert_task(1, NewTask::new("short", 2, day(0)), ResolutionMode::Reject)
            .unwrap();

        assert!(long.notified);
        assert!(!short.notified);
        assert!(!short.task.is_critical());
        assert_eq!(s.notifier().events(), vec![(1, long.task.id)]);
    }

    #[test]
    fn test_notification_failure_is_not_fatal() {
        let s = scheduler_with(FailingNotifier);
        let outcome = s
            .insert_task(1, NewTask::new("solo", 3, day(0)), ResolutionMode::Reject)
            .unwrap();

        assert!(outcome.task.is_critical());
        assert!(!outcome.notified);
        assert_eq!(s.store().project_tasks(1).unwrap().len(), 1);
    }

    #[test]
    fn test_recalculate_project_after_external_change() {
        let s = scheduler_with(NoopNotifier);
        s.store()
            .add_task(Task::new(1, 1, "frame", 4, day(0)))
            .unwrap();
        s.store()
            .add_task(Task::new(2, 1, "roof", 2, day(0)).with_predecessors([1]))
            .unwrap();

        let result = s.recalculate_project(1).unwrap();
        assert_eq!(result.project_duration_days, 6);

        let roof = s.store().task(2).unwrap();
        assert_eq!(roof.start_date(), day(4));
        assert!(roof.is_critical());

        assert!(matches!(
            s.recalculate_project(2).unwrap_err(),
            SchedulerError::CriticalPath(CriticalPathError::EmptyTaskList)
        ));
    }

    #[test]
    fn test_concurrent_inserts_are_serialized() {
        let s = scheduler();

        std::thread::scope(|scope| {
            for i in 0..8 {
                let s = &s;
                scope.spawn(move || {
                    s.insert_task(
                        1,
                        NewTask::new(format!("lift {}", i), 2, day(0)).with_resources([CRANE]),
                        ResolutionMode::AutoResolve,
                    )
                    .unwrap();
                });
            }
        });

        let mut starts: Vec<NaiveDate> = s
            .store()
            .project_tasks(1)
            .unwrap()
            .iter()
            .map(|t| t.start_date())
            .collect();
        starts.sort();
        let expected: Vec<NaiveDate> = (0..8).map(|i| day(i * 2)).collect();
        assert_eq!(starts, expected);
    }
}
