//! Persistence boundary for the scheduling coordinator.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::Mutex;
use thiserror::Error;

use crate::models::{Project, ProjectId, Resource, ResourceId, Task, TaskId};

/// Errors raised by a task store; the coordinator propagates them unmodified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("Resource not found: {0}")]
    ResourceNotFound(ResourceId),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Read/write access to projects, tasks and resources.
///
/// The coordinator reads a snapshot, computes everything in memory, and then
/// writes the whole recomputed task set of one project with a single
/// [`save_project_tasks`](TaskStore::save_project_tasks) call.
pub trait TaskStore {
    fn project(&self, id: ProjectId) -> Result<Project, StoreError>;

    /// Tasks of a project, in a stable order.
    fn project_tasks(&self, id: ProjectId) -> Result<Vec<Task>, StoreError>;

    fn resource(&self, id: ResourceId) -> Result<Resource, StoreError>;

    /// Every task referencing the resource, across all projects.
    fn resource_tasks(&self, id: ResourceId) -> Result<Vec<Task>, StoreError>;

    /// Reserve an id for a task about to be inserted.
    fn allocate_task_id(&self) -> Result<TaskId, StoreError>;

    /// Replace the stored task set of a project.
    fn save_project_tasks(&self, project_id: ProjectId, tasks: &[Task]) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct StoreState {
    projects: FxHashMap<ProjectId, Project>,
    resources: FxHashMap<ResourceId, Resource>,
    tasks: BTreeMap<TaskId, Task>,
    next_task_id: TaskId,
}

/// Thread-safe in-memory [`TaskStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> Result<T, StoreError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        Ok(f(&mut state))
    }

    pub fn add_project(&self, project: Project) -> Result<(), StoreError> {
        self.with_state(|s| {
            s.projects.insert(project.id, project);
        })
    }

    pub fn add_resource(&self, resource: Resource) -> Result<(), StoreError> {
        self.with_state(|s| {
            s.resources.insert(resource.id, resource);
        })
    }

    /// Seed a task as-is, without scheduling it.
    pub fn add_task(&self, task: Task) -> Result<(), StoreError> {
        self.with_state(|s| {
            s.next_task_id = s.next_task_id.max(task.id);
            s.tasks.insert(task.id, task);
        })
    }

    pub fn task(&self, id: TaskId) -> Result<Task, StoreError> {
        self.with_state(|s| s.tasks.get(&id).cloned())?
            .ok_or(StoreError::TaskNotFound(id))
    }
}

impl TaskStore for InMemoryStore {
    fn project(&self, id: ProjectId) -> Result<Project, StoreError> {
        self.with_state(|s| s.projects.get(&id).cloned())?
            .ok_or(StoreError::ProjectNotFound(id))
    }

    fn project_tasks(&self, id: ProjectId) -> Result<Vec<Task>, StoreError> {
        self.with_state(|s| {
            if !s.projects.contains_key(&id) {
                return Err(StoreError::ProjectNotFound(id));
            }
            Ok(s.tasks
                .values()
                .filter(|t| t.project_id == id)
                .cloned()
                .collect())
        })?
    }

    fn resource(&self, id: ResourceId) -> Result<Resource, StoreError> {
        self.with_state(|s| s.resources.get(&id).cloned())?
            .ok_or(StoreError::ResourceNotFound(id))
    }

    fn resource_tasks(&self, id: ResourceId) -> Result<Vec<Task>, StoreError> {
        self.with_state(|s| {
            s.tasks
                .values()
                .filter(|t| t.uses_resource(id))
                .cloned()
                .collect()
        })
    }

    fn allocate_task_id(&self) -> Result<TaskId, StoreError> {
        self.with_state(|s| {
            s.next_task_id += 1;
            s.next_task_id
        })
    }

    fn save_project_tasks(&self, project_id: ProjectId, tasks: &[Task]) -> Result<(), StoreError> {
        self.with_state(|s| {
            if !s.projects.contains_key(&project_id) {
                return Err(StoreError::ProjectNotFound(project_id));
            }
            s.tasks.retain(|_, t| t.project_id != project_id);
            for task in tasks {
                s.next_task_id = s.next_task_id.max(task.id);
                s.tasks.insert(task.id, task.clone());
            }
            Ok(())
        })?
    }
}
