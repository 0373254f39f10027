//! Implicit dependency derivation from exclusive resource contention.
//!
//! Once a task's edges have been augmented here, resource exclusivity is part of
//! the precedence graph and the critical path calculation needs no separate
//! notion of resource conflicts.

use rustc_hash::FxHashMap;

use crate::models::{Resource, ResourceId, Task, TaskId};

/// Result of augmenting a task's predecessor set.
#[derive(Clone, Debug, PartialEq)]
pub struct ImplicitDependencies {
    /// The input task with derived predecessors added.
    pub task: Task,
    /// Predecessors that were not already declared, in project order.
    pub added: Vec<TaskId>,
}

/// Resource ids of `task` that are known and exclusive.
fn exclusive_resources<'a>(
    task: &'a Task,
    resources: &'a FxHashMap<ResourceId, Resource>,
) -> impl Iterator<Item = ResourceId> + 'a {
    task.resources
        .iter()
        .copied()
        .filter(|id| resources.get(id).is_some_and(|r| !r.concurrent_usage))
}

/// Add a precedence edge from every project task that shares an exclusive
/// resource with `task` and was requested to start strictly earlier.
///
/// Additive only: declared predecessors are never removed. Resources missing
/// from `resources` are not treated as exclusive.
///
/// # Arguments
/// * `task` - The task being inserted or updated
/// * `project_tasks` - Current tasks of the project (`task` itself is skipped by id)
/// * `resources` - Resource catalog keyed by id
pub fn derive_implicit_dependencies(
    task: &Task,
    project_tasks: &[Task],
    resources: &FxHashMap<ResourceId, Resource>,
) -> ImplicitDependencies {
    let mut augmented = task.clone();
    let mut added: Vec<TaskId> = Vec::new();

    let exclusive: Vec<ResourceId> = exclusive_resources(task, resources).collect();
    if exclusive.is_empty() {
        return ImplicitDependencies {
            task: augmented,
            added,
        };
    }

    for other in project_tasks {
        if other.id == task.id || other.expected_start_date >= task.expected_start_date {
            continue;
        }
        if !exclusive.iter().any(|&r| other.uses_resource(r)) {
            continue;
        }
        if augmented.previous_tasks.insert(other.id) {
            added.push(other.id);
        }
    }

    ImplicitDependencies {
        task: augmented,
        added,
    }
}
