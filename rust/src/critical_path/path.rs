//! Critical path extraction from computed timings.

use crate::interner::TaskSlot;
use crate::models::TaskId;

use super::calculation::{CriticalPathError, TaskGraph};
use super::types::TaskTiming;

/// Walk chains of critical tasks and concatenate them into a single path.
///
/// Chains start at critical tasks without a critical predecessor, earliest
/// start first (input order breaks ties). Each chain greedily follows the first
/// unvisited critical task listing the current one as a predecessor, so of two
/// equally critical parallel branches only the first one reached is walked.
pub(crate) fn extract_critical_path(
    graph: &TaskGraph<'_>,
    timings: &[TaskTiming],
    critical: &[bool],
) -> Result<Vec<TaskId>, CriticalPathError> {
    let critical_slots: Vec<usize> = (0..graph.len()).filter(|&idx| critical[idx]).collect();
    if critical_slots.is_empty() {
        return Err(CriticalPathError::NoCriticalTasks);
    }

    let mut starts: Vec<usize> = critical_slots
        .iter()
        .copied()
        .filter(|&idx| {
            !graph.predecessors[idx]
                .iter()
                .any(|&pred| critical[pred as usize])
        })
        .collect();
    // Stable sort keeps input order among equal start dates
    starts.sort_by_key(|&idx| timings[idx].start_date);

    if starts.is_empty() {
        // Every critical task has a critical predecessor: impossible in a DAG
        if let Some(&earliest) = critical_slots
            .iter()
            .min_by_key(|&&idx| timings[idx].start_date)
        {
            starts.push(earliest);
        }
    }

    let mut visited = vec![false; graph.len()];
    let mut path: Vec<TaskId> = Vec::with_capacity(critical_slots.len());

    for start in starts {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        path.push(graph.tasks[start].id);

        let mut current = start as TaskSlot;
        while let Some(&next) = critical_slots
            .iter()
            .find(|&&idx| !visited[idx] && graph.predecessors[idx].contains(&current))
        {
            visited[next] = true;
            path.push(graph.tasks[next].id);
            current = next as TaskSlot;
        }
    }

    Ok(path)
}
