//! Per-project serialization of scheduling calls.
//!
//! A recalculation rewrites computed fields on every task of a project, so two
//! calls against the same project must not interleave. Calls against different
//! projects proceed in parallel.

use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::models::ProjectId;

#[derive(Debug, Default)]
pub struct ProjectLocks {
    locks: Mutex<FxHashMap<ProjectId, Arc<Mutex<()>>>>,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for a project, created on first use.
    pub fn handle(&self, project_id: ProjectId) -> Arc<Mutex<()>> {
        // The map only ever grows; a poisoned guard still holds a consistent map
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(project_id).or_default())
    }
}
