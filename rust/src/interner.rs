//! Dense indexing of task ids.
//!
//! The task graph is stored as an arena: every task id maps to a compact
//! `u32` slot and adjacency is kept in `Vec`s indexed by that slot.

use rustc_hash::FxHashMap;

use crate::models::TaskId;

/// Arena slot of a task (u32 for compact storage and fast hashing).
pub type TaskSlot = u32;

/// Bidirectional mapping between task ids and arena slots.
#[derive(Debug, Clone)]
pub struct TaskIndex {
    to_slot: FxHashMap<TaskId, TaskSlot>,
    from_slot: Vec<TaskId>,
}

impl TaskIndex {
    /// Create a new index with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_slot: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_slot: Vec::with_capacity(capacity),
        }
    }

    /// Insert a task id, returning its slot.
    ///
    /// Returns `Err(existing_slot)` if the id was already present.
    pub fn insert(&mut self, id: TaskId) -> Result<TaskSlot, TaskSlot> {
        if let Some(&slot) = self.to_slot.get(&id) {
            return Err(slot);
        }
        let slot = self.from_slot.len() as TaskSlot;
        self.from_slot.push(id);
        self.to_slot.insert(id, slot);
        Ok(slot)
    }

    #[inline]
    pub fn slot(&self, id: TaskId) -> Option<TaskSlot> {
        self.to_slot.get(&id).copied()
    }

    #[inline]
    pub fn id(&self, slot: TaskSlot) -> Option<TaskId> {
        self.from_slot.get(slot as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_resolve() {
        let mut index = TaskIndex::with_capacity(4);

        let a = index.insert(40).unwrap();
        let b = index.insert(7).unwrap();

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(index.insert(40), Err(a)); // duplicate keeps first slot
        assert_eq!(index.id(b), Some(7));
        assert_eq!(index.slot(40), Some(0));
        assert_eq!(index.slot(99), None);
    }
}
