//! Resource availability tracking over task bookings.

use chrono::NaiveDate;

use crate::models::{add_days, Resource, Task, TaskId, TaskState};

/// One task's hold on a resource: `[start_date, start_date + duration_days)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Booking {
    pub task_id: TaskId,
    pub title: String,
    pub start_date: NaiveDate,
    pub duration_days: u32,
    pub state: TaskState,
}

impl Booking {
    /// Booking for a task; scheduled tasks occupy their computed start.
    pub fn from_task(task: &Task) -> Self {
        Self {
            task_id: task.id,
            title: task.title.clone(),
            start_date: task.start_date(),
            duration_days: task.duration_days,
            state: task.state,
        }
    }

    pub fn end_date(&self) -> NaiveDate {
        add_days(self.start_date, self.duration_days)
    }

    /// Half-open interval intersection with `[start, end)`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date < end && start < self.end_date()
    }

    /// Finished tasks and the excluded title never block.
    fn blocks(&self, exclude_title: Option<&str>) -> bool {
        !self.state.is_done() && exclude_title != Some(self.title.as_str())
    }
}

/// Every booking of a single resource, across all projects.
#[derive(Clone, Debug)]
pub struct ResourceSchedule {
    resource: Resource,
    bookings: Vec<Booking>,
}

impl ResourceSchedule {
    pub fn new(resource: Resource, bookings: Vec<Booking>) -> Self {
        Self { resource, bookings }
    }

    /// Build from a task snapshot, keeping only tasks that reference the resource.
    pub fn from_tasks<'a>(resource: Resource, tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let bookings = tasks
            .into_iter()
            .filter(|t| t.uses_resource(resource.id))
            .map(Booking::from_task)
            .collect();
        Self { resource, bookings }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Bookings that would collide with `[start, start + duration_days)`.
    ///
    /// Always empty for a shared resource.
    pub fn conflicts(
        &self,
        start: NaiveDate,
        duration_days: u32,
        exclude_title: Option<&str>,
    ) -> Vec<&Booking> {
        if self.resource.concurrent_usage {
            return Vec::new();
        }
        let end = add_days(start, duration_days);
        self.bookings
            .iter()
            .filter(|b| b.blocks(exclude_title) && b.overlaps(start, end))
            .collect()
    }

    /// Check if the resource is free for the full interval.
    ///
    /// `exclude_title` skips the task being re-checked against itself on update.
    pub fn is_available(
        &self,
        start: NaiveDate,
        duration_days: u32,
        exclude_title: Option<&str>,
    ) -> bool {
        if self.resource.concurrent_usage {
            return true;
        }
        let end = add_days(start, duration_days);
        !self
            .bookings
            .iter()
            .any(|b| b.blocks(exclude_title) && b.overlaps(start, end))
    }

    /// Find the first date, on or after `start`, from which the full interval is free.
    ///
    /// Advances one day at a time, so cost grows with the length of the blocked
    /// stretch rather than with the number of bookings.
    pub fn next_available_date(
        &self,
        start: NaiveDate,
        duration_days: u32,
        exclude_title: Option<&str>,
    ) -> NaiveDate {
        if self.resource.concurrent_usage {
            return start;
        }

        let mut candidate = start;
        while !self.is_available(candidate, duration_days, exclude_title) {
            match candidate.succ_opt() {
                Some(next) => candidate = next,
                None => break,
            }
        }
        candidate
    }

    /// `(start, duration)` of every booking, finished ones included.
    pub fn occupied_intervals(&self) -> Vec<(NaiveDate, u32)> {
        self.bookings
            .iter()
            .map(|b| (b.start_date, b.duration_days))
            .collect()
    }

    /// Sorted, non-overlapping `[start, end)` periods during which the resource is held.
    ///
    /// Only unfinished bookings count. Touching periods are merged.
    pub fn busy_periods(&self) -> Vec<(NaiveDate, NaiveDate)> {
        let mut periods: Vec<(NaiveDate, NaiveDate)> = self
            .bookings
            .iter()
            .filter(|b| !b.state.is_done() && b.duration_days > 0)
            .map(|b| (b.start_date, b.end_date()))
            .collect();
        periods.sort_by_key(|(start, _)| *start);

        let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(periods.len());
        for (start, end) in periods {
            match merged.last_mut() {
                Some((_, last_end)) if start <= *last_end => {
                    *last_end = (*last_end).max(end);
                }
                _ => merged.push((start, end)),
            }
        }
        merged
    }
}
