use std::time::{Duration, Instant};
use crate::models::{Priority, Task};
use crate::validate::time_to_minutes;

/// Sort orders for the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Newest first by creation date and time.
    #[default]
    Created,
    /// High priority first; tasks without a priority last.
    Priority,
    /// Ascending end time; tasks without one last.
    Time,
}

impl SortBy {
    pub fn parse(s: &str) -> Option<SortBy> {
        match s {
            "created" => Some(SortBy::Created),
            "priority" => Some(SortBy::Priority),
            "time" => Some(SortBy::Time),
            _ => None,
        }
    }
}

/// Active filters and sort order for the task list view.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub emergency: bool,
    pub priority: Option<Priority>,
    pub sort_by: SortBy,
}

impl FilterState {
    pub fn clear(&mut self) {
        self.emergency = false;
        self.priority = None;
    }
}

/// Keeps tasks matching the active emergency and priority filters.
pub fn apply_filters(tasks: Vec<Task>, state: &FilterState) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|t| !state.emergency || t.emergency)
        .filter(|t| state.priority.map_or(true, |p| t.priority == Some(p)))
        .collect()
}

/// Sorts tasks according to `sort_by`. The sort is stable.
pub fn apply_sorting(tasks: &mut [Task], sort_by: SortBy) {
    match sort_by {
        SortBy::Created => {
            tasks.sort_by(|a, b| {
                (b.created_date, &b.created_time).cmp(&(a.created_date, &a.created_time))
            });
        }
        SortBy::Priority => {
            tasks.sort_by_key(|t| t.priority.map(Priority::order).unwrap_or(4));
        }
        SortBy::Time => {
            tasks.sort_by_key(|t| {
                t.end_time
                    .as_deref()
                    .and_then(time_to_minutes)
                    .unwrap_or(9999)
            });
        }
    }
}

/// Case-insensitive substring search over task titles and memos. An
/// empty or whitespace query matches everything.
pub fn search_tasks(tasks: Vec<Task>, query: &str) -> Vec<Task> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return tasks;
    }
    tasks
        .into_iter()
        .filter(|t| {
            t.text.to_lowercase().contains(&query)
                || t.memo
                    .as_deref()
                    .is_some_and(|m| m.to_lowercase().contains(&query))
        })
        .collect()
}

/// Suppresses recomputation while input is still arriving: each
/// submission supersedes the pending one, and the latest value is
/// released once the quiet period has elapsed with no newer input.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<(Instant, String)>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Debouncer {
        Debouncer { quiet, pending: None }
    }

    /// Records `value` at `now`, cancelling any pending value.
    pub fn submit(&mut self, value: String, now: Instant) {
        self.pending = Some((now, value));
    }

    /// Releases the pending value if the quiet period has elapsed.
    /// Fires at most once per submission.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((submitted, _)) if now.duration_since(*submitted) >= self.quiet => {
                self.pending.take().map(|(_, value)| value)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
