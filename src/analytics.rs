use chrono::{Datelike, Duration, NaiveDate};
use crate::models::Task;

/// Minutes in one day.
pub const DAY_MINUTES: u32 = 24 * 60;

/// A date range statistics are aggregated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Day,
    Week,
    Month,
}

/// Returns the inclusive date range for `scope` around `reference`.
///
/// Day is the reference itself; Week runs Monday through Sunday
/// containing the reference; Month runs first through last calendar day
/// of the reference's month.
pub fn scope_range(scope: Scope, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    match scope {
        Scope::Day => (reference, reference),
        Scope::Week => {
            let start = reference
                - Duration::days(reference.weekday().num_days_from_monday() as i64);
            (start, start + Duration::days(6))
        }
        Scope::Month => (month_start(reference), month_end(reference)),
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_end(date: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|d| d - Duration::days(1))
        .unwrap_or(date)
}

/// Counts completed tasks whose created date falls inside the scope.
pub fn completed_count(tasks: &[Task], scope: Scope, reference: NaiveDate) -> usize {
    let (start, end) = scope_range(scope, reference);
    tasks
        .iter()
        .filter(|t| t.completed && t.created_date >= start && t.created_date <= end)
        .count()
}

/// Integer completion percentage for an explicit completed/total pair.
/// Defined as 0 when `total` is 0.
pub fn completion_rate_for(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

/// Integer completion percentage over a task list, 0 for an empty list.
pub fn completion_rate(tasks: &[Task]) -> u32 {
    let completed = tasks.iter().filter(|t| t.completed).count();
    completion_rate_for(completed, tasks.len())
}

/// Sums the estimated minutes of tasks created on `date`, regardless of
/// completion state. Tasks without a duration contribute nothing.
pub fn total_duration_for_date(tasks: &[Task], date: NaiveDate) -> u32 {
    tasks
        .iter()
        .filter(|t| t.created_date == date)
        .filter_map(|t| t.duration)
        .filter(|d| *d > 0)
        .sum()
}

/// Remaining free minutes for the scope as of `reference`.
///
/// Week and month scopes are partial-period: only days from the scope
/// start through the reference date count toward both capacity and
/// scheduled time, so a Wednesday reference sees three days of the
/// week, not seven.
pub fn free_time(tasks: &[Task], scope: Scope, reference: NaiveDate) -> u32 {
    let (start, _) = scope_range(scope, reference);
    let mut total_duration: u64 = 0;
    let mut days: u64 = 0;
    let mut day = start;
    while day <= reference {
        total_duration += total_duration_for_date(tasks, day) as u64;
        days += 1;
        day += Duration::days(1);
    }
    let capacity = days * DAY_MINUTES as u64;
    capacity.saturating_sub(total_duration).min(u32::MAX as u64) as u32
}

/// Free and used minutes for a single day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFreeTime {
    pub date: NaiveDate,
    pub free_time: u32,
    pub used_time: u32,
}

/// Per-day free time for the trailing 7 days ending at `reference`,
/// oldest first.
pub fn daily_free_time(tasks: &[Task], reference: NaiveDate) -> Vec<DayFreeTime> {
    (0..7)
        .rev()
        .map(|i| {
            let date = reference - Duration::days(i);
            let used_time = total_duration_for_date(tasks, date);
            DayFreeTime {
                date,
                free_time: DAY_MINUTES.saturating_sub(used_time),
                used_time,
            }
        })
        .collect()
}

/// Formats minutes as "Xh Ym", dropping zero components ("2h", "45m").
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 && mins > 0 {
        format!("{}h {}m", hours, mins)
    } else if hours > 0 {
        format!("{}h", hours)
    } else {
        format!("{}m", mins)
    }
}
