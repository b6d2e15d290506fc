use chrono::{DateTime, Datelike, Duration, NaiveDate};
use crate::analytics::completion_rate_for;
use crate::models::Task;

/// Completed-task count for one day of the trailing week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCompleted {
    pub date: NaiveDate,
    pub count: usize,
}

/// Completions per day over the trailing 7 days ending at `today`,
/// oldest first, keyed by the `completed_at` timestamp.
///
/// Tasks completed through the primary toggle path carry no
/// `completed_at` and are invisible here; only batch completions are
/// counted.
pub fn daily_completed(tasks: &[Task], today: NaiveDate) -> Vec<DailyCompleted> {
    let mut buckets: Vec<DailyCompleted> = (0..7)
        .rev()
        .map(|i| DailyCompleted { date: today - Duration::days(i), count: 0 })
        .collect();

    for task in tasks {
        if !task.completed {
            continue;
        }
        let Some(stamp) = &task.completed_at else { continue };
        let Ok(completed) = DateTime::parse_from_rfc3339(stamp) else { continue };
        let date = completed.date_naive();
        if let Some(bucket) = buckets.iter_mut().find(|b| b.date == date) {
            bucket.count += 1;
        }
    }

    buckets
}

/// Completion rate for one Sunday-anchored week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyRate {
    pub week_start: NaiveDate,
    pub completed: usize,
    pub total: usize,
    pub rate: u32,
}

/// Completion rates for the trailing 4 Sunday-anchored weeks, oldest
/// first, bucketing tasks by trailing-week distance of their created
/// date from `today`.
pub fn weekly_completion_rate(tasks: &[Task], today: NaiveDate) -> Vec<WeeklyRate> {
    let day_of_week = today.weekday().num_days_from_sunday() as i64;
    let mut weeks: Vec<WeeklyRate> = (0..4)
        .rev()
        .map(|i| WeeklyRate {
            week_start: today - Duration::days(i * 7 + day_of_week),
            completed: 0,
            total: 0,
            rate: 0,
        })
        .collect();

    for task in tasks {
        let age_days = (today - task.created_date).num_days();
        if age_days < 0 {
            continue;
        }
        let week_index = (age_days / 7) as usize;
        if week_index < 4 {
            let bucket = &mut weeks[3 - week_index];
            bucket.total += 1;
            if task.completed {
                bucket.completed += 1;
            }
        }
    }

    for week in &mut weeks {
        week.rate = completion_rate_for(week.completed, week.total);
    }
    weeks
}

/// Created/completed counts for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub completed: usize,
    pub total: usize,
}

/// Per-month task counts for the trailing 6 calendar months including
/// the current one, oldest first, bucketed by created date.
pub fn monthly_history(tasks: &[Task], today: NaiveDate) -> Vec<MonthlyBucket> {
    let mut months: Vec<MonthlyBucket> = Vec::with_capacity(6);
    let mut year = today.year();
    let mut month = today.month();
    for _ in 0..6 {
        months.push(MonthlyBucket { year, month, completed: 0, total: 0 });
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    months.reverse();

    for task in tasks {
        let (y, m) = (task.created_date.year(), task.created_date.month());
        if let Some(bucket) = months.iter_mut().find(|b| b.year == y && b.month == m) {
            bucket.total += 1;
            if task.completed {
                bucket.completed += 1;
            }
        }
    }

    months
}
