use chrono::{Datelike, Duration, Local, NaiveDate};
use crate::analytics::completion_rate_for;
use crate::models::Task;

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Day-of-month number shown in the cell.
    pub day: u32,
    /// Padding cell from the previous or next month; rendered
    /// de-emphasized and excluded from the month's statistics.
    pub other_month: bool,
    pub is_today: bool,
    pub task_count: usize,
    /// Completion percentage for the day; `None` when the day has no
    /// tasks at all (only computed for current-month cells).
    pub completion_rate: Option<u32>,
}

/// Month-level aggregate stats shown above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyStats {
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub completion_rate: u32,
}

/// A month rendered as whole weeks, Sunday first, padded with
/// adjacent-month days.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<CalendarCell>,
    pub stats: MonthlyStats,
}

impl MonthGrid {
    /// Builds the grid for `year`/`month`, annotating each
    /// current-month day with its task count and completion rate.
    pub fn build(tasks: &[Task], year: i32, month: u32, today: NaiveDate) -> MonthGrid {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .unwrap_or_else(|| today.with_day(1).unwrap_or(today));
        let days_in_month = days_in_month(first);
        // 0 = Sunday, matching the grid's first column.
        let first_day_of_week = first.weekday().num_days_from_sunday();

        let total_cells = (days_in_month + first_day_of_week).div_ceil(7) * 7;
        let mut cells = Vec::with_capacity(total_cells as usize);

        // Trailing days of the previous month.
        for i in (1..=first_day_of_week).rev() {
            let date = first - Duration::days(i as i64);
            cells.push(CalendarCell {
                date,
                day: date.day(),
                other_month: true,
                is_today: false,
                task_count: 0,
                completion_rate: None,
            });
        }

        for day in 1..=days_in_month {
            let date = first + Duration::days(day as i64 - 1);
            let day_tasks: Vec<&Task> =
                tasks.iter().filter(|t| t.created_date == date).collect();
            let completion_rate = if day_tasks.is_empty() {
                None
            } else {
                let completed = day_tasks.iter().filter(|t| t.completed).count();
                Some(completion_rate_for(completed, day_tasks.len()))
            };
            cells.push(CalendarCell {
                date,
                day,
                other_month: false,
                is_today: date == today,
                task_count: day_tasks.len(),
                completion_rate,
            });
        }

        // Leading days of the next month.
        let last = first + Duration::days(days_in_month as i64 - 1);
        let trailing = total_cells - (first_day_of_week + days_in_month);
        for day in 1..=trailing {
            let date = last + Duration::days(day as i64);
            cells.push(CalendarCell {
                date,
                day: date.day(),
                other_month: true,
                is_today: false,
                task_count: 0,
                completion_rate: None,
            });
        }

        MonthGrid {
            year,
            month,
            cells,
            stats: monthly_stats(tasks, year, month),
        }
    }
}

/// Aggregates completion stats for every task created in the month.
pub fn monthly_stats(tasks: &[Task], year: i32, month: u32) -> MonthlyStats {
    let month_tasks: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.created_date.year() == year && t.created_date.month() == month)
        .collect();
    let completed_tasks = month_tasks.iter().filter(|t| t.completed).count();
    MonthlyStats {
        completed_tasks,
        total_tasks: month_tasks.len(),
        completion_rate: completion_rate_for(completed_tasks, month_tasks.len()),
    }
}

fn days_in_month(first: NaiveDate) -> u32 {
    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|next| (next - first).num_days() as u32)
        .unwrap_or(30)
}

/// The calendar's navigation cursor. Only the year and month of the
/// cursor date matter for the grid.
#[derive(Debug, Clone, Copy)]
pub struct CalendarViewState {
    pub cursor: NaiveDate,
}

impl CalendarViewState {
    pub fn new() -> CalendarViewState {
        CalendarViewState { cursor: Local::now().date_naive() }
    }

    pub fn at(cursor: NaiveDate) -> CalendarViewState {
        CalendarViewState { cursor }
    }

    pub fn previous_month(&mut self) {
        let first = self.cursor.with_day(1).unwrap_or(self.cursor);
        self.cursor = first - Duration::days(1);
    }

    pub fn next_month(&mut self) {
        let first = self.cursor.with_day(1).unwrap_or(self.cursor);
        self.cursor = first + Duration::days(days_in_month(first) as i64);
    }

    pub fn current_month(&mut self) {
        self.cursor = Local::now().date_naive();
    }

    pub fn grid(&self, tasks: &[Task], today: NaiveDate) -> MonthGrid {
        MonthGrid::build(tasks, self.cursor.year(), self.cursor.month(), today)
    }
}

impl Default for CalendarViewState {
    fn default() -> CalendarViewState {
        CalendarViewState::new()
    }
}
