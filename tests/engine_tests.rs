use std::time::{Duration as StdDuration, Instant};

use chrono::{Duration, NaiveDate, NaiveTime};
use nowtask::analytics::{
    completed_count, completion_rate, completion_rate_for, daily_free_time, format_minutes,
    free_time, scope_range, Scope,
};
use nowtask::calendar::{CalendarViewState, MonthGrid};
use nowtask::charts::{daily_completed, monthly_history, weekly_completion_rate};
use nowtask::filter::{apply_filters, apply_sorting, search_tasks, Debouncer, FilterState, SortBy};
use nowtask::gauge::{render_gauge_bar, render_label_line, scheduled_hours, time_labels, TimeInfo};
use nowtask::models::{Priority, Task, TimeDisplayFormat, TimeFormatStyle};
use nowtask::ranking::calculate_task_ranking;
use nowtask::validate::{parse_time, time_to_minutes, validate_task_text, validate_time_range};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task_on(text: &str, created: NaiveDate) -> Task {
    let mut t = Task::new(format!("{}_{}", created, text), text.to_string());
    t.created_date = created;
    t.created_time = "12:00".to_string();
    t
}

fn completed_task(text: &str, created: NaiveDate, duration: u32) -> Task {
    let mut t = task_on(text, created);
    t.completed = true;
    t.duration = Some(duration);
    t
}

// ===== Analytics =====

#[test]
fn week_scope_runs_monday_through_sunday() {
    // 2026-07-01 is a Wednesday.
    let (start, end) = scope_range(Scope::Week, date(2026, 7, 1));
    assert_eq!(start, date(2026, 6, 29));
    assert_eq!(end, date(2026, 7, 5));

    // A Sunday belongs to the week that started the previous Monday.
    let (start, end) = scope_range(Scope::Week, date(2026, 7, 5));
    assert_eq!(start, date(2026, 6, 29));
    assert_eq!(end, date(2026, 7, 5));
}

#[test]
fn month_scope_covers_whole_month() {
    let (start, end) = scope_range(Scope::Month, date(2026, 2, 15));
    assert_eq!(start, date(2026, 2, 1));
    assert_eq!(end, date(2026, 2, 28));

    let (start, end) = scope_range(Scope::Month, date(2026, 12, 3));
    assert_eq!(start, date(2026, 12, 1));
    assert_eq!(end, date(2026, 12, 31));
}

#[test]
fn completed_counts_bucket_by_created_date() {
    let today = date(2026, 7, 1);
    let tasks = vec![
        completed_task("a", today, 30),
        completed_task("b", date(2026, 6, 30), 30),  // Tuesday, same week
        completed_task("c", date(2026, 6, 28), 30),  // Sunday, previous week
        task_on("pending", today),
    ];

    assert_eq!(completed_count(&tasks, Scope::Day, today), 1);
    assert_eq!(completed_count(&tasks, Scope::Week, today), 2);
    assert_eq!(completed_count(&tasks, Scope::Month, today), 1);
}

#[test]
fn completion_rate_rounds_and_handles_empty() {
    assert_eq!(completion_rate_for(0, 0), 0);
    assert_eq!(completion_rate_for(1, 3), 33);
    assert_eq!(completion_rate_for(2, 3), 67);
    assert_eq!(completion_rate_for(3, 3), 100);

    assert_eq!(completion_rate(&[]), 0);
    let tasks = vec![
        completed_task("a", date(2026, 7, 1), 10),
        task_on("b", date(2026, 7, 1)),
    ];
    assert_eq!(completion_rate(&tasks), 50);
}

#[test]
fn free_time_is_capacity_minus_scheduled() {
    let today = date(2026, 7, 1);
    let mut scheduled = task_on("work", today);
    scheduled.duration = Some(60);
    let tasks = vec![scheduled, task_on("no duration", today)];

    assert_eq!(free_time(&tasks, Scope::Day, today), 1440 - 60);
    // Wednesday: three days of the week (Mon-Wed) have elapsed.
    assert_eq!(free_time(&tasks, Scope::Week, today), 3 * 1440 - 60);
    assert_eq!(free_time(&tasks, Scope::Month, today), 1440 - 60);
}

#[test]
fn free_time_saturates_when_overbooked() {
    let today = date(2026, 7, 1);
    let mut a = task_on("a", today);
    a.duration = Some(1440);
    let mut b = task_on("b", today);
    b.duration = Some(600);

    assert_eq!(free_time(&[a, b], Scope::Day, today), 0);
}

#[test]
fn daily_free_time_covers_trailing_week_oldest_first() {
    let today = date(2026, 7, 10);
    let mut t = task_on("work", date(2026, 7, 8));
    t.duration = Some(120);

    let days = daily_free_time(&[t], today);
    assert_eq!(days.len(), 7);
    assert_eq!(days[0].date, date(2026, 7, 4));
    assert_eq!(days[6].date, today);
    let busy = days.iter().find(|d| d.date == date(2026, 7, 8)).unwrap();
    assert_eq!(busy.used_time, 120);
    assert_eq!(busy.free_time, 1440 - 120);
}

#[test]
fn format_minutes_drops_zero_components() {
    assert_eq!(format_minutes(0), "0m");
    assert_eq!(format_minutes(45), "45m");
    assert_eq!(format_minutes(120), "2h");
    assert_eq!(format_minutes(135), "2h 15m");
}

// ===== Gauge =====

#[test]
fn time_info_reports_day_progress() {
    let noon = TimeInfo::at(NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    assert_eq!(noon.elapsed_minutes, 720);
    assert_eq!(noon.percentage, 50.0);
    assert_eq!(noon.remaining_minutes(), 720);
    assert_eq!(noon.time_string(), "12:00");

    let late = TimeInfo::at(NaiveTime::from_hms_opt(23, 59, 0).unwrap());
    assert!(late.percentage < 100.0);
    assert_eq!(late.remaining_minutes(), 1);
}

#[test]
fn timed_task_marks_its_hours() {
    let mut t = task_on("meeting", date(2026, 7, 1));
    t.start_time = Some("09:00".into());
    t.end_time = Some("09:30".into());

    let hours = scheduled_hours(&[t], 0);
    for (i, occupied) in hours.iter().enumerate() {
        assert_eq!(*occupied, i == 9, "hour {}", i);
    }
}

#[test]
fn midnight_wrap_marks_both_ends() {
    let mut t = task_on("night shift", date(2026, 7, 1));
    t.start_time = Some("23:00".into());
    t.end_time = Some("01:00".into());

    let hours = scheduled_hours(&[t], 12);
    assert!(hours[23]);
    assert!(hours[0]);
    assert!(!hours[1]);
    assert!(!hours[12]);
}

#[test]
fn duration_only_task_anchors_at_current_hour() {
    let mut t = task_on("errand", date(2026, 7, 1));
    t.duration = Some(90);

    let hours = scheduled_hours(&[t.clone()], 10);
    assert!(hours[10]);
    assert!(hours[11]);
    assert!(!hours[12]);

    // Near midnight the block is clipped, never wrapped.
    let hours = scheduled_hours(&[t], 23);
    assert!(hours[23]);
    assert!(!hours[0]);
}

#[test]
fn completed_tasks_do_not_occupy_hours() {
    let mut t = completed_task("done", date(2026, 7, 1), 120);
    t.start_time = Some("09:00".into());
    t.end_time = Some("11:00".into());

    assert_eq!(scheduled_hours(&[t], 0), [false; 24]);
}

#[test]
fn gauge_bar_marks_current_and_occupied_hours() {
    let mut scheduled = [false; 24];
    scheduled[9] = true;
    let bar = render_gauge_bar(&scheduled, 3);
    let glyphs: Vec<char> = bar.chars().collect();
    assert_eq!(glyphs.len(), 24);
    assert_eq!(glyphs[3], '▣');
    assert_eq!(glyphs[9], '█');
    assert_eq!(glyphs[0], '░');
}

#[test]
fn labels_follow_display_settings() {
    let labels = time_labels(TimeDisplayFormat::Every6Hours, TimeFormatStyle::OneDigit);
    assert_eq!(labels[0], "0:00");
    assert_eq!(labels[6], "6:00");
    assert_eq!(labels[1], "");

    let labels = time_labels(TimeDisplayFormat::ShowAll, TimeFormatStyle::TwoDigit);
    assert_eq!(labels[5], "05:00");
    assert!(labels.iter().all(|l| !l.is_empty()));

    let line = render_label_line(&time_labels(
        TimeDisplayFormat::Every6Hours,
        TimeFormatStyle::OneDigit,
    ));
    assert!(line.starts_with("0:00"));
    assert!(line.contains("18:00"));
}

// ===== Ranking =====

#[test]
fn ranking_groups_by_name_and_sums_duration() {
    let d = date(2026, 7, 1);
    let tasks = vec![
        completed_task("Write report", d, 30),
        completed_task("Write report", d, 45),
        completed_task("Email", d, 20),
    ];

    let ranking = calculate_task_ranking(&tasks);
    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking[0].task_name, "Write report");
    assert_eq!(ranking[0].total_duration, 75);
    assert_eq!(ranking[0].count, 2);
    assert_eq!(ranking[1].task_name, "Email");
}

#[test]
fn ranking_excludes_pending_and_unsized_tasks() {
    let d = date(2026, 7, 1);
    let mut pending = task_on("Pending", d);
    pending.duration = Some(60);
    let mut no_duration = task_on("No size", d);
    no_duration.completed = true;

    assert!(calculate_task_ranking(&[pending, no_duration]).is_empty());
}

#[test]
fn ranking_keeps_top_five_with_stable_ties() {
    let d = date(2026, 7, 1);
    let mut tasks: Vec<Task> = (0..7)
        .map(|i| completed_task(&format!("Task {}", i), d, 100 - i * 10))
        .collect();
    // A tie with "Task 0"; arrives later, so sorts after it.
    tasks.push(completed_task("Tie", d, 100));

    let ranking = calculate_task_ranking(&tasks);
    assert_eq!(ranking.len(), 5);
    assert_eq!(ranking[0].task_name, "Task 0");
    assert_eq!(ranking[1].task_name, "Tie");
    assert!(ranking.windows(2).all(|w| w[0].total_duration >= w[1].total_duration));
}

// ===== Calendar =====

#[test]
fn month_grid_pads_to_whole_weeks() {
    // July 2026 starts on a Wednesday: 3 leading cells, 31 days, 1 trailing.
    let today = date(2026, 7, 15);
    let grid = MonthGrid::build(&[], 2026, 7, today);

    assert_eq!(grid.cells.len() % 7, 0);
    assert_eq!(grid.cells.len(), 35);
    assert!(grid.cells[0].other_month);
    assert_eq!(grid.cells[0].date, date(2026, 6, 28));
    assert!(grid.cells[2].other_month);
    assert!(!grid.cells[3].other_month);
    assert_eq!(grid.cells[3].day, 1);
    assert!(grid.cells[34].other_month);
    assert_eq!(grid.cells[34].date, date(2026, 8, 1));
}

#[test]
fn month_grid_annotates_days_with_tasks() {
    let today = date(2026, 7, 15);
    let tasks = vec![
        completed_task("a", date(2026, 7, 10), 10),
        task_on("b", date(2026, 7, 10)),
        // Adjacent-month task must not appear in July's cells or stats.
        completed_task("june", date(2026, 6, 30), 10),
    ];
    let grid = MonthGrid::build(&tasks, 2026, 7, today);

    let cell = grid.cells.iter().find(|c| c.date == date(2026, 7, 10)).unwrap();
    assert_eq!(cell.task_count, 2);
    assert_eq!(cell.completion_rate, Some(50));

    let empty = grid.cells.iter().find(|c| c.date == date(2026, 7, 11)).unwrap();
    assert_eq!(empty.task_count, 0);
    assert_eq!(empty.completion_rate, None);

    let june_pad = grid.cells.iter().find(|c| c.date == date(2026, 6, 30)).unwrap();
    assert_eq!(june_pad.task_count, 0);

    assert_eq!(grid.stats.total_tasks, 2);
    assert_eq!(grid.stats.completed_tasks, 1);
    assert_eq!(grid.stats.completion_rate, 50);

    let today_cell = grid.cells.iter().find(|c| c.is_today).unwrap();
    assert_eq!(today_cell.date, today);
}

#[test]
fn calendar_cursor_navigates_months() {
    let mut view = CalendarViewState::at(date(2026, 1, 31));
    view.next_month();
    assert_eq!(view.cursor, date(2026, 2, 1));
    view.previous_month();
    assert_eq!(view.cursor, date(2026, 1, 31));

    let mut view = CalendarViewState::at(date(2025, 12, 10));
    view.next_month();
    assert_eq!(view.cursor, date(2026, 1, 1));
}

// ===== Charts =====

#[test]
fn daily_chart_counts_only_timestamped_completions() {
    let today = date(2026, 7, 10);
    let mut stamped = completed_task("batch done", date(2026, 7, 1), 10);
    stamped.completed_at = Some("2026-07-08T12:00:00+00:00".to_string());
    // Completed through the toggle path: no timestamp, invisible here.
    let toggled = completed_task("toggled", date(2026, 7, 8), 10);
    let mut too_old = completed_task("old", date(2026, 6, 1), 10);
    too_old.completed_at = Some("2026-06-20T12:00:00+00:00".to_string());

    let buckets = daily_completed(&[stamped, toggled, too_old], today);
    assert_eq!(buckets.len(), 7);
    assert_eq!(buckets[0].date, date(2026, 7, 4));
    let hit = buckets.iter().find(|b| b.date == date(2026, 7, 8)).unwrap();
    assert_eq!(hit.count, 1);
    assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 1);
}

#[test]
fn weekly_chart_buckets_by_age() {
    let today = date(2026, 7, 10);
    let tasks = vec![
        completed_task("this week", today, 10),
        task_on("this week too", today - Duration::days(3)),
        completed_task("three weeks back", today - Duration::days(20), 10),
    ];

    let weeks = weekly_completion_rate(&tasks, today);
    assert_eq!(weeks.len(), 4);
    assert_eq!(weeks[3].total, 2);
    assert_eq!(weeks[3].completed, 1);
    assert_eq!(weeks[3].rate, 50);
    assert_eq!(weeks[1].total, 1);
    assert_eq!(weeks[1].rate, 100);
    assert_eq!(weeks[0].total, 0);
    assert_eq!(weeks[0].rate, 0);
}

#[test]
fn monthly_history_spans_six_months() {
    let today = date(2026, 3, 15);
    let tasks = vec![
        completed_task("recent", date(2026, 3, 1), 10),
        task_on("last year", date(2025, 10, 5)),
        task_on("too old", date(2025, 9, 30)),
    ];

    let months = monthly_history(&tasks, today);
    assert_eq!(months.len(), 6);
    assert_eq!((months[0].year, months[0].month), (2025, 10));
    assert_eq!((months[5].year, months[5].month), (2026, 3));
    assert_eq!(months[0].total, 1);
    assert_eq!(months[5].completed, 1);
    assert_eq!(months.iter().map(|m| m.total).sum::<usize>(), 2);
}

// ===== Filtering, sorting, search =====

#[test]
fn filters_narrow_by_emergency_and_priority() {
    let d = date(2026, 7, 1);
    let mut urgent = task_on("urgent", d);
    urgent.emergency = true;
    urgent.priority = Some(Priority::High);
    let mut low = task_on("low", d);
    low.priority = Some(Priority::Low);
    let plain = task_on("plain", d);

    let state = FilterState { emergency: true, priority: None, sort_by: SortBy::Created };
    let out = apply_filters(vec![urgent.clone(), low.clone(), plain.clone()], &state);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].text, "urgent");

    let state = FilterState { emergency: false, priority: Some(Priority::Low), sort_by: SortBy::Created };
    let out = apply_filters(vec![urgent, low, plain], &state);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].text, "low");
}

#[test]
fn sorting_orders_tasks() {
    let mut old = task_on("old", date(2026, 7, 1));
    old.priority = Some(Priority::Low);
    old.end_time = Some("09:00".into());
    let mut new = task_on("new", date(2026, 7, 5));
    new.end_time = Some("18:00".into());
    let mut high = task_on("high", date(2026, 7, 3));
    high.priority = Some(Priority::High);

    let mut tasks = vec![old.clone(), new.clone(), high.clone()];
    apply_sorting(&mut tasks, SortBy::Created);
    assert_eq!(tasks[0].text, "new");
    assert_eq!(tasks[2].text, "old");

    let mut tasks = vec![old.clone(), new.clone(), high.clone()];
    apply_sorting(&mut tasks, SortBy::Priority);
    assert_eq!(tasks[0].text, "high");
    assert_eq!(tasks[1].text, "old");
    // No priority sorts last.
    assert_eq!(tasks[2].text, "new");

    let mut tasks = vec![new, high, old];
    apply_sorting(&mut tasks, SortBy::Time);
    assert_eq!(tasks[0].text, "old");
    // No end time sorts last.
    assert_eq!(tasks[2].text, "high");
}

#[test]
fn search_matches_title_and_memo_case_insensitively() {
    let d = date(2026, 7, 1);
    let mut with_memo = task_on("Groceries", d);
    with_memo.memo = Some("Buy MILK and eggs".into());
    let other = task_on("Laundry", d);

    let out = search_tasks(vec![with_memo.clone(), other.clone()], "milk");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].text, "Groceries");

    let out = search_tasks(vec![with_memo.clone(), other.clone()], "LAUN");
    assert_eq!(out.len(), 1);

    // Blank queries match everything.
    let out = search_tasks(vec![with_memo, other], "   ");
    assert_eq!(out.len(), 2);
}

#[test]
fn debouncer_fires_once_with_latest_value() {
    let t0 = Instant::now();
    let mut debouncer = Debouncer::new(StdDuration::from_millis(300));

    debouncer.submit("a".into(), t0);
    assert_eq!(debouncer.poll(t0 + StdDuration::from_millis(100)), None);

    // A newer submission supersedes the pending one and restarts the clock.
    debouncer.submit("ab".into(), t0 + StdDuration::from_millis(100));
    assert_eq!(debouncer.poll(t0 + StdDuration::from_millis(350)), None);
    assert_eq!(
        debouncer.poll(t0 + StdDuration::from_millis(450)),
        Some("ab".to_string())
    );
    // Fires at most once per submission.
    assert_eq!(debouncer.poll(t0 + StdDuration::from_millis(900)), None);

    debouncer.submit("c".into(), t0);
    debouncer.cancel();
    assert!(!debouncer.is_pending());
    assert_eq!(debouncer.poll(t0 + StdDuration::from_secs(10)), None);
}

// ===== Validation =====

#[test]
fn time_parsing_requires_two_digit_components() {
    assert_eq!(parse_time("09:30"), Some((9, 30)));
    assert_eq!(parse_time("23:59"), Some((23, 59)));
    assert_eq!(parse_time("9:30"), None);
    assert_eq!(parse_time("24:00"), None);
    assert_eq!(parse_time("12:60"), None);
    assert_eq!(parse_time("noon"), None);

    assert_eq!(time_to_minutes("01:30"), Some(90));
    assert_eq!(time_to_minutes("1:30"), None);
}

#[test]
fn text_and_range_validation() {
    assert!(validate_task_text("Do the thing"));
    assert!(!validate_task_text(""));
    assert!(!validate_task_text("   "));
    assert!(!validate_task_text(&"x".repeat(101)));
    assert!(validate_task_text(&"x".repeat(100)));

    assert!(validate_time_range("09:00", "10:00"));
    // End before start wraps past midnight and is allowed.
    assert!(validate_time_range("23:00", "01:00"));
    assert!(!validate_time_range("9:00", "10:00"));
}
