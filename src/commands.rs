use std::io::{self, Write};
use chrono::{Datelike, Local};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use crate::analytics::{
    completed_count, completion_rate, daily_free_time, format_minutes, free_time, Scope,
};
use crate::calendar::MonthGrid;
use crate::charts::{daily_completed, monthly_history, weekly_completion_rate};
use crate::filter::{apply_filters, apply_sorting, search_tasks, FilterState, SortBy};
use crate::gauge::{render_gauge_bar, render_label_line, scheduled_hours, time_labels, TimeInfo};
use crate::migration::run_migrations;
use crate::models::{generate_unique_id, Priority, Routine, Task, Template};
use crate::ranking::calculate_task_ranking;
use crate::repository::TaskRepository;
use crate::storage::{
    delete_database, load_routines, load_settings, load_tasks, load_templates,
    save_routines, save_settings, save_templates,
};
use crate::validate::{
    validate_duration, validate_memo, validate_task_text, validate_time_range,
};

/// Runs pending schema migrations, reporting failures without aborting.
pub fn ensure_migrated(silent: bool) {
    if let Err(e) = run_migrations() {
        if !silent { eprintln!("Schema migration failed (will retry on next run): {}", e); }
    }
}

fn validate_task_fields(
    text: &str,
    memo: Option<&str>,
    duration: Option<u32>,
    start: Option<&str>,
    end: Option<&str>,
    silent: bool,
) -> bool {
    if !validate_task_text(text) {
        if !silent { eprintln!("Task text must be 1-100 characters."); }
        return false;
    }
    if let Some(m) = memo {
        if !validate_memo(m) {
            if !silent { eprintln!("Memo must be at most 500 characters."); }
            return false;
        }
    }
    if let Some(d) = duration {
        if !validate_duration(d) {
            if !silent { eprintln!("Duration must be 1-1440 minutes."); }
            return false;
        }
    }
    match (start, end) {
        (Some(s), Some(e)) => {
            if !validate_time_range(s, e) {
                if !silent { eprintln!("Times must be HH:MM (end before start spans midnight)."); }
                return false;
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            if !silent { eprintln!("Start and end times must be given together."); }
            return false;
        }
        (None, None) => {}
    }
    true
}

/// Adds a new task.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    text: String,
    memo: Option<String>,
    duration: Option<u32>,
    start: Option<String>,
    end: Option<String>,
    priority: Option<String>,
    emergency: bool,
    silent: bool,
) {
    if !validate_task_fields(
        &text,
        memo.as_deref(),
        duration,
        start.as_deref(),
        end.as_deref(),
        silent,
    ) {
        return;
    }
    let priority = match parse_priority_arg(priority.as_deref(), silent) {
        Ok(p) => p,
        Err(()) => return,
    };

    let tasks = load_tasks();
    let mut task = Task::new(generate_unique_id(&tasks), text.trim().to_string());
    task.memo = memo;
    task.duration = duration;
    task.start_time = start;
    task.end_time = end;
    task.priority = priority;
    task.emergency = emergency;
    let id = task.id.clone();

    if let Err(e) = TaskRepository::new().add_task(task) {
        if !silent { eprintln!("Failed to save tasks: {}", e); }
    } else if !silent {
        println!("Task added (id = {})", id);
    }
}

fn parse_priority_arg(arg: Option<&str>, silent: bool) -> Result<Option<Priority>, ()> {
    match arg {
        None | Some("none") => Ok(None),
        Some(s) => match Priority::parse(s) {
            Some(p) => Ok(Some(p)),
            None => {
                if !silent { eprintln!("Unknown priority '{}'. Use high, medium, low, or none.", s); }
                Err(())
            }
        },
    }
}

/// Lists tasks in a formatted table.
///
/// By default completed tasks are hidden unless `all` is true; the
/// emergency/priority filters, sort order, and search query mirror the
/// interactive view.
pub fn cmd_list(
    all: bool,
    emergency: bool,
    priority: Option<String>,
    sort: Option<String>,
    search: Option<String>,
) {
    let priority = match parse_priority_arg(priority.as_deref(), false) {
        Ok(p) => p,
        Err(()) => return,
    };
    let sort_by = match sort.as_deref() {
        None => SortBy::Created,
        Some(s) => match SortBy::parse(s) {
            Some(s) => s,
            None => {
                eprintln!("Unknown sort '{}'. Use created, priority, or time.", s);
                return;
            }
        },
    };

    let mut tasks = load_tasks();
    if !all {
        tasks.retain(|t| !t.completed);
    }
    let state = FilterState { emergency, priority, sort_by };
    tasks = apply_filters(tasks, &state);
    if let Some(query) = &search {
        tasks = search_tasks(tasks, query);
    }
    apply_sorting(&mut tasks, sort_by);

    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("Created").add_attribute(Attribute::Bold),
            Cell::new("Time").add_attribute(Attribute::Bold),
            Cell::new("Duration").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Subtasks").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let window = match (&t.start_time, &t.end_time) {
            (Some(s), Some(e)) => format!("{}-{}", s, e),
            _ => String::new(),
        };
        let duration = t.duration.map(format_minutes).unwrap_or_default();
        let priority_cell = match t.priority {
            Some(Priority::High) => Cell::new("high").fg(Color::Red),
            Some(Priority::Medium) => Cell::new("medium").fg(Color::Yellow),
            Some(Priority::Low) => Cell::new("low").fg(Color::Green),
            None => Cell::new(""),
        };
        let subtasks = if t.subtasks.is_empty() {
            String::new()
        } else {
            let done = t.subtasks.iter().filter(|s| s.completed).count();
            format!("{}/{}", done, t.subtasks.len())
        };
        let status = if t.completed { "Done" } else { "Pending" };
        let status_color = if t.completed { Color::Green } else { Color::Yellow };
        let text = if t.emergency { format!("! {}", t.text) } else { t.text.clone() };

        table.add_row(vec![
            Cell::new(&t.id),
            Cell::new(text),
            Cell::new(t.created_date),
            Cell::new(window),
            Cell::new(duration),
            priority_cell,
            Cell::new(subtasks),
            Cell::new(status).fg(status_color),
        ]);
    }

    println!("{table}");
}

/// Toggles a task's completion state.
///
/// Does not record a completion timestamp; only the batch path does.
pub fn cmd_complete(id: String, silent: bool) {
    match TaskRepository::new().toggle_completed(&id) {
        Ok(true) => {
            if !silent { println!("Task {} toggled.", id); }
        }
        Ok(false) => {
            if !silent { eprintln!("Task {} not found.", id); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Removes a task by id.
pub fn cmd_remove(id: String, silent: bool) {
    match TaskRepository::new().delete_task(&id) {
        Ok(true) => {
            if !silent { println!("Task {} removed.", id); }
        }
        Ok(false) => {
            if !silent { eprintln!("Task {} not found.", id); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Edits an existing task's details. Only the given fields change.
#[allow(clippy::too_many_arguments)]
pub fn cmd_edit(
    id: String,
    text: Option<String>,
    memo: Option<String>,
    duration: Option<u32>,
    start: Option<String>,
    end: Option<String>,
    priority: Option<String>,
    emergency: Option<bool>,
    silent: bool,
) {
    let repo = TaskRepository::new();
    let Some(mut task) = repo.get_all_tasks().into_iter().find(|t| t.id == id) else {
        if !silent { eprintln!("Task {} not found.", id); }
        return;
    };

    if let Some(t) = text { task.text = t.trim().to_string(); }
    if let Some(m) = memo { task.memo = Some(m); }
    if let Some(d) = duration { task.duration = Some(d); }
    if let Some(s) = start { task.start_time = Some(s); }
    if let Some(e) = end { task.end_time = Some(e); }
    if let Some(e) = emergency { task.emergency = e; }
    match parse_priority_arg(priority.as_deref(), silent) {
        Ok(Some(p)) => task.priority = Some(p),
        Ok(None) if priority.is_some() => task.priority = None,
        Ok(None) => {}
        Err(()) => return,
    }

    if !validate_task_fields(
        &task.text,
        task.memo.as_deref(),
        task.duration,
        task.start_time.as_deref(),
        task.end_time.as_deref(),
        silent,
    ) {
        return;
    }

    match repo.update_task(task) {
        Ok(_) => {
            if !silent { println!("Task {} updated.", id); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Duplicates a task under a fresh id, dated today.
pub fn cmd_duplicate(id: String, silent: bool) {
    match TaskRepository::new().duplicate_task(&id) {
        Ok(Some(copy)) => {
            if !silent { println!("Task duplicated (id = {})", copy.id); }
        }
        Ok(None) => {
            if !silent { eprintln!("Task {} not found.", id); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Adds a subtask to a task.
pub fn cmd_subtask_add(task_id: String, text: String, silent: bool) {
    if !validate_task_text(&text) {
        if !silent { eprintln!("Subtask text must be 1-100 characters."); }
        return;
    }
    match TaskRepository::new().add_subtask(&task_id, text.trim().to_string()) {
        Ok(true) => {
            if !silent { println!("Subtask added to task {}.", task_id); }
        }
        Ok(false) => {
            if !silent { eprintln!("Task {} not found.", task_id); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Toggles a subtask's completion state.
pub fn cmd_subtask_toggle(task_id: String, subtask_id: String, silent: bool) {
    match TaskRepository::new().toggle_subtask(&task_id, &subtask_id) {
        Ok(true) => {
            if !silent { println!("Subtask {} toggled.", subtask_id); }
        }
        Ok(false) => {
            if !silent { eprintln!("Subtask {} not found on task {}.", subtask_id, task_id); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Marks several tasks completed at once, stamping `completed_at`.
pub fn cmd_batch_complete(ids: Vec<String>, silent: bool) {
    match TaskRepository::new().batch_complete(&ids) {
        Ok(n) => {
            if !silent { println!("{} task(s) completed.", n); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Removes several tasks at once.
pub fn cmd_batch_delete(ids: Vec<String>, silent: bool) {
    match TaskRepository::new().batch_delete(&ids) {
        Ok(n) => {
            if !silent { println!("{} task(s) removed.", n); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

// ===== Routines =====

/// Adds a new routine.
pub fn cmd_routine_add(name: String, duration: u32, silent: bool) {
    if !validate_task_text(&name) {
        if !silent { eprintln!("Routine name must be 1-100 characters."); }
        return;
    }
    if !validate_duration(duration) {
        if !silent { eprintln!("Duration must be 1-1440 minutes."); }
        return;
    }
    let mut routines = load_routines();
    let routine = Routine {
        id: generate_unique_id(&load_tasks()),
        name: name.trim().to_string(),
        duration,
        created_date: Local::now().date_naive(),
    };
    let id = routine.id.clone();
    routines.push(routine);
    if let Err(e) = save_routines(&routines) {
        if !silent { eprintln!("Failed to save routines: {}", e); }
    } else if !silent {
        println!("Routine added (id = {})", id);
    }
}

/// Lists all routines.
pub fn cmd_routine_list() {
    let routines = load_routines();
    if routines.is_empty() {
        println!("No routines found.");
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Name", "Duration", "Created"]);
    for r in routines {
        table.add_row(vec![
            r.id,
            r.name,
            format_minutes(r.duration),
            r.created_date.to_string(),
        ]);
    }
    println!("{table}");
}

/// Instantiates a routine as a new task dated today.
pub fn cmd_routine_use(id: String, silent: bool) {
    match TaskRepository::new().add_from_routine(&id) {
        Ok(Some(task)) => {
            if !silent { println!("Task '{}' created from routine (id = {})", task.text, task.id); }
        }
        Ok(None) => {
            if !silent { eprintln!("Routine {} not found.", id); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Edits a routine's name and/or duration.
pub fn cmd_routine_edit(id: String, name: Option<String>, duration: Option<u32>, silent: bool) {
    let mut routines = load_routines();
    let Some(routine) = routines.iter_mut().find(|r| r.id == id) else {
        if !silent { eprintln!("Routine {} not found.", id); }
        return;
    };
    if let Some(n) = name {
        if !validate_task_text(&n) {
            if !silent { eprintln!("Routine name must be 1-100 characters."); }
            return;
        }
        routine.name = n.trim().to_string();
    }
    if let Some(d) = duration {
        if !validate_duration(d) {
            if !silent { eprintln!("Duration must be 1-1440 minutes."); }
            return;
        }
        routine.duration = d;
    }
    if let Err(e) = save_routines(&routines) {
        if !silent { eprintln!("Failed to save routines: {}", e); }
    } else if !silent {
        println!("Routine {} updated.", id);
    }
}

/// Removes a routine.
pub fn cmd_routine_remove(id: String, silent: bool) {
    let mut routines = load_routines();
    let before = routines.len();
    routines.retain(|r| r.id != id);
    if routines.len() == before {
        if !silent { eprintln!("Routine {} not found.", id); }
        return;
    }
    if let Err(e) = save_routines(&routines) {
        if !silent { eprintln!("Failed to save routines: {}", e); }
    } else if !silent {
        println!("Routine {} removed.", id);
    }
}

// ===== Templates =====

/// Adds a new template carrying the full task attribute set.
#[allow(clippy::too_many_arguments)]
pub fn cmd_template_add(
    name: String,
    duration: Option<u32>,
    memo: Option<String>,
    start: Option<String>,
    end: Option<String>,
    priority: Option<String>,
    emergency: bool,
    silent: bool,
) {
    if !validate_task_fields(&name, memo.as_deref(), duration, start.as_deref(), end.as_deref(), silent) {
        return;
    }
    let priority = match parse_priority_arg(priority.as_deref(), silent) {
        Ok(p) => p,
        Err(()) => return,
    };
    let mut templates = load_templates();
    if templates.iter().any(|t| t.name == name) {
        if !silent { eprintln!("Template '{}' already exists.", name); }
        return;
    }
    templates.push(Template {
        id: generate_unique_id(&load_tasks()),
        name: name.clone(),
        duration,
        memo,
        start_time: start,
        end_time: end,
        priority,
        emergency,
    });
    if let Err(e) = save_templates(&templates) {
        if !silent { eprintln!("Failed to save templates: {}", e); }
    } else if !silent {
        println!("Template '{}' added.", name);
    }
}

/// Lists all templates.
pub fn cmd_template_list() {
    let templates = load_templates();
    if templates.is_empty() {
        println!("No templates found.");
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Name", "Duration", "Time", "Priority", "Emergency"]);
    for t in templates {
        let window = match (&t.start_time, &t.end_time) {
            (Some(s), Some(e)) => format!("{}-{}", s, e),
            _ => "-".to_string(),
        };
        table.add_row(vec![
            t.name,
            t.duration.map(format_minutes).unwrap_or_else(|| "-".into()),
            window,
            t.priority.map(Priority::label).unwrap_or("-").to_string(),
            if t.emergency { "yes".into() } else { "-".to_string() },
        ]);
    }
    println!("{table}");
}

/// Instantiates a template as a new task dated today.
pub fn cmd_template_use(name: String, silent: bool) {
    match TaskRepository::new().add_from_template(&name) {
        Ok(Some(task)) => {
            if !silent { println!("Task '{}' created from template (id = {})", task.text, task.id); }
        }
        Ok(None) => {
            if !silent { eprintln!("Template '{}' not found.", name); }
        }
        Err(e) => {
            if !silent { eprintln!("Failed to save tasks: {}", e); }
        }
    }
}

/// Edits a template's fields. Only the given fields change.
#[allow(clippy::too_many_arguments)]
pub fn cmd_template_edit(
    name: String,
    duration: Option<u32>,
    memo: Option<String>,
    start: Option<String>,
    end: Option<String>,
    priority: Option<String>,
    emergency: Option<bool>,
    silent: bool,
) {
    let mut templates = load_templates();
    let Some(template) = templates.iter_mut().find(|t| t.name == name) else {
        if !silent { eprintln!("Template '{}' not found.", name); }
        return;
    };
    if let Some(d) = duration {
        if !validate_duration(d) {
            if !silent { eprintln!("Duration must be 1-1440 minutes."); }
            return;
        }
        template.duration = Some(d);
    }
    if let Some(m) = memo {
        if !validate_memo(&m) {
            if !silent { eprintln!("Memo must be at most 500 characters."); }
            return;
        }
        template.memo = Some(m);
    }
    if let Some(s) = start { template.start_time = Some(s); }
    if let Some(e) = end { template.end_time = Some(e); }
    if let (Some(s), Some(e)) = (&template.start_time, &template.end_time) {
        if !validate_time_range(s, e) {
            if !silent { eprintln!("Times must be HH:MM."); }
            return;
        }
    }
    if let Some(e) = emergency { template.emergency = e; }
    match parse_priority_arg(priority.as_deref(), silent) {
        Ok(Some(p)) => template.priority = Some(p),
        Ok(None) if priority.is_some() => template.priority = None,
        Ok(None) => {}
        Err(()) => return,
    }
    if let Err(e) = save_templates(&templates) {
        if !silent { eprintln!("Failed to save templates: {}", e); }
    } else if !silent {
        println!("Template '{}' updated.", name);
    }
}

/// Removes a template.
pub fn cmd_template_remove(name: String, silent: bool) {
    let mut templates = load_templates();
    let before = templates.len();
    templates.retain(|t| t.name != name);
    if templates.len() == before {
        if !silent { eprintln!("Template '{}' not found.", name); }
        return;
    }
    if let Err(e) = save_templates(&templates) {
        if !silent { eprintln!("Failed to save templates: {}", e); }
    } else if !silent {
        println!("Template '{}' removed.", name);
    }
}

// ===== Read-models =====

/// Prints completion statistics for today, this week, and this month.
pub fn cmd_stats() {
    let tasks = load_tasks();
    let today = Local::now().date_naive();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![
            Cell::new("Scope").add_attribute(Attribute::Bold),
            Cell::new("Completed").add_attribute(Attribute::Bold),
        ]);
    table.add_row(vec!["Today".to_string(), completed_count(&tasks, Scope::Day, today).to_string()]);
    table.add_row(vec!["This week".to_string(), completed_count(&tasks, Scope::Week, today).to_string()]);
    table.add_row(vec!["This month".to_string(), completed_count(&tasks, Scope::Month, today).to_string()]);
    println!("{table}");
    println!("Overall completion rate: {}%", completion_rate(&tasks));
}

/// Prints remaining free time for today, this week, and this month,
/// plus a 7-day breakdown. Week and month figures are to-date.
pub fn cmd_free() {
    let tasks = load_tasks();
    let today = Local::now().date_naive();

    println!("Free today:      {}", format_minutes(free_time(&tasks, Scope::Day, today)));
    println!("Free this week:  {}", format_minutes(free_time(&tasks, Scope::Week, today)));
    println!("Free this month: {}", format_minutes(free_time(&tasks, Scope::Month, today)));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Date", "Scheduled", "Free"]);
    for day in daily_free_time(&tasks, today) {
        table.add_row(vec![
            day.date.to_string(),
            format_minutes(day.used_time),
            format_minutes(day.free_time),
        ]);
    }
    println!("{table}");
}

/// Prints the top-5 completed tasks by cumulative time invested.
pub fn cmd_ranking() {
    let ranking = calculate_task_ranking(&load_tasks());
    if ranking.is_empty() {
        println!("No ranking data yet.");
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("Total time").add_attribute(Attribute::Bold),
            Cell::new("Times").add_attribute(Attribute::Bold),
        ]);
    for (i, entry) in ranking.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            entry.task_name.clone(),
            format_minutes(entry.total_duration),
            entry.count.to_string(),
        ]);
    }
    println!("{table}");
}

/// Prints the month calendar with per-day task counts and completion
/// rates. Defaults to the current month.
pub fn cmd_calendar(year: Option<i32>, month: Option<u32>) {
    let today = Local::now().date_naive();
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());
    if !(1..=12).contains(&month) {
        eprintln!("Month must be 1-12.");
        return;
    }

    let tasks = load_tasks();
    let grid = MonthGrid::build(&tasks, year, month, today);

    println!("{}-{:02}", grid.year, grid.month);
    println!(
        "Completed {} / {} ({}%)",
        grid.stats.completed_tasks, grid.stats.total_tasks, grid.stats.completion_rate
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
    for week in grid.cells.chunks(7) {
        let row: Vec<Cell> = week
            .iter()
            .map(|cell| {
                if cell.other_month {
                    return Cell::new(cell.day.to_string()).fg(Color::DarkGrey);
                }
                let mut text = cell.day.to_string();
                if cell.task_count > 0 {
                    text.push_str(&format!("\n{} task(s)", cell.task_count));
                }
                if let Some(rate) = cell.completion_rate {
                    text.push_str(&format!("\n{}%", rate));
                }
                let mut c = Cell::new(text);
                if cell.is_today {
                    c = c.add_attribute(Attribute::Bold).fg(Color::Cyan);
                }
                c
            })
            .collect();
        table.add_row(row);
    }
    println!("{table}");
}

/// Prints the 24-hour gauge: occupancy blocks, hour labels per the
/// stored display settings, and the elapsed-day readout.
pub fn cmd_gauge() {
    let tasks = load_tasks();
    let settings = load_settings();
    let now = Local::now();
    let info = TimeInfo::at(now.time());
    let scheduled = scheduled_hours(&tasks, info.hours);

    println!("{}", render_gauge_bar(&scheduled, info.hours));
    let labels = time_labels(settings.time_display_format, settings.time_format_style);
    println!("{}", render_label_line(&labels));
    println!(
        "Now {} | {:.2}% of the day elapsed | {} remaining",
        info.time_string(),
        info.percentage,
        format_minutes(info.remaining_minutes()),
    );
}

/// Prints completion history: last 7 days, last 4 weeks, last 6 months.
pub fn cmd_history() {
    let tasks = load_tasks();
    let today = Local::now().date_naive();

    println!("Daily completions (by completion timestamp):");
    let mut daily = Table::new();
    daily.load_preset(UTF8_FULL).set_header(vec!["Date", "Completed"]);
    for bucket in daily_completed(&tasks, today) {
        daily.add_row(vec![bucket.date.to_string(), bucket.count.to_string()]);
    }
    println!("{daily}");

    println!("Weekly completion rate:");
    let mut weekly = Table::new();
    weekly.load_preset(UTF8_FULL).set_header(vec!["Week of", "Completed", "Total", "Rate"]);
    for week in weekly_completion_rate(&tasks, today) {
        weekly.add_row(vec![
            week.week_start.to_string(),
            week.completed.to_string(),
            week.total.to_string(),
            format!("{}%", week.rate),
        ]);
    }
    println!("{weekly}");

    println!("Monthly history:");
    let mut monthly = Table::new();
    monthly.load_preset(UTF8_FULL).set_header(vec!["Month", "Completed", "Total"]);
    for bucket in monthly_history(&tasks, today) {
        monthly.add_row(vec![
            format!("{}-{:02}", bucket.year, bucket.month),
            bucket.completed.to_string(),
            bucket.total.to_string(),
        ]);
    }
    println!("{monthly}");
}

// ===== Settings =====

/// Prints the stored display settings.
pub fn cmd_settings_show() {
    let settings = load_settings();
    let format = match settings.time_display_format {
        crate::models::TimeDisplayFormat::ShowAll => "all",
        crate::models::TimeDisplayFormat::Every3Hours => "3h",
        crate::models::TimeDisplayFormat::Every6Hours => "6h",
    };
    let style = match settings.time_format_style {
        crate::models::TimeFormatStyle::OneDigit => "1digit",
        crate::models::TimeFormatStyle::TwoDigit => "2digit",
    };
    println!("time-display-format: {}", format);
    println!("time-format-style:   {}", style);
    println!("completed-collapsed: {}", settings.completed_group_collapsed);
}

/// Updates the stored display settings.
pub fn cmd_settings_set(
    format: Option<String>,
    style: Option<String>,
    completed_collapsed: Option<bool>,
    silent: bool,
) {
    let mut settings = load_settings();
    if let Some(f) = format {
        match crate::models::TimeDisplayFormat::parse(&f) {
            Some(f) => settings.time_display_format = f,
            None => {
                if !silent { eprintln!("Unknown format '{}'. Use all, 3h, or 6h.", f); }
                return;
            }
        }
    }
    if let Some(s) = style {
        match crate::models::TimeFormatStyle::parse(&s) {
            Some(s) => settings.time_format_style = s,
            None => {
                if !silent { eprintln!("Unknown style '{}'. Use 1digit or 2digit.", s); }
                return;
            }
        }
    }
    if let Some(c) = completed_collapsed {
        settings.completed_group_collapsed = c;
    }
    if let Err(e) = save_settings(&settings) {
        if !silent { eprintln!("Failed to save settings: {}", e); }
    } else if !silent {
        println!("Settings updated.");
    }
}

/// Deletes all stored data after confirmation.
pub fn cmd_reset(force: bool) {
    if !force {
        print!("Are you sure you want to delete all tasks, routines, templates, and settings? This cannot be undone. [y/N] ");
        let _ = io::stdout().flush();
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return;
        }
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = delete_database() {
        eprintln!("Failed to reset database: {}", e);
    } else {
        println!("Database reset successfully.");
    }
}
