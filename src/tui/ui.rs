use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use chrono::Local;
use crate::analytics::format_minutes;
use crate::gauge::{render_gauge_bar, render_label_line, time_labels};
use crate::models::Priority;
use super::app::{App, InputMode, ViewMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Gauge
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Help
        ].as_ref())
        .split(f.area());

    render_gauge(f, app, chunks[0]);

    match app.view_mode {
        ViewMode::Tasks => render_tasks(f, app, chunks[1]),
        ViewMode::Routines => render_routines(f, app, chunks[1]),
        ViewMode::Templates => render_templates(f, app, chunks[1]),
        ViewMode::Calendar => render_calendar(f, app, chunks[1]),
    }

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Tasks => "q: Quit | a: Add | Space: Done | d: Del | y: Dup | n: Text | m: Memo | u: Dur | s: Start | o: End | p: Prio | E: Urgent | e: Urgent Filter | c: Completed | /: Search | v: View",
            ViewMode::Routines => "q: Quit | Enter: Create Task from Routine | v: View",
            ViewMode::Templates => "q: Quit | Enter: Create Task from Template | v: View",
            ViewMode::Calendar => "q: Quit | [: Prev Month | ]: Next Month | t: Today | v: View",
        },
        InputMode::Editing | InputMode::Adding => "Enter: Save | Esc: Cancel",
        InputMode::Searching => "Enter: Apply | Esc: Clear",
    };

    let help_line = match &app.status {
        Some(status) => status.as_str(),
        None => help_text,
    };
    let help = Paragraph::new(help_line)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[2]);

    // Render input box if needed
    match app.input_mode {
        InputMode::Editing | InputMode::Adding | InputMode::Searching => {
            let area = centered_rect(60, 3, f.area());
            f.render_widget(Clear, area);

            let title = match app.input_mode {
                InputMode::Adding => "Add Task: Enter Text".to_string(),
                InputMode::Searching => "Search Tasks".to_string(),
                _ => match app.editing_field {
                    Some(field) => format!("Edit {}", field.label()),
                    None => "Edit".to_string(),
                },
            };

            let input = Paragraph::new(app.input_buffer.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title(title));

            f.render_widget(input, area);
        }
        _ => {}
    }
}

fn render_gauge(f: &mut Frame, app: &App, area: Rect) {
    let info = &app.time_info;
    let labels = time_labels(
        app.settings.time_display_format,
        app.settings.time_format_style,
    );
    let text = Text::from(vec![
        Line::from(render_gauge_bar(&app.scheduled, info.hours)),
        Line::from(render_label_line(&labels)),
        Line::from(format!(
            "Now {} | {:.2}% of the day elapsed | {} remaining",
            info.time_string(),
            info.percentage,
            format_minutes(info.remaining_minutes()),
        )),
    ]);
    let gauge = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Today"));
    f.render_widget(gauge, area);
}

fn render_tasks(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .display
        .iter()
        .map(|t| {
            let style = if t.completed {
                Style::default().fg(Color::DarkGray)
            } else if t.emergency {
                Style::default().fg(Color::Red)
            } else {
                match t.priority {
                    Some(Priority::High) => Style::default().fg(Color::Yellow),
                    _ => Style::default(),
                }
            };

            let window = match (&t.start_time, &t.end_time) {
                (Some(s), Some(e)) => format!("{}-{}", s, e),
                _ => String::new(),
            };
            let subtasks = if t.subtasks.is_empty() {
                String::new()
            } else {
                let done = t.subtasks.iter().filter(|s| s.completed).count();
                format!("{}/{}", done, t.subtasks.len())
            };

            Row::new(vec![
                Cell::from(if t.emergency { format!("! {}", t.text) } else { t.text.clone() }),
                Cell::from(t.created_date.to_string()),
                Cell::from(window),
                Cell::from(t.duration.map(format_minutes).unwrap_or_default()),
                Cell::from(t.priority.map(Priority::label).unwrap_or("").to_string()),
                Cell::from(subtasks),
                Cell::from(if t.completed { "Done" } else { "Pending" }),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(24),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Length(8),
    ];

    let title = if app.search_query.is_empty() {
        "Nowtask - Tasks".to_string()
    } else {
        format!("Nowtask - Tasks (search: {})", app.search_query)
    };

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Task", "Created", "Time", "Duration", "Priority", "Sub", "Status"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_routines(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .routines
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.name.clone()),
                Cell::from(format_minutes(r.duration)),
                Cell::from(r.created_date.to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(24),
        Constraint::Length(10),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Name", "Duration", "Created"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title("Nowtask - Routines"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.routine_state);
}

fn render_templates(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .templates
        .iter()
        .map(|t| {
            let window = match (&t.start_time, &t.end_time) {
                (Some(s), Some(e)) => format!("{}-{}", s, e),
                _ => String::new(),
            };
            Row::new(vec![
                Cell::from(t.name.clone()),
                Cell::from(t.duration.map(format_minutes).unwrap_or_default()),
                Cell::from(window),
                Cell::from(t.priority.map(Priority::label).unwrap_or("").to_string()),
                Cell::from(if t.emergency { "yes" } else { "" }),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(24),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Name", "Duration", "Time", "Priority", "Urgent"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title("Nowtask - Templates"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.template_state);
}

fn render_calendar(f: &mut Frame, app: &App, area: Rect) {
    let today = Local::now().date_naive();
    let grid = app.calendar.grid(&app.tasks, today);

    let rows: Vec<Row> = grid
        .cells
        .chunks(7)
        .map(|week| {
            let cells: Vec<Cell> = week
                .iter()
                .map(|c| {
                    let detail = if c.other_month {
                        String::new()
                    } else {
                        match c.completion_rate {
                            Some(rate) => format!("{} / {}%", c.task_count, rate),
                            None => String::new(),
                        }
                    };
                    let style = if c.other_month {
                        Style::default().fg(Color::DarkGray)
                    } else if c.is_today {
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Cell::from(Text::from(vec![
                        Line::from(c.day.to_string()),
                        Line::from(detail),
                    ]))
                    .style(style)
                })
                .collect();
            Row::new(cells).height(2)
        })
        .collect();

    let widths = [Constraint::Ratio(1, 7); 7];
    let title = format!(
        "{} {} | {} of {} done ({}%)",
        month_name(grid.month),
        grid.year,
        grid.stats.completed_tasks,
        grid.stats.total_tasks,
        grid.stats.completion_rate,
    );

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(table, area);
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height - height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
