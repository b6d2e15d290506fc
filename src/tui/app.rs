use std::time::{Duration, Instant};

use chrono::{Local, Timelike};
use ratatui::widgets::TableState;

use crate::calendar::CalendarViewState;
use crate::filter::{apply_filters, apply_sorting, search_tasks, Debouncer, FilterState};
use crate::gauge::{scheduled_hours, TimeInfo};
use crate::models::{generate_unique_id, Priority, Routine, Settings, Task, Template};
use crate::repository::TaskRepository;
use crate::storage;
use crate::validate::{validate_duration, validate_memo, validate_task_text, validate_time};

const GAUGE_TICK: Duration = Duration::from_secs(60);
const SEARCH_QUIET: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, PartialEq)]
pub enum ViewMode {
    Tasks,
    Routines,
    Templates,
    Calendar,
}

#[derive(Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
    Searching,
}

#[derive(Clone, Copy, PartialEq)]
pub enum InputField {
    Text,
    Memo,
    Duration,
    Start,
    End,
}

impl InputField {
    pub fn label(&self) -> &'static str {
        match self {
            InputField::Text => "Task text",
            InputField::Memo => "Memo",
            InputField::Duration => "Duration (minutes)",
            InputField::Start => "Start time (HH:MM)",
            InputField::End => "End time (HH:MM)",
        }
    }
}

pub struct App {
    pub repo: TaskRepository,
    pub tasks: Vec<Task>,
    pub display: Vec<Task>,
    pub routines: Vec<Routine>,
    pub templates: Vec<Template>,
    pub settings: Settings,
    pub state: TableState,
    pub routine_state: TableState,
    pub template_state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub editing_field: Option<InputField>,
    pub show_completed: bool,
    pub filters: FilterState,
    pub search_query: String,
    pub debouncer: Debouncer,
    pub calendar: CalendarViewState,
    pub scheduled: [bool; 24],
    pub time_info: TimeInfo,
    pub status: Option<String>,
    last_gauge_tick: Instant,
}

impl App {
    pub fn new() -> App {
        let repo = TaskRepository::new();
        let tasks = repo.get_all_tasks();
        let settings = storage::load_settings();
        let mut app = App {
            repo,
            tasks,
            display: Vec::new(),
            routines: storage::load_routines(),
            templates: storage::load_templates(),
            show_completed: !settings.completed_group_collapsed,
            settings,
            state: TableState::default(),
            routine_state: TableState::default(),
            template_state: TableState::default(),
            view_mode: ViewMode::Tasks,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            editing_field: None,
            filters: FilterState::default(),
            search_query: String::new(),
            debouncer: Debouncer::new(SEARCH_QUIET),
            calendar: CalendarViewState::default(),
            scheduled: [false; 24],
            time_info: TimeInfo::at(Local::now().time()),
            status: None,
            last_gauge_tick: Instant::now(),
        };
        app.refresh_gauge();
        app.refresh_display();
        if !app.display.is_empty() {
            app.state.select(Some(0));
        }
        app
    }

    /// Re-reads tasks from disk and rebuilds the visible list.
    pub fn reload(&mut self) {
        self.tasks = self.repo.get_all_tasks();
        self.refresh_display();
        self.refresh_gauge();
    }

    fn refresh_display(&mut self) {
        let mut visible: Vec<Task> = self.tasks.clone();
        visible = apply_filters(visible, &self.filters);
        if !self.search_query.trim().is_empty() {
            visible = search_tasks(visible, &self.search_query);
        }
        apply_sorting(&mut visible, self.filters.sort_by);
        // Incomplete tasks first, then the completed group (hidden when
        // the group is collapsed).
        let (pending, done): (Vec<Task>, Vec<Task>) =
            visible.into_iter().partition(|t| !t.completed);
        self.display = pending;
        if self.show_completed {
            self.display.extend(done);
        }
        let len = self.display.len();
        match self.state.selected() {
            Some(i) if i >= len && len > 0 => self.state.select(Some(len - 1)),
            Some(_) if len == 0 => self.state.select(None),
            None if len > 0 => self.state.select(Some(0)),
            _ => {}
        }
    }

    pub fn refresh_gauge(&mut self) {
        let now = Local::now();
        self.time_info = TimeInfo::at(now.time());
        self.scheduled = scheduled_hours(&self.tasks, now.hour());
        self.last_gauge_tick = Instant::now();
    }

    /// Called every poll cycle; drives the minute gauge tick and the
    /// search debounce.
    pub fn tick(&mut self) {
        if self.last_gauge_tick.elapsed() >= GAUGE_TICK {
            self.refresh_gauge();
        }
        if let Some(query) = self.debouncer.poll(Instant::now()) {
            self.search_query = query;
            self.refresh_display();
        }
    }

    fn active_state(&mut self) -> (&mut TableState, usize) {
        match self.view_mode {
            ViewMode::Tasks | ViewMode::Calendar => (&mut self.state, self.display.len()),
            ViewMode::Routines => (&mut self.routine_state, self.routines.len()),
            ViewMode::Templates => (&mut self.template_state, self.templates.len()),
        }
    }

    pub fn next(&mut self) {
        let (state, len) = self.active_state();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let (state, len) = self.active_state();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) if i == 0 => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn cycle_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Tasks => ViewMode::Routines,
            ViewMode::Routines => ViewMode::Templates,
            ViewMode::Templates => ViewMode::Calendar,
            ViewMode::Calendar => ViewMode::Tasks,
        };
        self.status = None;
    }

    fn selected_task_id(&self) -> Option<String> {
        if self.view_mode != ViewMode::Tasks {
            return None;
        }
        let i = self.state.selected()?;
        self.display.get(i).map(|t| t.id.clone())
    }

    pub fn complete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            if self.repo.toggle_completed(&id).is_ok() {
                self.reload();
            }
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            if self.repo.delete_task(&id).is_ok() {
                self.reload();
            }
        }
    }

    pub fn duplicate_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            if self.repo.duplicate_task(&id).is_ok() {
                self.reload();
            }
        }
    }

    pub fn cycle_priority_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let Some(mut task) = self.tasks.iter().find(|t| t.id == id).cloned() else {
            return;
        };
        task.priority = match task.priority {
            None => Some(Priority::High),
            Some(Priority::High) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::Low),
            Some(Priority::Low) => None,
        };
        if self.repo.update_task(task).is_ok() {
            self.reload();
        }
    }

    pub fn toggle_emergency_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let Some(mut task) = self.tasks.iter().find(|t| t.id == id).cloned() else {
            return;
        };
        task.emergency = !task.emergency;
        if self.repo.update_task(task).is_ok() {
            self.reload();
        }
    }

    pub fn toggle_emergency_filter(&mut self) {
        self.filters.emergency = !self.filters.emergency;
        self.refresh_display();
    }

    pub fn toggle_completed(&mut self) {
        self.show_completed = !self.show_completed;
        self.settings.completed_group_collapsed = !self.show_completed;
        let _ = storage::save_settings(&self.settings);
        self.refresh_display();
    }

    pub fn start_add(&mut self) {
        if self.view_mode != ViewMode::Tasks {
            return;
        }
        self.input_mode = InputMode::Adding;
        self.input_buffer.clear();
        self.status = None;
    }

    pub fn start_edit(&mut self, field: InputField) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
            return;
        };
        self.input_buffer = match field {
            InputField::Text => task.text.clone(),
            InputField::Memo => task.memo.clone().unwrap_or_default(),
            InputField::Duration => task.duration.map(|d| d.to_string()).unwrap_or_default(),
            InputField::Start => task.start_time.clone().unwrap_or_default(),
            InputField::End => task.end_time.clone().unwrap_or_default(),
        };
        self.editing_field = Some(field);
        self.input_mode = InputMode::Editing;
        self.status = None;
    }

    pub fn handle_input(&mut self) {
        let value = self.input_buffer.trim().to_string();
        match self.input_mode {
            InputMode::Adding => {
                if !validate_task_text(&value) {
                    self.status = Some("Task text must be 1-100 characters".to_string());
                    return;
                }
                let task = Task::new(generate_unique_id(&self.tasks), value);
                if self.repo.add_task(task).is_ok() {
                    self.reload();
                }
            }
            InputMode::Editing => {
                if let Err(msg) = self.apply_edit(&value) {
                    self.status = Some(msg);
                    return;
                }
                self.reload();
            }
            _ => {}
        }
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.editing_field = None;
    }

    fn apply_edit(&mut self, value: &str) -> Result<(), String> {
        let field = self.editing_field.ok_or("no field selected")?;
        let id = self.selected_task_id().ok_or("no task selected")?;
        let mut task = self
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or("task not found")?;
        match field {
            InputField::Text => {
                if !validate_task_text(value) {
                    return Err("Task text must be 1-100 characters".to_string());
                }
                task.text = value.to_string();
            }
            InputField::Memo => {
                if !validate_memo(value) {
                    return Err("Memo must be 500 characters or fewer".to_string());
                }
                task.memo = if value.is_empty() { None } else { Some(value.to_string()) };
            }
            InputField::Duration => {
                if value.is_empty() {
                    task.duration = None;
                } else {
                    let minutes: u32 =
                        value.parse().map_err(|_| "Duration must be a number".to_string())?;
                    if !validate_duration(minutes) {
                        return Err("Duration must be 1-1440 minutes".to_string());
                    }
                    task.duration = Some(minutes);
                }
            }
            InputField::Start => {
                if value.is_empty() {
                    task.start_time = None;
                } else {
                    if !validate_time(value) {
                        return Err("Time must be HH:MM".to_string());
                    }
                    task.start_time = Some(value.to_string());
                }
            }
            InputField::End => {
                if value.is_empty() {
                    task.end_time = None;
                } else {
                    if !validate_time(value) {
                        return Err("Time must be HH:MM".to_string());
                    }
                    task.end_time = Some(value.to_string());
                }
            }
        }
        if task.start_time.is_some() != task.end_time.is_some() {
            return Err("Set both start and end time, or neither".to_string());
        }
        self.repo
            .update_task(task)
            .map_err(|e| format!("save failed: {e}"))?;
        Ok(())
    }

    pub fn start_search(&mut self) {
        if self.view_mode != ViewMode::Tasks {
            return;
        }
        self.input_mode = InputMode::Searching;
        self.input_buffer = self.search_query.clone();
    }

    pub fn search_input_changed(&mut self) {
        self.debouncer.submit(self.input_buffer.clone(), Instant::now());
    }

    pub fn finish_search(&mut self, cancelled: bool) {
        self.debouncer.cancel();
        if cancelled {
            self.search_query.clear();
        } else {
            self.search_query = self.input_buffer.trim().to_string();
        }
        self.input_buffer.clear();
        self.input_mode = InputMode::Normal;
        self.refresh_display();
    }

    pub fn use_selected_blueprint(&mut self) {
        match self.view_mode {
            ViewMode::Routines => {
                let Some(i) = self.routine_state.selected() else {
                    return;
                };
                let Some(routine) = self.routines.get(i) else {
                    return;
                };
                let name = routine.name.clone();
                let id = routine.id.clone();
                if self.repo.add_from_routine(&id).is_ok() {
                    self.status = Some(format!("Added task from routine '{name}'"));
                    self.reload();
                }
            }
            ViewMode::Templates => {
                let Some(i) = self.template_state.selected() else {
                    return;
                };
                let Some(template) = self.templates.get(i) else {
                    return;
                };
                let name = template.name.clone();
                if self.repo.add_from_template(&name).is_ok() {
                    self.status = Some(format!("Added task from template '{name}'"));
                    self.reload();
                }
            }
            _ => {}
        }
    }

    pub fn calendar_previous_month(&mut self) {
        if self.view_mode == ViewMode::Calendar {
            self.calendar.previous_month();
        }
    }

    pub fn calendar_next_month(&mut self) {
        if self.view_mode == ViewMode::Calendar {
            self.calendar.next_month();
        }
    }

    pub fn calendar_today(&mut self) {
        if self.view_mode == ViewMode::Calendar {
            self.calendar.current_month();
        }
    }
}
