use chrono::{Local, NaiveDate};
use crate::models::{generate_unique_id, Routine, Subtask, Task, Template};
use crate::storage::{load_routines, load_tasks, load_templates, save_tasks};

/// Callback invoked with the full task list after a successful mutation.
pub type TaskObserver = Box<dyn Fn(&[Task])>;

/// Owns the canonical task list's read-modify-write cycle.
///
/// Every mutation reads the entire stored list, modifies it, and writes
/// it back whole; registered observers are notified after each
/// successful write. Mutations referencing an id that no longer exists
/// return `Ok(false)` and leave storage untouched.
#[derive(Default)]
pub struct TaskRepository {
    observers: Vec<TaskObserver>,
}

impl TaskRepository {
    pub fn new() -> TaskRepository {
        TaskRepository::default()
    }

    /// Registers an observer fired after any successful mutation.
    pub fn subscribe(&mut self, observer: TaskObserver) {
        self.observers.push(observer);
    }

    fn notify(&self, tasks: &[Task]) {
        for observer in &self.observers {
            observer(tasks);
        }
    }

    pub fn get_all_tasks(&self) -> Vec<Task> {
        load_tasks()
    }

    pub fn get_tasks_for_date(&self, date: NaiveDate) -> Vec<Task> {
        load_tasks().into_iter().filter(|t| t.created_date == date).collect()
    }

    /// Replaces the stored list wholesale and notifies observers.
    pub fn save_tasks(&self, tasks: &Vec<Task>) -> std::io::Result<()> {
        save_tasks(tasks)?;
        self.notify(tasks);
        Ok(())
    }

    /// Appends `task` to the stored list.
    pub fn add_task(&self, task: Task) -> std::io::Result<()> {
        let mut tasks = load_tasks();
        tasks.push(task);
        self.save_tasks(&tasks)
    }

    /// Flips the completion state of one task.
    ///
    /// This primary path intentionally does not touch `completed_at`;
    /// only `batch_complete` records a completion timestamp, so
    /// read-models keyed off `completed_at` under-count completions
    /// made here.
    pub fn toggle_completed(&self, id: &str) -> std::io::Result<bool> {
        let mut tasks = load_tasks();
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.completed = !task.completed;
        self.save_tasks(&tasks)?;
        Ok(true)
    }

    /// Replaces the stored task with `updated` (matched by id).
    pub fn update_task(&self, updated: Task) -> std::io::Result<bool> {
        let mut tasks = load_tasks();
        let Some(task) = tasks.iter_mut().find(|t| t.id == updated.id) else {
            return Ok(false);
        };
        *task = updated;
        self.save_tasks(&tasks)?;
        Ok(true)
    }

    pub fn delete_task(&self, id: &str) -> std::io::Result<bool> {
        let mut tasks = load_tasks();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.save_tasks(&tasks)?;
        Ok(true)
    }

    /// Copies a task under a fresh id, dated now.
    pub fn duplicate_task(&self, id: &str) -> std::io::Result<Option<Task>> {
        let mut tasks = load_tasks();
        let Some(original) = tasks.iter().find(|t| t.id == id).cloned() else {
            return Ok(None);
        };
        let now = Local::now();
        let mut copy = original;
        copy.id = generate_unique_id(&tasks);
        copy.created_date = now.date_naive();
        copy.created_time = now.format("%H:%M").to_string();
        tasks.push(copy.clone());
        self.save_tasks(&tasks)?;
        Ok(Some(copy))
    }

    /// Appends a subtask to the given task.
    pub fn add_subtask(&self, task_id: &str, text: String) -> std::io::Result<bool> {
        let mut tasks = load_tasks();
        let subtask_id = generate_unique_id(&tasks);
        let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) else {
            return Ok(false);
        };
        task.subtasks.push(Subtask { id: subtask_id, text, completed: false });
        self.save_tasks(&tasks)?;
        Ok(true)
    }

    pub fn toggle_subtask(&self, task_id: &str, subtask_id: &str) -> std::io::Result<bool> {
        let mut tasks = load_tasks();
        let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) else {
            return Ok(false);
        };
        let Some(subtask) = task.subtasks.iter_mut().find(|s| s.id == subtask_id) else {
            return Ok(false);
        };
        subtask.completed = !subtask.completed;
        self.save_tasks(&tasks)?;
        Ok(true)
    }

    /// Marks every listed task completed, stamping `completed_at` with
    /// the current instant. Unknown ids are skipped. Returns how many
    /// tasks were updated.
    pub fn batch_complete(&self, ids: &[String]) -> std::io::Result<usize> {
        let mut tasks = load_tasks();
        let stamp = Local::now().to_rfc3339();
        let mut updated = 0;
        for task in tasks.iter_mut() {
            if ids.iter().any(|id| *id == task.id) {
                task.completed = true;
                task.completed_at = Some(stamp.clone());
                updated += 1;
            }
        }
        if updated > 0 {
            self.save_tasks(&tasks)?;
        }
        Ok(updated)
    }

    /// Removes every listed task. Returns how many were removed.
    pub fn batch_delete(&self, ids: &[String]) -> std::io::Result<usize> {
        let mut tasks = load_tasks();
        let before = tasks.len();
        tasks.retain(|t| !ids.iter().any(|id| *id == t.id));
        let removed = before - tasks.len();
        if removed > 0 {
            self.save_tasks(&tasks)?;
        }
        Ok(removed)
    }

    /// Instantiates a routine as a new task dated now.
    pub fn add_from_routine(&self, routine_id: &str) -> std::io::Result<Option<Task>> {
        let routines = load_routines();
        let Some(routine) = routines.iter().find(|r| r.id == routine_id) else {
            return Ok(None);
        };
        let task = task_from_routine(routine, &load_tasks());
        self.add_task(task.clone())?;
        Ok(Some(task))
    }

    /// Instantiates a template (matched by name) as a new task dated now.
    pub fn add_from_template(&self, name: &str) -> std::io::Result<Option<Task>> {
        let templates = load_templates();
        let Some(template) = templates.iter().find(|t| t.name == name) else {
            return Ok(None);
        };
        let task = task_from_template(template, &load_tasks());
        self.add_task(task.clone())?;
        Ok(Some(task))
    }
}

/// Builds a task from a routine blueprint: name and duration only.
pub fn task_from_routine(routine: &Routine, existing: &[Task]) -> Task {
    let mut task = Task::new(generate_unique_id(existing), routine.name.clone());
    task.duration = Some(routine.duration);
    task
}

/// Builds a task from a template blueprint, carrying the full attribute set.
pub fn task_from_template(template: &Template, existing: &[Task]) -> Task {
    let mut task = Task::new(generate_unique_id(existing), template.name.clone());
    task.duration = template.duration;
    task.memo = template.memo.clone();
    task.start_time = template.start_time.clone();
    task.end_time = template.end_time.clone();
    task.priority = template.priority;
    task.emergency = template.emergency;
    task
}
