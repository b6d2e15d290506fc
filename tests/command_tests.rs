use nowtask::commands::*;
use nowtask::migration::run_migrations;
use nowtask::repository::TaskRepository;
use nowtask::storage::{
    load_routines, load_schema_version, load_settings, load_tasks, load_templates,
};
use std::cell::RefCell;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;

// Use a mutex to ensure tests run serially since they modify the environment variable
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_db<F>(test_name: &str, f: F)
where
    F: FnOnce(PathBuf),
{
    let _guard = TEST_MUTEX.lock().unwrap();

    let mut db_dir = env::temp_dir();
    db_dir.push(format!("nowtask_test_{}", test_name));

    // Clean up before test
    if db_dir.exists() {
        fs::remove_dir_all(&db_dir).unwrap();
    }
    fs::create_dir_all(&db_dir).unwrap();

    // Set env var
    env::set_var("NOWTASK_DB", db_dir.to_str().unwrap());

    // Run test
    f(db_dir.clone());

    // Clean up after test
    if db_dir.exists() {
        fs::remove_dir_all(&db_dir).unwrap();
    }
    env::remove_var("NOWTASK_DB");
}

#[test]
fn test_add_and_list() {
    with_test_db("add_list", |_path| {
        cmd_add("Test Task".into(), Some("notes".into()), Some(30), None, None, None, false, true);

        let tasks = load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Test Task");
        assert_eq!(tasks[0].memo, Some("notes".into()));
        assert_eq!(tasks[0].duration, Some(30));
        assert!(!tasks[0].completed);
        assert!(!tasks[0].id.is_empty());
    });
}

#[test]
fn test_add_rejects_invalid_input() {
    with_test_db("add_invalid", |_path| {
        // Empty text
        cmd_add("   ".into(), None, None, None, None, None, false, true);
        // Duration out of range
        cmd_add("Task".into(), None, Some(2000), None, None, None, false, true);
        // Start without end
        cmd_add("Task".into(), None, None, Some("09:00".into()), None, None, false, true);
        // Malformed time
        cmd_add("Task".into(), None, None, Some("9:00".into()), Some("10:00".into()), None, false, true);

        assert!(load_tasks().is_empty());
    });
}

#[test]
fn test_complete_toggles_without_timestamp() {
    with_test_db("complete", |_path| {
        cmd_add("Toggle me".into(), None, None, None, None, None, false, true);
        let id = load_tasks()[0].id.clone();

        cmd_complete(id.clone(), true);
        let tasks = load_tasks();
        assert!(tasks[0].completed);
        // The single-task toggle never records a completion timestamp.
        assert!(tasks[0].completed_at.is_none());

        cmd_complete(id, true);
        assert!(!load_tasks()[0].completed);
    });
}

#[test]
fn test_batch_complete_stamps_completed_at() {
    with_test_db("batch_complete", |_path| {
        cmd_add("One".into(), None, None, None, None, None, false, true);
        cmd_add("Two".into(), None, None, None, None, None, false, true);
        cmd_add("Three".into(), None, None, None, None, None, false, true);
        let tasks = load_tasks();
        let ids = vec![tasks[0].id.clone(), tasks[2].id.clone()];

        cmd_batch_complete(ids, true);

        let tasks = load_tasks();
        assert!(tasks[0].completed);
        assert!(tasks[0].completed_at.is_some());
        assert!(!tasks[1].completed);
        assert!(tasks[1].completed_at.is_none());
        assert!(tasks[2].completed);
        assert!(tasks[2].completed_at.is_some());
    });
}

#[test]
fn test_batch_delete() {
    with_test_db("batch_delete", |_path| {
        cmd_add("Keep".into(), None, None, None, None, None, false, true);
        cmd_add("Drop 1".into(), None, None, None, None, None, false, true);
        cmd_add("Drop 2".into(), None, None, None, None, None, false, true);
        let tasks = load_tasks();
        let ids = vec![tasks[1].id.clone(), tasks[2].id.clone(), "missing".into()];

        cmd_batch_delete(ids, true);

        let tasks = load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Keep");
    });
}

#[test]
fn test_edit_task() {
    with_test_db("edit", |_path| {
        cmd_add("Before".into(), None, None, None, None, None, false, true);
        let id = load_tasks()[0].id.clone();

        cmd_edit(
            id.clone(),
            Some("After".into()),
            Some("memo".into()),
            Some(45),
            Some("09:00".into()),
            Some("10:30".into()),
            Some("high".into()),
            Some(true),
            true,
        );

        let task = &load_tasks()[0];
        assert_eq!(task.text, "After");
        assert_eq!(task.memo, Some("memo".into()));
        assert_eq!(task.duration, Some(45));
        assert_eq!(task.start_time, Some("09:00".into()));
        assert_eq!(task.end_time, Some("10:30".into()));
        assert!(task.emergency);

        // Clearing the priority with "none"
        cmd_edit(id, None, None, None, None, None, Some("none".into()), None, true);
        assert!(load_tasks()[0].priority.is_none());
    });
}

#[test]
fn test_remove_task() {
    with_test_db("remove", |_path| {
        cmd_add("Doomed".into(), None, None, None, None, None, false, true);
        let id = load_tasks()[0].id.clone();

        cmd_remove(id, true);
        assert!(load_tasks().is_empty());
    });
}

#[test]
fn test_duplicate_task() {
    with_test_db("duplicate", |_path| {
        cmd_add("Original".into(), Some("note".into()), Some(60), None, None, Some("low".into()), false, true);
        let id = load_tasks()[0].id.clone();

        cmd_duplicate(id.clone(), true);

        let tasks = load_tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].text, "Original");
        assert_eq!(tasks[1].memo, Some("note".into()));
        assert_eq!(tasks[1].duration, Some(60));
        assert_ne!(tasks[1].id, id);
    });
}

#[test]
fn test_subtasks() {
    with_test_db("subtasks", |_path| {
        cmd_add("Parent".into(), None, None, None, None, None, false, true);
        let id = load_tasks()[0].id.clone();

        cmd_subtask_add(id.clone(), "Step 1".into(), true);
        cmd_subtask_add(id.clone(), "Step 2".into(), true);

        let task = &load_tasks()[0];
        assert_eq!(task.subtasks.len(), 2);
        assert!(!task.subtasks[0].completed);

        let sub_id = task.subtasks[0].id.clone();
        cmd_subtask_toggle(id, sub_id, true);

        let task = &load_tasks()[0];
        assert!(task.subtasks[0].completed);
        assert!(!task.subtasks[1].completed);
    });
}

#[test]
fn test_observer_notified_on_mutation() {
    with_test_db("observer", |_path| {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);

        let mut repo = TaskRepository::new();
        repo.subscribe(Box::new(move |tasks| {
            seen_clone.borrow_mut().push(tasks.len());
        }));

        let task = nowtask::models::Task::new("t1".into(), "Watched".into());
        repo.add_task(task).unwrap();
        repo.toggle_completed("t1").unwrap();
        // Unknown id: no write, no notification.
        repo.toggle_completed("missing").unwrap();

        assert_eq!(*seen.borrow(), vec![1, 1]);
    });
}

#[test]
fn test_tasks_for_date() {
    with_test_db("tasks_for_date", |_path| {
        let repo = TaskRepository::new();
        let today_task = nowtask::models::Task::new("t1".into(), "Today".into());
        let mut old_task = nowtask::models::Task::new("t2".into(), "Last week".into());
        old_task.created_date = today_task.created_date - chrono::Duration::days(7);
        let date = today_task.created_date;
        repo.add_task(today_task).unwrap();
        repo.add_task(old_task).unwrap();

        let found = repo.get_tasks_for_date(date);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Today");
    });
}

#[test]
fn test_routine_lifecycle() {
    with_test_db("routine", |_path| {
        cmd_routine_add("Morning run".into(), 45, true);

        let routines = load_routines();
        assert_eq!(routines.len(), 1);
        assert_eq!(routines[0].name, "Morning run");
        assert_eq!(routines[0].duration, 45);

        let id = routines[0].id.clone();
        cmd_routine_use(id.clone(), true);

        let tasks = load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Morning run");
        assert_eq!(tasks[0].duration, Some(45));

        cmd_routine_edit(id.clone(), Some("Evening run".into()), Some(30), true);
        let routines = load_routines();
        assert_eq!(routines[0].name, "Evening run");
        assert_eq!(routines[0].duration, 30);

        cmd_routine_remove(id, true);
        assert!(load_routines().is_empty());
    });
}

#[test]
fn test_template_creation_and_usage() {
    with_test_db("template_usage", |_path| {
        cmd_template_add(
            "deep work".into(),
            Some(120),
            Some("no interruptions".into()),
            Some("09:00".into()),
            Some("11:00".into()),
            Some("high".into()),
            true,
            true,
        );

        let templates = load_templates();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "deep work");
        assert_eq!(templates[0].duration, Some(120));

        // Duplicate names are rejected
        cmd_template_add("deep work".into(), None, None, None, None, None, false, true);
        assert_eq!(load_templates().len(), 1);

        cmd_template_use("deep work".into(), true);

        let tasks = load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "deep work");
        assert_eq!(tasks[0].duration, Some(120));
        assert_eq!(tasks[0].memo, Some("no interruptions".into()));
        assert_eq!(tasks[0].start_time, Some("09:00".into()));
        assert_eq!(tasks[0].end_time, Some("11:00".into()));
        assert!(tasks[0].emergency);
    });
}

#[test]
fn test_template_remove() {
    with_test_db("template_remove", |_path| {
        cmd_template_add("temp".into(), None, None, None, None, None, false, true);
        cmd_template_remove("temp".into(), true);
        assert!(load_templates().is_empty());
    });
}

#[test]
fn test_settings_roundtrip() {
    with_test_db("settings", |_path| {
        cmd_settings_set(Some("3h".into()), Some("2digit".into()), Some(true), true);

        let settings = load_settings();
        assert_eq!(settings.time_display_format, nowtask::models::TimeDisplayFormat::Every3Hours);
        assert_eq!(settings.time_format_style, nowtask::models::TimeFormatStyle::TwoDigit);
        assert!(settings.completed_group_collapsed);

        // Unknown values leave everything untouched
        cmd_settings_set(Some("9h".into()), None, None, true);
        let settings = load_settings();
        assert_eq!(settings.time_display_format, nowtask::models::TimeDisplayFormat::Every3Hours);
    });
}

#[test]
fn test_migration_fills_missing_fields() {
    with_test_db("migration_v0", |path| {
        // A pre-versioning store: records missing most fields.
        let raw = r#"[{"text": "Old task"}, {"completed": true}]"#;
        fs::write(path.join("tasks.json"), raw).unwrap();

        run_migrations().unwrap();

        assert_eq!(load_schema_version(), 1);
        let tasks = load_tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "Old task");
        assert!(!tasks[0].completed);
        assert!(!tasks[0].id.is_empty());
        assert_eq!(tasks[0].created_time, "00:00");
        assert!(tasks[1].completed);
        assert_eq!(tasks[1].text, "");
        assert_ne!(tasks[0].id, tasks[1].id);
    });
}

#[test]
fn test_migration_runs_once() {
    with_test_db("migration_gate", |path| {
        run_migrations().unwrap();
        assert_eq!(load_schema_version(), 1);

        // A record added behind the store's back after migration must
        // not be rewritten; the version gate skips the v0 upgrade.
        let raw = r#"[{"text": "Late arrival"}]"#;
        fs::write(path.join("tasks.json"), raw).unwrap();

        run_migrations().unwrap();
        let raw_after = fs::read_to_string(path.join("tasks.json")).unwrap();
        assert_eq!(raw_after, raw);
    });
}

#[test]
fn test_migration_empty_store() {
    with_test_db("migration_empty", |_path| {
        run_migrations().unwrap();
        assert_eq!(load_schema_version(), 1);
        assert!(load_tasks().is_empty());
    });
}
