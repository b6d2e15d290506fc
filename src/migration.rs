use chrono::Local;
use serde_json::{json, Value};
use crate::storage::{load_raw_tasks, load_schema_version, save_raw_tasks, save_schema_version};

/// Schema version the code expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Runs any pending one-shot upgrades of the stored data.
///
/// The version marker advances only after a step completes and its
/// rewrite is saved, so a failed step retries on the next load.
pub fn run_migrations() -> std::io::Result<()> {
    let stored = load_schema_version();
    if stored < 1 {
        migrate_v0_to_v1()?;
        save_schema_version(1)?;
    }
    Ok(())
}

/// v0 -> v1: every task record gains non-null `id`, `text`,
/// `completed`, `createdDate`, and `createdTime`, defaulting whatever
/// is missing. Operates on the raw JSON array because v0 records
/// predate the typed model. Idempotent: fields already present are
/// left untouched.
fn migrate_v0_to_v1() -> std::io::Result<()> {
    let mut tasks = load_raw_tasks();
    if tasks.is_empty() {
        return Ok(());
    }

    let today = Local::now().date_naive().to_string();
    let mut next_fallback_id: u64 = 0;
    let existing_ids: Vec<String> = tasks
        .iter()
        .filter_map(|t| t.get("id").and_then(Value::as_str).map(String::from))
        .collect();

    for task in tasks.iter_mut() {
        let Some(record) = task.as_object_mut() else { continue };

        if !record.get("id").is_some_and(|v| v.is_string()) {
            let id = fresh_migration_id(&existing_ids, &mut next_fallback_id);
            record.insert("id".to_string(), json!(id));
        }
        if !record.get("text").is_some_and(|v| v.is_string()) {
            record.insert("text".to_string(), json!(""));
        }
        if !record.get("completed").is_some_and(|v| v.is_boolean()) {
            record.insert("completed".to_string(), json!(false));
        }
        if !record.get("createdDate").is_some_and(|v| v.is_string()) {
            record.insert("createdDate".to_string(), json!(today));
        }
        if !record.get("createdTime").is_some_and(|v| v.is_string()) {
            record.insert("createdTime".to_string(), json!("00:00"));
        }
    }

    save_raw_tasks(&tasks)
}

fn fresh_migration_id(existing: &[String], counter: &mut u64) -> String {
    loop {
        let id = format!("{}_m{}", Local::now().timestamp_millis(), counter);
        *counter += 1;
        if !existing.iter().any(|e| *e == id) {
            return id;
        }
    }
}
