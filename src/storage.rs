use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;
use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::models::{Routine, Settings, Task, Template};

/// Returns the data directory holding all stored JSON files.
///
/// The location is determined in the following order:
/// 1. `NOWTASK_DB` environment variable (a directory).
/// 2. `~/.local/share/nowtask/` (on Linux).
/// 3. `.` (fallback).
fn data_dir() -> PathBuf {
    std::env::var("NOWTASK_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("nowtask");
        p
    })
}

fn store_path(file: &str) -> PathBuf {
    let p = data_dir();
    if !p.exists() {
        let _ = fs::create_dir_all(&p);
    }
    p.join(file)
}

fn tasks_path() -> PathBuf {
    store_path("tasks.json")
}

fn routines_path() -> PathBuf {
    store_path("routines.json")
}

fn templates_path() -> PathBuf {
    store_path("templates.json")
}

fn settings_path() -> PathBuf {
    store_path("settings.json")
}

fn schema_version_path() -> PathBuf {
    store_path("schema_version.json")
}

/// Loads a JSON value from `path`, returning `default` when the file is
/// missing, unreadable, or fails to parse.
pub fn load_json<T: DeserializeOwned>(path: &PathBuf, default: T) -> T {
    if !path.exists() {
        return default;
    }
    let mut f = match OpenOptions::new().read(true).open(path) {
        Ok(f) => f,
        Err(_) => return default,
    };
    let mut s = String::new();
    if f.read_to_string(&mut s).is_err() {
        return default;
    }
    serde_json::from_str(&s).unwrap_or(default)
}

/// Serializes `value` to `path`, replacing the whole file. Last writer wins.
pub fn save_json<T: Serialize>(path: &PathBuf, value: &T) -> std::io::Result<()> {
    let s = serde_json::to_string_pretty(value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Loads the canonical task list. Missing or corrupt storage yields an
/// empty list.
pub fn load_tasks() -> Vec<Task> {
    load_json(&tasks_path(), Vec::new())
}

/// Replaces the stored task list.
pub fn save_tasks(tasks: &Vec<Task>) -> std::io::Result<()> {
    save_json(&tasks_path(), tasks)
}

/// Loads the raw task array without deserializing into `Task`, for
/// migrations over records that predate the current shape.
pub fn load_raw_tasks() -> Vec<serde_json::Value> {
    load_json(&tasks_path(), Vec::new())
}

pub fn save_raw_tasks(tasks: &Vec<serde_json::Value>) -> std::io::Result<()> {
    save_json(&tasks_path(), tasks)
}

pub fn load_routines() -> Vec<Routine> {
    load_json(&routines_path(), Vec::new())
}

pub fn save_routines(routines: &Vec<Routine>) -> std::io::Result<()> {
    save_json(&routines_path(), routines)
}

pub fn load_templates() -> Vec<Template> {
    load_json(&templates_path(), Vec::new())
}

pub fn save_templates(templates: &Vec<Template>) -> std::io::Result<()> {
    save_json(&templates_path(), templates)
}

pub fn load_settings() -> Settings {
    load_json(&settings_path(), Settings::default())
}

pub fn save_settings(settings: &Settings) -> std::io::Result<()> {
    save_json(&settings_path(), settings)
}

/// Returns the stored schema version, 0 when none has been written yet.
pub fn load_schema_version() -> u32 {
    load_json(&schema_version_path(), 0)
}

pub fn save_schema_version(version: u32) -> std::io::Result<()> {
    save_json(&schema_version_path(), &version)
}

/// Deletes every stored file: tasks, routines, templates, settings, and
/// the schema version marker.
pub fn delete_database() -> std::io::Result<()> {
    for path in [
        tasks_path(),
        routines_path(),
        templates_path(),
        settings_path(),
        schema_version_path(),
    ] {
        if path.exists() {
            fs::remove_file(path)?;
        }
    }
    Ok(())
}
