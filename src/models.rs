use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Task priority levels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort weight: high first; tasks without a priority sort after all of these.
    pub fn order(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// A single checklist entry inside a task. No further nesting.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Subtask {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Represents a single task. Field names stay camelCase on disk so the
/// stored JSON keeps the original application's wire shape.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique identifier, never reused.
    pub id: String,
    /// User-facing title, 1-100 characters.
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// The calendar day the task was created; doubles as its home slot
    /// for all date-bucketed statistics.
    pub created_date: NaiveDate,
    /// Time of day the task was created, "HH:MM".
    pub created_time: String,
    /// RFC 3339 timestamp, set only by the batch-complete path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Optional free-form note, up to 500 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Estimated minutes, 1-1440.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// "HH:MM"; together with end_time defines an occupancy interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// "HH:MM"; an end before the start means the interval wraps past midnight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub emergency: bool,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// Creates a bare task for `text` dated now.
    pub fn new(id: String, text: String) -> Task {
        let now = Local::now();
        Task {
            id,
            text,
            completed: false,
            created_date: now.date_naive(),
            created_time: now.format("%H:%M").to_string(),
            completed_at: None,
            memo: None,
            duration: None,
            start_time: None,
            end_time: None,
            priority: None,
            emergency: false,
            subtasks: Vec::new(),
        }
    }
}

/// A simple reusable blueprint: a name and a duration.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub name: String,
    /// Minutes, 1-1440.
    pub duration: u32,
    pub created_date: NaiveDate,
}

/// A reusable blueprint carrying the full task attribute set.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub emergency: bool,
}

/// How many hour labels the 24-hour gauge shows.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeDisplayFormat {
    #[serde(rename = "all")]
    ShowAll,
    #[serde(rename = "3h")]
    Every3Hours,
    #[default]
    #[serde(rename = "6h")]
    Every6Hours,
}

impl TimeDisplayFormat {
    /// Label spacing in hours.
    pub fn interval(self) -> usize {
        match self {
            TimeDisplayFormat::ShowAll => 1,
            TimeDisplayFormat::Every3Hours => 3,
            TimeDisplayFormat::Every6Hours => 6,
        }
    }

    pub fn parse(s: &str) -> Option<TimeDisplayFormat> {
        match s {
            "all" => Some(TimeDisplayFormat::ShowAll),
            "3h" => Some(TimeDisplayFormat::Every3Hours),
            "6h" => Some(TimeDisplayFormat::Every6Hours),
            _ => None,
        }
    }
}

/// Whether gauge hour labels are zero-padded.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormatStyle {
    #[default]
    #[serde(rename = "1digit")]
    OneDigit,
    #[serde(rename = "2digit")]
    TwoDigit,
}

impl TimeFormatStyle {
    pub fn format_hour(self, hour: usize) -> String {
        match self {
            TimeFormatStyle::OneDigit => format!("{}:00", hour),
            TimeFormatStyle::TwoDigit => format!("{:02}:00", hour),
        }
    }

    pub fn parse(s: &str) -> Option<TimeFormatStyle> {
        match s {
            "1digit" => Some(TimeFormatStyle::OneDigit),
            "2digit" => Some(TimeFormatStyle::TwoDigit),
            _ => None,
        }
    }
}

/// Persisted display preferences and UI state flags.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub time_display_format: TimeDisplayFormat,
    #[serde(default)]
    pub time_format_style: TimeFormatStyle,
    #[serde(default)]
    pub completed_group_collapsed: bool,
}

/// Generates a unique id of the form `{unix millis}_{base36 suffix}`,
/// re-rolling on the unlikely collision with an existing task id.
pub fn generate_unique_id(tasks: &[Task]) -> String {
    let mut attempts: u64 = 0;
    loop {
        let now = Local::now();
        let millis = now.timestamp_millis();
        let seed = now.timestamp_subsec_nanos() as u64 ^ attempts.wrapping_mul(0x9e37_79b9);
        let id = format!("{}_{}", millis, to_base36(seed));
        if !tasks.iter().any(|t| t.id == id) {
            return id;
        }
        attempts += 1;
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_else(|_| "0".to_string())
}
