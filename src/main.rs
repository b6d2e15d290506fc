//! # nowtask
//!
//! A terminal task manager for planning a single 24-hour day. nowtask pairs a
//! scriptable CLI with an interactive TUI dashboard, and keeps every derived
//! view (stats, free time, gauge, ranking, calendar) as a pure recomputation
//! over one JSON task list.
//!
//! ## Features
//!
//! *   **Day-centric tasks**: each task lives on the calendar day it was
//!     created, with an optional duration, time window, memo, priority,
//!     emergency flag, and subtasks.
//! *   **24-hour gauge**: a 24-block occupancy view of the current day,
//!     refreshed every minute.
//! *   **Statistics**: daily/weekly/monthly completion counts, completion
//!     rate, and to-date free-time accounting.
//! *   **Ranking**: top-5 completed task names by cumulative time invested.
//! *   **Calendar**: month grid annotated with per-day task counts and
//!     completion rates.
//! *   **Routines & Templates**: reusable blueprints that instantiate new
//!     tasks dated today.
//! *   **Data persistence**: JSON files in the standard XDG data directory,
//!     with a one-shot schema migration on load.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive dashboard
//! nowtask
//!
//! # Quick entry
//! nowtask add "Write report" --duration 45 --start 09:00 --end 09:45
//!
//! # Toggle completion
//! nowtask complete <ID>
//!
//! # Derived views
//! nowtask stats
//! nowtask free
//! nowtask ranking
//! nowtask calendar
//! nowtask gauge
//! ```
//!
//! ## Data Storage
//!
//! Data lives in your local data directory:
//! *   Linux: `~/.local/share/nowtask/`
//! *   macOS: `~/Library/Application Support/nowtask/`
//! *   Windows: `%APPDATA%\nowtask\`
//!
//! Override the directory with the `NOWTASK_DB` environment variable.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use nowtask::commands::*;
use nowtask::tui::run_tui;

#[derive(Parser)]
#[command(name = "nowtask")]
#[command(about = "Day-centric terminal task manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task text (quoted if it has spaces)
        text: String,
        /// Memo, up to 500 characters
        #[arg(short, long)]
        memo: Option<String>,
        /// Estimated duration in minutes (1-1440)
        #[arg(short, long)]
        duration: Option<u32>,
        /// Start time (HH:MM)
        #[arg(short, long)]
        start: Option<String>,
        /// End time (HH:MM); before start means past midnight
        #[arg(short, long)]
        end: Option<String>,
        /// Priority (high, medium, low)
        #[arg(short, long)]
        priority: Option<String>,
        /// Mark as emergency
        #[arg(short = 'E', long)]
        emergency: bool,
    },
    /// List tasks
    List {
        /// Show completed tasks too
        #[arg(short, long)]
        all: bool,
        /// Only emergency tasks
        #[arg(short = 'E', long)]
        emergency: bool,
        /// Only this priority (high, medium, low)
        #[arg(short, long)]
        priority: Option<String>,
        /// Sort order (created, priority, time)
        #[arg(long)]
        sort: Option<String>,
        /// Search text and memos
        #[arg(long)]
        search: Option<String>,
    },
    /// Toggle a task's completion state
    Complete {
        id: String,
    },
    /// Remove a task
    Remove {
        id: String,
    },
    /// Edit a task
    Edit {
        id: String,
        /// New task text
        #[arg(short, long)]
        text: Option<String>,
        /// New memo
        #[arg(short, long)]
        memo: Option<String>,
        /// New duration in minutes
        #[arg(short, long)]
        duration: Option<u32>,
        /// New start time (HH:MM)
        #[arg(short, long)]
        start: Option<String>,
        /// New end time (HH:MM)
        #[arg(short, long)]
        end: Option<String>,
        /// New priority (high, medium, low, none)
        #[arg(short, long)]
        priority: Option<String>,
        /// Set or clear the emergency flag
        #[arg(short = 'E', long)]
        emergency: Option<bool>,
    },
    /// Duplicate a task under a fresh id, dated today
    Duplicate {
        id: String,
    },
    /// Manage subtasks
    Subtask {
        #[command(subcommand)]
        command: SubtaskCommands,
    },
    /// Batch operations over several tasks
    Batch {
        #[command(subcommand)]
        command: BatchCommands,
    },
    /// Manage routines (name + duration blueprints)
    Routine {
        #[command(subcommand)]
        command: RoutineCommands,
    },
    /// Manage templates (full task blueprints)
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Show completion statistics
    Stats,
    /// Show free-time accounting
    Free,
    /// Show the top-5 time-invested ranking
    Ranking,
    /// Show the month calendar
    Calendar {
        /// Year (defaults to current)
        #[arg(short, long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to current)
        #[arg(short, long)]
        month: Option<u32>,
    },
    /// Show the 24-hour gauge
    Gauge,
    /// Show completion history (7 days, 4 weeks, 6 months)
    History,
    /// Show or change display settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
    /// Reset the database (delete all stored data)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open the interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum SubtaskCommands {
    /// Add a subtask to a task
    Add {
        task_id: String,
        text: String,
    },
    /// Toggle a subtask's completion state
    Toggle {
        task_id: String,
        subtask_id: String,
    },
}

#[derive(Subcommand)]
enum BatchCommands {
    /// Mark several tasks completed (records completion timestamps)
    Complete {
        ids: Vec<String>,
    },
    /// Remove several tasks
    Delete {
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
enum RoutineCommands {
    /// Add a new routine
    Add {
        name: String,
        /// Duration in minutes (1-1440)
        #[arg(short, long)]
        duration: u32,
    },
    /// List routines
    List,
    /// Create a task from a routine
    Use {
        id: String,
    },
    /// Edit a routine
    Edit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        duration: Option<u32>,
    },
    /// Remove a routine
    Remove {
        id: String,
    },
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// Add a new template
    Add {
        name: String,
        #[arg(short, long)]
        duration: Option<u32>,
        #[arg(short, long)]
        memo: Option<String>,
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(short = 'E', long)]
        emergency: bool,
    },
    /// List templates
    List,
    /// Create a task from a template
    Use {
        name: String,
    },
    /// Edit a template
    Edit {
        name: String,
        #[arg(short, long)]
        duration: Option<u32>,
        #[arg(short, long)]
        memo: Option<String>,
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(short = 'E', long)]
        emergency: Option<bool>,
    },
    /// Remove a template
    Remove {
        name: String,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show the stored settings
    Show,
    /// Change settings
    Set {
        /// Gauge label spacing (all, 3h, 6h)
        #[arg(long)]
        format: Option<String>,
        /// Gauge label style (1digit, 2digit)
        #[arg(long)]
        style: Option<String>,
        /// Collapse the completed task group
        #[arg(long)]
        completed_collapsed: Option<bool>,
    },
}

fn main() {
    let cli = Cli::parse();
    ensure_migrated(false);
    match cli.command {
        Some(Commands::Add { text, memo, duration, start, end, priority, emergency }) => {
            cmd_add(text, memo, duration, start, end, priority, emergency, false)
        }
        Some(Commands::List { all, emergency, priority, sort, search }) => {
            cmd_list(all, emergency, priority, sort, search)
        }
        Some(Commands::Complete { id }) => cmd_complete(id, false),
        Some(Commands::Remove { id }) => cmd_remove(id, false),
        Some(Commands::Edit { id, text, memo, duration, start, end, priority, emergency }) => {
            cmd_edit(id, text, memo, duration, start, end, priority, emergency, false)
        }
        Some(Commands::Duplicate { id }) => cmd_duplicate(id, false),
        Some(Commands::Subtask { command }) => match command {
            SubtaskCommands::Add { task_id, text } => cmd_subtask_add(task_id, text, false),
            SubtaskCommands::Toggle { task_id, subtask_id } => {
                cmd_subtask_toggle(task_id, subtask_id, false)
            }
        },
        Some(Commands::Batch { command }) => match command {
            BatchCommands::Complete { ids } => cmd_batch_complete(ids, false),
            BatchCommands::Delete { ids } => cmd_batch_delete(ids, false),
        },
        Some(Commands::Routine { command }) => match command {
            RoutineCommands::Add { name, duration } => cmd_routine_add(name, duration, false),
            RoutineCommands::List => cmd_routine_list(),
            RoutineCommands::Use { id } => cmd_routine_use(id, false),
            RoutineCommands::Edit { id, name, duration } => {
                cmd_routine_edit(id, name, duration, false)
            }
            RoutineCommands::Remove { id } => cmd_routine_remove(id, false),
        },
        Some(Commands::Template { command }) => match command {
            TemplateCommands::Add { name, duration, memo, start, end, priority, emergency } => {
                cmd_template_add(name, duration, memo, start, end, priority, emergency, false)
            }
            TemplateCommands::List => cmd_template_list(),
            TemplateCommands::Use { name } => cmd_template_use(name, false),
            TemplateCommands::Edit { name, duration, memo, start, end, priority, emergency } => {
                cmd_template_edit(name, duration, memo, start, end, priority, emergency, false)
            }
            TemplateCommands::Remove { name } => cmd_template_remove(name, false),
        },
        Some(Commands::Stats) => cmd_stats(),
        Some(Commands::Free) => cmd_free(),
        Some(Commands::Ranking) => cmd_ranking(),
        Some(Commands::Calendar { year, month }) => cmd_calendar(year, month),
        Some(Commands::Gauge) => cmd_gauge(),
        Some(Commands::History) => cmd_history(),
        Some(Commands::Settings { command }) => match command {
            None | Some(SettingsCommands::Show) => cmd_settings_show(),
            Some(SettingsCommands::Set { format, style, completed_collapsed }) => {
                cmd_settings_set(format, style, completed_collapsed, false)
            }
        },
        Some(Commands::Reset { force }) => cmd_reset(force),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "nowtask", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui() {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
