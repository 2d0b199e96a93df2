//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Kanban board in your terminal.
#[derive(Parser)]
#[command(name = "taskflow", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// SQLite database file. Falls back to TASKFLOW_DB_PATH, then the temp dir.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// JSON configuration file with `engine` and `logging` sections.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Absolute directory for rolling log files. Overrides the config file.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error). Overrides the config file.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Print the board after every change.
    #[arg(long, global = true)]
    pub show: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print every list with its tasks
    Board,
    /// Create, rename and delete lists
    List {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Create, edit, move and delete tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Revert the most recent change
    Undo,
    /// Show the undo history, newest first
    History,
    /// Write the board to a portable JSON file
    Export {
        /// Output path (default: ./taskflow-board-YYYY-MM-DD.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Replace the board with an exported JSON file
    Import {
        /// File produced by `taskflow export`
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ListAction {
    /// Append a list to the board
    Add { title: String },
    /// Change a list title
    Rename { id: u64, title: String },
    /// Delete a list and all its tasks
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Append a task to a list
    Add { list: u64, title: String },
    /// Change title and/or description
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Mark a task as completed
    Done { id: u64 },
    /// Mark a task as not completed
    Reopen { id: u64 },
    /// Move a task to the end of another list
    Move { id: u64, list: u64 },
    /// Delete a task
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
