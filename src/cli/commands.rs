//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tarefas")]
#[command(about = "To-do list for the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the task list and theme (default: per-user data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file (default: per-user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Without a command the interactive list opens
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task at the end of the list
    Add {
        text: String,

        /// pessoal, trabalho, estudo, or any other name
        #[arg(short, long)]
        category: Option<String>,

        /// baixa, media or alta
        #[arg(short, long)]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
    },

    /// Show tasks, optionally filtered
    List {
        /// all, pending or done
        #[arg(short, long, default_value = "all")]
        status: String,

        /// Only this category
        #[arg(short, long)]
        category: Option<String>,

        /// Case-insensitive text search
        #[arg(short = 'q', long)]
        search: Option<String>,
    },

    /// Mark a task done, or pending again
    Toggle {
        /// Position as shown by `list`
        position: usize,
    },

    /// Delete a task
    Remove {
        /// Position as shown by `list`
        position: usize,
    },

    /// Replace the text of a task
    Edit {
        /// Position as shown by `list`
        position: usize,

        text: String,
    },

    /// Show total, pending and done counts
    Stats,

    /// Show or change the color theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeAction {
    Light,
    Dark,
    Toggle,
}
