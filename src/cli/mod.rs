//! Command line interface

pub mod commands;
pub mod handlers;

pub use commands::{Cli, Commands, ThemeAction};
pub use handlers::run_command;
