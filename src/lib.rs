//! tarefas: a to-do list for the terminal.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod storage;
pub mod task;
pub mod theme;
pub mod todo_list;
pub mod ui;
