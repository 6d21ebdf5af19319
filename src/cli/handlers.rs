//! Non-interactive command handlers

use super::commands::{Commands, ThemeAction};
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::filter::{CategoryFilter, StatusFilter, TaskFilter};
use crate::storage::{self, KeyValueStore};
use crate::task::{format_due_date, parse_due_date, Category, Priority, TaskDraft, TaskEntry};
use crate::theme::{self, Theme};
use crate::todo_list::TodoList;
use std::io::Write;

/// Positions on the command line are 1-based, as `list` prints them.
fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| AppError::InvalidArgument("Positions start at 1".to_string()))
}

pub fn format_entry(position: usize, entry: &TaskEntry, date_format: &str) -> String {
    let check = if entry.is_completed() { "[x]" } else { "[ ]" };
    let mut line = format!(
        "{position:>3}. {check} {}  {}  {}",
        entry.text(),
        entry.priority().label(),
        entry.category()
    );
    if let Some(due) = entry.due_date() {
        line.push_str("  due ");
        line.push_str(&format_due_date(due, date_format));
    }
    line
}

pub fn run_command<S, W>(
    command: Commands,
    store: &mut S,
    config: &AppConfig,
    out: &mut W,
) -> Result<()>
where
    S: KeyValueStore,
    W: Write,
{
    match command {
        Commands::Add {
            text,
            category,
            priority,
            due,
        } => {
            let draft = TaskDraft {
                text,
                category: category
                    .map(|c| Category::from(c.trim().to_lowercase()))
                    .unwrap_or_else(|| config.default_category.clone()),
                priority: match priority {
                    Some(p) => p.parse::<Priority>().map_err(AppError::InvalidArgument)?,
                    None => config.default_priority,
                },
                due_date: due.as_deref().map(parse_due_date).transpose()?,
            };
            let mut list = storage::load_tasks(&*store)?;
            let added = list.add_task(draft).map(|task| task.text.clone());
            match added {
                Some(text) => {
                    storage::save_tasks(store, &list)?;
                    writeln!(out, "Added task {}: {text}", list.len())?;
                }
                None => writeln!(out, "Nothing added: task text is empty")?,
            }
            Ok(())
        }
        Commands::List {
            status,
            category,
            search,
        } => {
            let filter = TaskFilter {
                status: status
                    .parse::<StatusFilter>()
                    .map_err(AppError::InvalidArgument)?,
                category: category
                    .as_deref()
                    .map(CategoryFilter::from)
                    .unwrap_or_default(),
                search: search.unwrap_or_default(),
            };
            let list = storage::load_tasks(&*store)?;
            list_tasks(&list, &filter, config, out)
        }
        Commands::Toggle { position } => {
            let index = to_index(position)?;
            let mut list = storage::load_tasks(&*store)?;
            let completed = list.toggle_task(index)?;
            storage::save_tasks(store, &list)?;
            let state = if completed { "done" } else { "pending" };
            writeln!(out, "Task {position} marked {state}")?;
            Ok(())
        }
        Commands::Remove { position } => {
            let index = to_index(position)?;
            let mut list = storage::load_tasks(&*store)?;
            let removed = list.remove_task(index)?;
            storage::save_tasks(store, &list)?;
            writeln!(out, "Removed task {position}: {}", removed.text())?;
            Ok(())
        }
        Commands::Edit { position, text } => {
            let index = to_index(position)?;
            let mut list = storage::load_tasks(&*store)?;
            if list.edit_task(index, Some(&text))? {
                storage::save_tasks(store, &list)?;
                writeln!(out, "Updated task {position}")?;
            } else {
                writeln!(out, "Task {position} unchanged: text is empty")?;
            }
            Ok(())
        }
        Commands::Stats => {
            let counts = storage::load_tasks(&*store)?.counts();
            writeln!(out, "total: {}", counts.total)?;
            writeln!(out, "pending: {}", counts.pending)?;
            writeln!(out, "done: {}", counts.done)?;
            Ok(())
        }
        Commands::Theme { action } => {
            let current =
                theme::initial_theme(store, Theme::detect_system(), config.default_theme)?;
            let theme = match action {
                None => current,
                Some(ThemeAction::Toggle) => theme::toggle_theme(store, current)?,
                Some(ThemeAction::Light) => set_theme(store, Theme::Light)?,
                Some(ThemeAction::Dark) => set_theme(store, Theme::Dark)?,
            };
            writeln!(out, "{theme}")?;
            Ok(())
        }
    }
}

fn set_theme(store: &mut impl KeyValueStore, theme: Theme) -> Result<Theme> {
    storage::mark_theme_manually_set(store)?;
    storage::save_theme(store, theme)?;
    Ok(theme)
}

fn list_tasks(
    list: &TodoList,
    filter: &TaskFilter,
    config: &AppConfig,
    out: &mut impl Write,
) -> Result<()> {
    let shown = filter.apply(list);
    if list.is_empty() {
        writeln!(out, "No tasks")?;
        return Ok(());
    }
    if shown.is_empty() {
        writeln!(out, "No matching tasks")?;
    }
    for (index, entry) in shown {
        writeln!(out, "{}", format_entry(index + 1, entry, &config.date_format))?;
    }
    let counts = list.counts();
    writeln!(
        out,
        "\n{} total, {} pending, {} done",
        counts.total, counts.pending, counts.done
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn run(store: &mut MemoryStore, command: Commands) -> Result<String> {
        let mut out = Vec::new();
        run_command(command, store, &AppConfig::default(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn add(store: &mut MemoryStore, text: &str) {
        run(
            store,
            Commands::Add {
                text: text.into(),
                category: None,
                priority: None,
                due: None,
            },
        )
        .unwrap();
    }

    #[test]
    fn add_then_list() {
        let mut store = MemoryStore::new();
        let output = run(
            &mut store,
            Commands::Add {
                text: "Entregar trabalho".into(),
                category: Some("Trabalho".into()),
                priority: Some("alta".into()),
                due: Some("2025-08-15".into()),
            },
        )
        .unwrap();
        assert_eq!(output, "Added task 1: Entregar trabalho\n");

        let output = run(
            &mut store,
            Commands::List {
                status: "all".into(),
                category: None,
                search: None,
            },
        )
        .unwrap();
        assert!(output.contains("  1. [ ] Entregar trabalho  ALTA  trabalho  due 15/08/2025"));
        assert!(output.contains("1 total, 1 pending, 0 done"));
    }

    #[test]
    fn blank_add_saves_nothing() {
        let mut store = MemoryStore::new();
        let output = run(
            &mut store,
            Commands::Add {
                text: "   ".into(),
                category: None,
                priority: None,
                due: None,
            },
        )
        .unwrap();
        assert!(output.contains("Nothing added"));
        assert_eq!(store.get(storage::TASKS_KEY).unwrap(), None);
    }

    #[test]
    fn bad_due_date_is_rejected() {
        let mut store = MemoryStore::new();
        let err = run(
            &mut store,
            Commands::Add {
                text: "x".into(),
                category: None,
                priority: None,
                due: Some("amanhã".into()),
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidDate(_)));
    }

    #[test]
    fn toggle_remove_edit_use_one_based_positions() {
        let mut store = MemoryStore::new();
        add(&mut store, "a");
        add(&mut store, "b");
        add(&mut store, "c");

        assert_eq!(
            run(&mut store, Commands::Toggle { position: 2 }).unwrap(),
            "Task 2 marked done\n"
        );
        assert_eq!(
            run(&mut store, Commands::Remove { position: 1 }).unwrap(),
            "Removed task 1: a\n"
        );
        run(
            &mut store,
            Commands::Edit {
                position: 2,
                text: "c!".into(),
            },
        )
        .unwrap();

        let list = storage::load_tasks(&store).unwrap();
        let texts: Vec<&str> = list.entries().iter().map(TaskEntry::text).collect();
        assert_eq!(texts, vec!["b", "c!"]);
        assert!(list.get(0).unwrap().is_completed());
    }

    #[test]
    fn position_zero_and_past_end_fail() {
        let mut store = MemoryStore::new();
        add(&mut store, "a");
        assert!(matches!(
            run(&mut store, Commands::Toggle { position: 0 }),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            run(&mut store, Commands::Remove { position: 2 }),
            Err(AppError::NoSuchTask(1))
        ));
    }

    #[test]
    fn list_filters_and_keeps_positions() {
        let mut store = MemoryStore::new();
        add(&mut store, "Comprar leite");
        add(&mut store, "Estudar álgebra");
        run(&mut store, Commands::Toggle { position: 1 }).unwrap();

        let output = run(
            &mut store,
            Commands::List {
                status: "pending".into(),
                category: None,
                search: None,
            },
        )
        .unwrap();
        assert!(output.contains("  2. [ ] Estudar álgebra"));
        assert!(!output.contains("Comprar leite"));

        let output = run(
            &mut store,
            Commands::List {
                status: "all".into(),
                category: Some("estudo".into()),
                search: None,
            },
        )
        .unwrap();
        assert!(output.contains("No matching tasks"));
    }

    #[test]
    fn stats_counts() {
        let mut store = MemoryStore::new();
        add(&mut store, "a");
        add(&mut store, "b");
        run(&mut store, Commands::Toggle { position: 2 }).unwrap();
        assert_eq!(
            run(&mut store, Commands::Stats).unwrap(),
            "total: 2\npending: 1\ndone: 1\n"
        );
    }

    #[test]
    fn theme_set_and_toggle() {
        let mut store = MemoryStore::new();
        assert_eq!(
            run(
                &mut store,
                Commands::Theme {
                    action: Some(ThemeAction::Light)
                }
            )
            .unwrap(),
            "light\n"
        );
        assert_eq!(
            run(&mut store, Commands::Theme { action: None }).unwrap(),
            "light\n"
        );
        assert_eq!(
            run(
                &mut store,
                Commands::Theme {
                    action: Some(ThemeAction::Toggle)
                }
            )
            .unwrap(),
            "dark\n"
        );
        assert_eq!(
            run(
                &mut store,
                Commands::Theme {
                    action: Some(ThemeAction::Light)
                }
            )
            .unwrap(),
            "light\n"
        );
        assert!(storage::theme_manually_set(&store).unwrap());
    }

    #[test]
    fn category_matches_whatever_case_was_typed() {
        let mut store = MemoryStore::new();
        run(
            &mut store,
            Commands::Add {
                text: "Relatório".into(),
                category: Some("Trabalho".into()),
                priority: None,
                due: None,
            },
        )
        .unwrap();

        for typed in ["Trabalho", "TRABALHO", " trabalho "] {
            let output = run(
                &mut store,
                Commands::List {
                    status: "all".into(),
                    category: Some(typed.into()),
                    search: None,
                },
            )
            .unwrap();
            assert!(output.contains("  1. [ ] Relatório"), "{typed}: {output}");
        }
    }
}
