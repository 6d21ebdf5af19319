//! Key-value persistence for the task list and theme preference.

use crate::error::{AppError, Result};
use crate::task::TaskEntry;
use crate::theme::Theme;
use crate::todo_list::TodoList;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub const TASKS_KEY: &str = "tasks";
pub const THEME_KEY: &str = "theme";
pub const THEME_MANUAL_KEY: &str = "theme-manually-set";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as a file inside one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read the saved list. A missing key is an empty list; unreadable JSON is
/// reported rather than replaced.
pub fn load_tasks(store: &impl KeyValueStore) -> Result<TodoList> {
    let Some(raw) = store.get(TASKS_KEY)? else {
        return Ok(TodoList::new());
    };
    if raw.trim().is_empty() || raw.trim() == "null" {
        return Ok(TodoList::new());
    }
    let entries: Vec<TaskEntry> =
        serde_json::from_str(&raw).map_err(|source| AppError::CorruptStore {
            key: TASKS_KEY.to_string(),
            source,
        })?;
    tracing::info!(count = entries.len(), "loaded tasks");
    Ok(TodoList::from_entries(entries))
}

/// Write the whole list.
pub fn save_tasks(store: &mut impl KeyValueStore, list: &TodoList) -> Result<()> {
    let content = serde_json::to_string_pretty(list.entries())?;
    store.set(TASKS_KEY, &content)?;
    tracing::debug!(count = list.len(), "saved tasks");
    Ok(())
}

/// Values are JSON strings (`"dark"`). A bare `dark` written by hand is
/// accepted too; anything else is ignored.
pub fn load_theme(store: &impl KeyValueStore) -> Result<Option<Theme>> {
    let theme = store.get(THEME_KEY)?.and_then(|raw| {
        let parsed = serde_json::from_str::<Theme>(&raw)
            .ok()
            .or_else(|| raw.parse::<Theme>().ok());
        if parsed.is_none() {
            tracing::warn!(value = %raw.trim(), "ignoring unknown stored theme");
        }
        parsed
    });
    Ok(theme)
}

pub fn save_theme(store: &mut impl KeyValueStore, theme: Theme) -> Result<()> {
    store.set(THEME_KEY, &serde_json::to_string(&theme)?)
}

pub fn theme_manually_set(store: &impl KeyValueStore) -> Result<bool> {
    let Some(raw) = store.get(THEME_MANUAL_KEY)? else {
        return Ok(false);
    };
    Ok(serde_json::from_str::<bool>(raw.trim()).unwrap_or(false))
}

pub fn mark_theme_manually_set(store: &mut impl KeyValueStore) -> Result<()> {
    store.set(THEME_MANUAL_KEY, &serde_json::to_string(&true)?)
}
