use crate::error::{AppError, Result};
use crate::task::{Task, TaskDraft, TaskEntry};
use chrono::{DateTime, Utc};

/// The whole to-do list. Insertion order is display order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TodoList {
    entries: Vec<TaskEntry>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub pending: usize,
    pub done: usize,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<TaskEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TaskEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TaskEntry> {
        self.entries.get(index)
    }

    /// Ids are creation timestamps in milliseconds, bumped past the largest
    /// existing id so that two tasks added within the same millisecond stay
    /// distinct.
    fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let stamp = now.timestamp_millis();
        match self.entries.iter().filter_map(TaskEntry::id).max() {
            Some(max) if max >= stamp => max + 1,
            _ => stamp,
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(AppError::NoSuchTask(index))
        }
    }

    pub fn add_task(&mut self, draft: TaskDraft) -> Option<&Task> {
        self.add_task_at(draft, Utc::now())
    }

    /// Append a task built from `draft`. Blank text adds nothing.
    pub fn add_task_at(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> Option<&Task> {
        if draft.text.trim().is_empty() {
            return None;
        }
        let id = self.next_id(now);
        self.entries.push(Task::from_draft(id, draft, now).into());
        tracing::debug!(id, "task added");
        match self.entries.last() {
            Some(TaskEntry::Task(task)) => Some(task),
            _ => None,
        }
    }

    pub fn toggle_task(&mut self, index: usize) -> Result<bool> {
        self.toggle_task_at(index, Utc::now())
    }

    /// Flip completion of the entry at `index`, returning the new state.
    pub fn toggle_task_at(&mut self, index: usize, now: DateTime<Utc>) -> Result<bool> {
        self.check_index(index)?;
        let id = self.next_id(now);
        let task = self.entries[index].upgrade(id, now);
        task.completed = !task.completed;
        tracing::debug!(id = task.id, completed = task.completed, "task toggled");
        Ok(task.completed)
    }

    /// Remove the entry at `index`; later entries shift down by one.
    pub fn remove_task(&mut self, index: usize) -> Result<TaskEntry> {
        self.check_index(index)?;
        let removed = self.entries.remove(index);
        tracing::debug!(index, "task removed");
        Ok(removed)
    }

    pub fn edit_task(&mut self, index: usize, new_text: Option<&str>) -> Result<bool> {
        self.edit_task_at(index, new_text, Utc::now())
    }

    /// Replace the text of the entry at `index`. `None` means the edit was
    /// canceled; blank text is ignored. Returns whether anything changed.
    pub fn edit_task_at(
        &mut self,
        index: usize,
        new_text: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        self.check_index(index)?;
        let Some(text) = new_text.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(false);
        };
        let id = self.next_id(now);
        let task = self.entries[index].upgrade(id, now);
        task.text = text.to_string();
        tracing::debug!(id = task.id, "task edited");
        Ok(true)
    }

    pub fn counts(&self) -> TaskCounts {
        let total = self.entries.len();
        let done = self.entries.iter().filter(|e| e.is_completed()).count();
        TaskCounts {
            total,
            pending: total - done,
            done,
        }
    }

    pub fn position_of(&self, id: i64) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == Some(id))
    }
}
