use crate::task::{Category, TaskEntry};
use crate::todo_list::TodoList;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Done,
}

impl StatusFilter {
    pub fn matches(self, entry: &TaskEntry) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => !entry.is_completed(),
            StatusFilter::Done => entry.is_completed(),
        }
    }

    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Done,
            StatusFilter::Done => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Done => "done",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "todas" => Ok(StatusFilter::All),
            "pending" | "pendentes" => Ok(StatusFilter::Pending),
            "done" | "concluidas" | "concluídas" => Ok(StatusFilter::Done),
            other => Err(format!("Invalid status filter: {other}")),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, entry: &TaskEntry) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => entry.category() == category,
        }
    }

    /// All -> each built-in category -> All.
    pub fn next(&self) -> Self {
        match self {
            CategoryFilter::All => CategoryFilter::Only(Category::BUILTIN[0].clone()),
            CategoryFilter::Only(current) => {
                let pos = Category::BUILTIN.iter().position(|c| c == current);
                match pos.map(|i| i + 1) {
                    Some(i) if i < Category::BUILTIN.len() => {
                        CategoryFilter::Only(Category::BUILTIN[i].clone())
                    }
                    _ => CategoryFilter::All,
                }
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "all" | "todas" => CategoryFilter::All,
            other => CategoryFilter::Only(Category::from(other.to_string())),
        }
    }
}

/// Narrows the displayed tasks without touching the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: StatusFilter,
    pub category: CategoryFilter,
    pub search: String,
}

impl TaskFilter {
    pub fn matches(&self, entry: &TaskEntry) -> bool {
        self.status.matches(entry) && self.category.matches(entry) && self.matches_search(entry)
    }

    fn matches_search(&self, entry: &TaskEntry) -> bool {
        if self.search.trim().is_empty() {
            return true;
        }
        entry
            .text()
            .to_lowercase()
            .contains(&self.search.to_lowercase())
    }

    /// Matching entries paired with their position in the full list.
    pub fn apply<'a>(&self, list: &'a TodoList) -> Vec<(usize, &'a TaskEntry)> {
        list.entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| self.matches(entry))
            .collect()
    }

    pub fn is_active(&self) -> bool {
        *self != TaskFilter::default()
    }

    pub fn clear(&mut self) {
        *self = TaskFilter::default();
    }
}
