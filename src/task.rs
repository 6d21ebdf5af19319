use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task category. The three built-in values are offered by the UI; anything
/// else found in stored data is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    Pessoal,
    Trabalho,
    Estudo,
    Other(String),
}

impl Category {
    pub const BUILTIN: [Category; 3] = [Category::Pessoal, Category::Trabalho, Category::Estudo];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Pessoal => "pessoal",
            Category::Trabalho => "trabalho",
            Category::Estudo => "estudo",
            Category::Other(name) => name,
        }
    }

    /// Next built-in category, wrapping around. Custom categories jump to the first one.
    pub fn cycle(&self, forward: bool) -> Category {
        let len = Self::BUILTIN.len();
        let pos = Self::BUILTIN.iter().position(|c| c == self);
        let next = match (pos, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };
        Self::BUILTIN[next].clone()
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pessoal" => Category::Pessoal,
            "trabalho" => Category::Trabalho,
            "estudo" => Category::Estudo,
            _ => Category::Other(value),
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Other(name) => name,
            builtin => builtin.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Baixa,
    #[serde(alias = "média")]
    Media,
    Alta,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Baixa, Priority::Media, Priority::Alta];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Baixa => "baixa",
            Priority::Media => "media",
            Priority::Alta => "alta",
        }
    }

    /// Badge text shown next to a task.
    pub fn label(self) -> &'static str {
        match self {
            Priority::Baixa => "BAIXA",
            Priority::Media => "MEDIA",
            Priority::Alta => "ALTA",
        }
    }

    pub fn cycle(self, forward: bool) -> Priority {
        let i = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        let len = Self::ALL.len();
        if forward {
            Self::ALL[(i + 1) % len]
        } else {
            Self::ALL[(i + len - 1) % len]
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baixa" => Ok(Priority::Baixa),
            "media" | "média" => Ok(Priority::Media),
            "alta" => Ok(Priority::Alta),
            other => Err(format!("Invalid priority: {other}")),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Due dates are stored as `YYYY-MM-DD`, or an empty string when unset.
mod due_date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

pub use due_date_format::FORMAT as DUE_DATE_FORMAT;

/// Render a due date with a user-supplied chrono format, falling back to
/// ISO when the format string is invalid.
pub fn format_due_date(date: NaiveDate, format: &str) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        return date.format(DUE_DATE_FORMAT).to_string();
    }
    out
}

pub fn parse_due_date(raw: &str) -> crate::error::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT)
        .map_err(|_| crate::error::AppError::InvalidDate(raw.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(rename = "dueDate", default, with = "due_date_format")]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// What the user typed into the add form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub text: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

impl Task {
    pub fn from_draft(id: i64, draft: TaskDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text: draft.text.trim().to_string(),
            completed: false,
            category: draft.category,
            priority: draft.priority,
            due_date: draft.due_date,
            created_at: Some(now),
        }
    }

    fn from_legacy(id: i64, text: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            completed: false,
            category: Category::Pessoal,
            priority: Priority::Baixa,
            due_date: None,
            created_at: Some(now),
        }
    }
}

/// One element of the saved list. Early versions saved tasks as bare
/// strings; those are read with default attributes and upgraded on first
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskEntry {
    Task(Task),
    Legacy(String),
}

impl TaskEntry {
    pub fn id(&self) -> Option<i64> {
        match self {
            TaskEntry::Task(task) => Some(task.id),
            TaskEntry::Legacy(_) => None,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            TaskEntry::Task(task) => &task.text,
            TaskEntry::Legacy(text) => text,
        }
    }

    pub fn is_completed(&self) -> bool {
        match self {
            TaskEntry::Task(task) => task.completed,
            TaskEntry::Legacy(_) => false,
        }
    }

    pub fn category(&self) -> &Category {
        const LEGACY_CATEGORY: &Category = &Category::Pessoal;
        match self {
            TaskEntry::Task(task) => &task.category,
            TaskEntry::Legacy(_) => LEGACY_CATEGORY,
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            TaskEntry::Task(task) => task.priority,
            TaskEntry::Legacy(_) => Priority::Baixa,
        }
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        match self {
            TaskEntry::Task(task) => task.due_date,
            TaskEntry::Legacy(_) => None,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, TaskEntry::Legacy(_))
    }

    /// Turn a legacy entry into a full task in place and return it.
    pub fn upgrade(&mut self, id: i64, now: DateTime<Utc>) -> &mut Task {
        if let TaskEntry::Legacy(text) = self {
            let text = std::mem::take(text);
            *self = TaskEntry::Task(Task::from_legacy(id, text, now));
        }
        let TaskEntry::Task(task) = self else {
            unreachable!("legacy entry was just upgraded");
        };
        task
    }
}

impl From<Task> for TaskEntry {
    fn from(task: Task) -> Self {
        TaskEntry::Task(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn parses_browser_shaped_object() {
        let json = r#"{
            "id": 1753876800000,
            "text": "Estudar Rust",
            "completed": true,
            "category": "estudo",
            "priority": "alta",
            "dueDate": "2025-08-01",
            "createdAt": "2025-07-30T12:00:00.000Z"
        }"#;
        let entry: TaskEntry = serde_json::from_str(json).unwrap();
        let TaskEntry::Task(task) = entry else {
            panic!("expected a full task");
        };
        assert_eq!(task.id, 1753876800000);
        assert_eq!(task.category, Category::Estudo);
        assert_eq!(task.priority, Priority::Alta);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 8, 1));
        assert_eq!(task.created_at, Some(now()));
        assert!(task.completed);
    }

    #[test]
    fn empty_due_date_reads_as_none_and_writes_back_empty() {
        let json = r#"{"id":1,"text":"x","completed":false,"category":"pessoal","priority":"baixa","dueDate":""}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.due_date, None);
        let out = serde_json::to_value(&task).unwrap();
        assert_eq!(out["dueDate"], "");
    }

    #[test]
    fn missing_optional_fields_default() {
        let task: Task = serde_json::from_str(r#"{"id":7,"text":"x","completed":false}"#).unwrap();
        assert_eq!(task.category, Category::Pessoal);
        assert_eq!(task.priority, Priority::Baixa);
        assert_eq!(task.due_date, None);
        assert_eq!(task.created_at, None);
    }

    #[test]
    fn legacy_string_reads_with_defaults() {
        let entry: TaskEntry = serde_json::from_str(r#""comprar pão""#).unwrap();
        assert!(entry.is_legacy());
        assert_eq!(entry.text(), "comprar pão");
        assert!(!entry.is_completed());
        assert_eq!(entry.category(), &Category::Pessoal);
        assert_eq!(entry.priority(), Priority::Baixa);
        assert_eq!(entry.due_date(), None);
        assert_eq!(entry.id(), None);
    }

    #[test]
    fn custom_category_is_preserved() {
        let json = r#"{"id":1,"text":"x","completed":false,"category":"saude"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.category, Category::Other("saude".into()));
        assert_eq!(serde_json::to_value(&task).unwrap()["category"], "saude");
    }

    #[test]
    fn upgrade_keeps_text_and_assigns_id() {
        let mut entry = TaskEntry::Legacy("ler livro".into());
        let task = entry.upgrade(42, now());
        assert_eq!(task.text, "ler livro");
        assert_eq!(task.id, 42);
        assert!(!task.completed);
        assert!(!entry.is_legacy());
    }

    #[test]
    fn upgrade_leaves_full_task_alone() {
        let original = Task::from_draft(5, TaskDraft::new("a"), now());
        let mut entry = TaskEntry::from(original.clone());
        entry.upgrade(99, now());
        assert_eq!(entry, TaskEntry::Task(original));
    }

    #[test]
    fn priority_parses_accented_media() {
        assert_eq!("média".parse::<Priority>(), Ok(Priority::Media));
        assert_eq!("ALTA".parse::<Priority>(), Ok(Priority::Alta));
        assert!("urgente".parse::<Priority>().is_err());
    }

    #[test]
    fn due_dates_format_and_parse() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 30).unwrap();
        assert_eq!(format_due_date(date, "%d/%m/%Y"), "30/07/2025");
        assert_eq!(format_due_date(date, "%Q"), "2025-07-30");
        assert_eq!(parse_due_date(" 2025-07-30 ").unwrap(), date);
        assert!(parse_due_date("30/07/2025").is_err());
    }

    #[test]
    fn category_cycle_wraps() {
        assert_eq!(Category::Estudo.cycle(true), Category::Pessoal);
        assert_eq!(Category::Pessoal.cycle(false), Category::Estudo);
        assert_eq!(Category::Other("x".into()).cycle(true), Category::Pessoal);
    }
}
