use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::filter::TaskFilter;
use crate::storage::{self, KeyValueStore};
use crate::task::{parse_due_date, Category, Priority, TaskDraft, TaskEntry};
use crate::theme::{self, Theme};
use crate::todo_list::TodoList;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Text,
    Category,
    Priority,
    Due,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Text => FormField::Category,
            FormField::Category => FormField::Priority,
            FormField::Priority => FormField::Due,
            FormField::Due => FormField::Text,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Text => FormField::Due,
            FormField::Category => FormField::Text,
            FormField::Priority => FormField::Category,
            FormField::Due => FormField::Priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddForm {
    pub text: String,
    pub category: Category,
    pub priority: Priority,
    /// Raw `YYYY-MM-DD` input, may be empty
    pub due: String,
    pub field: FormField,
}

impl AddForm {
    fn new(category: Category, priority: Priority) -> Self {
        Self {
            text: String::new(),
            category,
            priority,
            due: String::new(),
            field: FormField::Text,
        }
    }

    fn to_draft(&self) -> Result<TaskDraft> {
        let due = self.due.trim();
        let due_date = if due.is_empty() {
            None
        } else {
            Some(parse_due_date(due)?)
        };
        Ok(TaskDraft {
            text: self.text.clone(),
            category: self.category.clone(),
            priority: self.priority,
            due_date,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Adding(AddForm),
    Editing { index: usize, input: String },
    Searching,
}

/// Interactive state: the list, the current view over it, and whatever the
/// user is typing.
pub struct App<S: KeyValueStore> {
    pub list: TodoList,
    pub filter: TaskFilter,
    pub theme: Theme,
    pub mode: Mode,
    /// Row within the filtered view
    pub selected: usize,
    pub message: Option<String>,
    pub should_quit: bool,
    pub date_format: String,
    default_category: Category,
    default_priority: Priority,
    store: S,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(mut store: S, config: &AppConfig, system_theme: Option<Theme>) -> Result<Self> {
        let list = storage::load_tasks(&store)?;
        let theme = theme::initial_theme(&mut store, system_theme, config.default_theme)?;
        Ok(Self {
            list,
            filter: TaskFilter::default(),
            theme,
            mode: Mode::Normal,
            selected: 0,
            message: None,
            should_quit: false,
            date_format: config.date_format.clone(),
            default_category: config.default_category.clone(),
            default_priority: config.default_priority,
            store,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn visible(&self) -> Vec<(usize, &TaskEntry)> {
        self.filter.apply(&self.list)
    }

    /// List index of the highlighted row.
    pub fn selected_index(&self) -> Option<usize> {
        self.visible().get(self.selected).map(|(i, _)| *i)
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Highlight the row showing `id`, if it is still visible.
    fn select_id(&mut self, id: Option<i64>) {
        let row = id.and_then(|id| {
            let index = self.list.position_of(id)?;
            self.visible().iter().position(|(i, _)| *i == index)
        });
        match row {
            Some(row) => self.selected = row,
            None => self.clamp_selection(),
        }
    }

    fn save(&mut self) -> Result<()> {
        storage::save_tasks(&mut self.store, &self.list)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }
        match self.mode {
            Mode::Normal => self.handle_normal(key),
            Mode::Adding(_) => self.handle_adding(key),
            Mode::Editing { .. } => self.handle_editing(key),
            Mode::Searching => {
                self.handle_searching(key);
                Ok(())
            }
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) -> Result<()> {
        self.message = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.visible().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('a') => {
                self.mode = Mode::Adding(AddForm::new(
                    self.default_category.clone(),
                    self.default_priority,
                ));
            }
            KeyCode::Char('e') => {
                if let Some(index) = self.selected_index() {
                    let input = self.list.entries()[index].text().to_string();
                    self.mode = Mode::Editing { index, input };
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected()?,
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected()?,
            KeyCode::Char('/') => self.mode = Mode::Searching,
            KeyCode::Char('f') => {
                self.filter.status = self.filter.status.next();
                self.clamp_selection();
            }
            KeyCode::Char('c') => {
                self.filter.category = self.filter.category.next();
                self.clamp_selection();
            }
            KeyCode::Char('x') => {
                self.filter.clear();
                self.clamp_selection();
            }
            KeyCode::Char('t') => {
                self.theme = theme::toggle_theme(&mut self.store, self.theme)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn toggle_selected(&mut self) -> Result<()> {
        let Some(index) = self.selected_index() else {
            return Ok(());
        };
        self.list.toggle_task(index)?;
        self.save()?;
        let id = self.list.entries()[index].id();
        self.select_id(id);
        Ok(())
    }

    fn remove_selected(&mut self) -> Result<()> {
        let Some(index) = self.selected_index() else {
            return Ok(());
        };
        let removed = self.list.remove_task(index)?;
        self.save()?;
        self.message = Some(format!("Removed: {}", removed.text()));
        self.clamp_selection();
        Ok(())
    }

    fn handle_adding(&mut self, key: KeyEvent) -> Result<()> {
        let Mode::Adding(form) = &mut self.mode else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                return Ok(());
            }
            KeyCode::Tab => form.field = form.field.next(),
            KeyCode::BackTab => form.field = form.field.prev(),
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match form.field {
                    FormField::Category => form.category = form.category.cycle(forward),
                    FormField::Priority => form.priority = form.priority.cycle(forward),
                    FormField::Text | FormField::Due => {}
                }
            }
            KeyCode::Backspace => match form.field {
                FormField::Text => {
                    form.text.pop();
                }
                FormField::Due => {
                    form.due.pop();
                }
                FormField::Category | FormField::Priority => {}
            },
            KeyCode::Char(c) => match form.field {
                FormField::Text => form.text.push(c),
                FormField::Due => form.due.push(c),
                FormField::Category | FormField::Priority => {}
            },
            KeyCode::Enter => {
                let draft = match form.to_draft() {
                    Ok(draft) => draft,
                    Err(err @ AppError::InvalidDate(_)) => {
                        form.field = FormField::Due;
                        self.message = Some(err.to_string());
                        return Ok(());
                    }
                    Err(err) => return Err(err),
                };
                return self.submit_add(draft);
            }
            _ => {}
        }
        Ok(())
    }

    fn submit_add(&mut self, draft: TaskDraft) -> Result<()> {
        let Some(id) = self.list.add_task(draft).map(|task| task.id) else {
            self.message = Some("Task text is empty".to_string());
            return Ok(());
        };
        self.save()?;
        self.mode = Mode::Normal;
        self.message = None;
        self.select_id(Some(id));
        Ok(())
    }

    fn handle_editing(&mut self, key: KeyEvent) -> Result<()> {
        let Mode::Editing { index, input } = &mut self.mode else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            KeyCode::Enter => {
                let index = *index;
                let text = std::mem::take(input);
                self.mode = Mode::Normal;
                if self.list.edit_task(index, Some(&text))? {
                    self.save()?;
                    let id = self.list.entries()[index].id();
                    self.select_id(id);
                } else {
                    self.message = Some("Task text is empty, nothing changed".to_string());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_searching(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.filter.search.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Enter => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                self.filter.search.pop();
            }
            KeyCode::Char(c) => self.filter.search.push(c),
            _ => {}
        }
        self.clamp_selection();
    }
}
