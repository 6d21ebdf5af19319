use crate::app::{AddForm, App, FormField, Mode};
use crate::error::Result;
use crate::storage::KeyValueStore;
use crate::task::{format_due_date, TaskEntry};
use crate::theme::Palette;
use crossterm::event::{self, Event};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

pub fn run_app<B: Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key)?;
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>) {
    let palette = app.theme.palette();
    let base = Style::default().fg(palette.text).bg(palette.background);

    let footer_height = if app.message.is_some() { 4 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(footer_height),
        ])
        .split(f.area());

    f.render_widget(Block::default().style(base), f.area());
    draw_header(f, chunks[0], app, &palette);
    draw_filters(f, chunks[1], app, &palette);
    draw_tasks(f, chunks[2], app, &palette);
    draw_footer(f, chunks[3], app, &palette);
}

fn bordered<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
}

fn draw_header<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>, palette: &Palette) {
    let counts = app.list.counts();
    let line = Line::from(vec![
        Span::styled(
            "Tarefas",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "   total {}   pending {}   done {}",
            counts.total, counts.pending, counts.done
        )),
        Span::styled(
            format!("   [t] {}", app.theme.toggle_label()),
            Style::default().fg(palette.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(line).block(bordered("", palette)), area);
}

fn draw_filters<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>, palette: &Palette) {
    let active = Style::default().fg(palette.accent);
    let mut spans = vec![
        Span::raw("status: "),
        Span::styled(app.filter.status.label(), active),
        Span::raw("   category: "),
        Span::styled(app.filter.category.label().to_string(), active),
        Span::raw("   search: "),
    ];
    if app.filter.search.is_empty() && app.mode != Mode::Searching {
        spans.push(Span::styled("-", Style::default().fg(palette.dim)));
    } else {
        spans.push(Span::styled(app.filter.search.clone(), active));
        if app.mode == Mode::Searching {
            spans.push(Span::raw("_"));
        }
    }
    let title = if app.filter.is_active() {
        "Filters (x to clear)"
    } else {
        "Filters"
    };
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(bordered(title, palette)),
        area,
    );
}

fn task_line<'a>(entry: &'a TaskEntry, date_format: &str, palette: &Palette) -> Line<'a> {
    let done = entry.is_completed();
    let text_style = if done {
        Style::default()
            .fg(palette.done)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(palette.text)
    };
    let priority = entry.priority();
    let mut spans = vec![
        Span::raw(if done { "[x] " } else { "[ ] " }),
        Span::styled(entry.text(), text_style),
        Span::raw("  "),
        Span::styled(
            priority.label(),
            Style::default()
                .fg(palette.priority(priority))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(entry.category().to_string(), Style::default().fg(palette.dim)),
    ];
    if let Some(due) = entry.due_date() {
        spans.push(Span::styled(
            format!("  due {}", format_due_date(due, date_format)),
            Style::default().fg(palette.dim),
        ));
    }
    Line::from(spans)
}

fn draw_tasks<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>, palette: &Palette) {
    let visible = app.visible();
    let block = bordered("Tasks", palette);

    if visible.is_empty() {
        let hint = if app.list.is_empty() {
            "No tasks yet. Press 'a' to add one."
        } else {
            "No tasks match the current filters. Press 'x' to clear them."
        };
        f.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(palette.dim))).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|(_, entry)| ListItem::new(task_line(entry, &app.date_format, palette)))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(palette.selection_bg))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn form_line<'a>(form: &'a AddForm, palette: &Palette) -> Line<'a> {
    let focus = |field: FormField| {
        if form.field == field {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };
    let cursor = |field: FormField| if form.field == field { "_" } else { "" };
    Line::from(vec![
        Span::styled(
            format!("{}{}", form.text, cursor(FormField::Text)),
            focus(FormField::Text),
        ),
        Span::raw("  | "),
        Span::styled(format!("< {} >", form.category), focus(FormField::Category)),
        Span::raw(" | "),
        Span::styled(format!("< {} >", form.priority), focus(FormField::Priority)),
        Span::raw(" | due: "),
        Span::styled(
            format!("{}{}", form.due, cursor(FormField::Due)),
            focus(FormField::Due),
        ),
    ])
}

fn draw_footer<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>, palette: &Palette) {
    let (title, line) = match &app.mode {
        Mode::Adding(form) => (
            "New task (Tab next field, ←/→ change, Enter save, Esc cancel)",
            form_line(form, palette),
        ),
        Mode::Editing { input, .. } => (
            "Edit task (Enter save, Esc cancel)",
            Line::from(format!("{input}_")),
        ),
        Mode::Searching => (
            "Search (Enter keep, Esc clear)",
            Line::from(format!("{}_", app.filter.search)),
        ),
        Mode::Normal => (
            "",
            Line::from(Span::styled(
                "a add  e edit  space toggle  d delete  / search  \
                 f status  c category  x clear  t theme  q quit",
                Style::default().fg(palette.dim),
            )),
        ),
    };
    // The footer grows by one row for a message, so the input line stays visible.
    let mut lines = Vec::with_capacity(2);
    if let Some(message) = &app.message {
        let notice = Style::default().fg(palette.high);
        lines.push(Line::from(Span::styled(message.clone(), notice)));
    }
    lines.push(line);
    f.render_widget(Paragraph::new(lines).block(bordered(title, palette)), area);
}
