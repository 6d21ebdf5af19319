use crate::error::Result;
use crate::storage::{self, KeyValueStore};
use crate::task::Priority;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label of the toggle control: names the theme you would switch to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Dark => "☀ Light",
            Theme::Light => "☾ Dark",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette::light(),
            Theme::Dark => Palette::dark(),
        }
    }

    /// Guess the terminal background from `COLORFGBG` ("fg;bg"). Background
    /// indices 0-6 and 8 are the dark ANSI colors.
    pub fn from_colorfgbg(value: &str) -> Option<Theme> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        match bg {
            0..=6 | 8 => Some(Theme::Dark),
            7 | 9..=15 => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn detect_system() -> Option<Theme> {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|v| Theme::from_colorfgbg(&v))
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Invalid theme: {other}")),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the theme at startup. A manual choice always wins. Otherwise the
/// detected system theme is used (and remembered), then any stored one, then
/// `fallback`.
pub fn initial_theme(
    store: &mut impl KeyValueStore,
    system: Option<Theme>,
    fallback: Theme,
) -> Result<Theme> {
    let saved = storage::load_theme(&*store)?;
    if let Some(saved) = saved {
        if storage::theme_manually_set(&*store)? {
            return Ok(saved);
        }
    }
    match system {
        Some(theme) => {
            if saved != Some(theme) {
                storage::save_theme(store, theme)?;
                tracing::info!(theme = %theme, "using system theme");
            }
            Ok(theme)
        }
        None => Ok(saved.unwrap_or(fallback)),
    }
}

/// Flip the theme and remember that the user chose it.
pub fn toggle_theme(store: &mut impl KeyValueStore, current: Theme) -> Result<Theme> {
    let next = current.toggled();
    storage::mark_theme_manually_set(store)?;
    storage::save_theme(store, next)?;
    tracing::info!(theme = %next, "theme toggled");
    Ok(next)
}

/// Terminal colors for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub selection_bg: Color,
    pub done: Color,
    pub high: Color,
    pub medium: Color,
    pub low: Color,
}

impl Palette {
    pub fn light() -> Self {
        Palette {
            background: Color::Rgb(0xF5, 0xF5, 0xF5),
            text: Color::Rgb(0x33, 0x33, 0x33),
            dim: Color::Rgb(0x88, 0x88, 0x88),
            accent: Color::Rgb(0x4A, 0x6C, 0xF7),
            border: Color::Rgb(0xBB, 0xBB, 0xBB),
            selection_bg: Color::Rgb(0xDD, 0xE4, 0xFF),
            done: Color::Rgb(0x99, 0x99, 0x99),
            high: Color::Rgb(0xD3, 0x2F, 0x2F),
            medium: Color::Rgb(0xC7, 0x7C, 0x02),
            low: Color::Rgb(0x38, 0x8E, 0x3C),
        }
    }

    pub fn dark() -> Self {
        Palette {
            background: Color::Rgb(0x1A, 0x1A, 0x2E),
            text: Color::Rgb(0xE0, 0xE0, 0xE0),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            accent: Color::Rgb(0x44, 0xDD, 0xFF),
            border: Color::Rgb(0x44, 0x44, 0x66),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            done: Color::Rgb(0x66, 0x66, 0x77),
            high: Color::Rgb(0xFF, 0x44, 0x44),
            medium: Color::Rgb(0xFF, 0xD7, 0x00),
            low: Color::Rgb(0x44, 0xFF, 0x88),
        }
    }

    pub fn priority(&self, priority: Priority) -> Color {
        match priority {
            Priority::Alta => self.high,
            Priority::Media => self.medium,
            Priority::Baixa => self.low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, THEME_KEY};

    #[test]
    fn toggle_flips_and_persists() {
        let mut store = MemoryStore::new();
        let next = toggle_theme(&mut store, Theme::Light).unwrap();
        assert_eq!(next, Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("\"dark\""));
        assert!(storage::theme_manually_set(&store).unwrap());
        assert_eq!(toggle_theme(&mut store, next).unwrap(), Theme::Light);
    }

    #[test]
    fn manual_theme_wins_over_system() {
        let mut store = MemoryStore::new();
        toggle_theme(&mut store, Theme::Dark).unwrap();
        let theme = initial_theme(&mut store, Some(Theme::Dark), Theme::Dark).unwrap();
        assert_eq!(theme, Theme::Light);
    }

    #[test]
    fn remembered_system_theme_follows_system_changes() {
        let mut store = MemoryStore::new();
        storage::save_theme(&mut store, Theme::Light).unwrap();
        let theme = initial_theme(&mut store, Some(Theme::Dark), Theme::Light).unwrap();
        assert_eq!(theme, Theme::Dark);
        assert_eq!(storage::load_theme(&store).unwrap(), Some(Theme::Dark));
        assert!(!storage::theme_manually_set(&store).unwrap());
    }

    #[test]
    fn stored_theme_used_when_system_unknown() {
        let mut store = MemoryStore::new();
        storage::save_theme(&mut store, Theme::Dark).unwrap();
        let theme = initial_theme(&mut store, None, Theme::Light).unwrap();
        assert_eq!(theme, Theme::Dark);
    }

    #[test]
    fn system_theme_is_remembered() {
        let mut store = MemoryStore::new();
        let theme = initial_theme(&mut store, Some(Theme::Dark), Theme::Light).unwrap();
        assert_eq!(theme, Theme::Dark);
        assert_eq!(storage::load_theme(&store).unwrap(), Some(Theme::Dark));
        assert!(!storage::theme_manually_set(&store).unwrap());
    }

    #[test]
    fn fallback_is_not_persisted() {
        let mut store = MemoryStore::new();
        let theme = initial_theme(&mut store, None, Theme::Dark).unwrap();
        assert_eq!(theme, Theme::Dark);
        assert_eq!(storage::load_theme(&store).unwrap(), None);
    }

    #[test]
    fn colorfgbg_detection() {
        assert_eq!(Theme::from_colorfgbg("15;0"), Some(Theme::Dark));
        assert_eq!(Theme::from_colorfgbg("0;15"), Some(Theme::Light));
        assert_eq!(Theme::from_colorfgbg("12;default;8"), Some(Theme::Dark));
        assert_eq!(Theme::from_colorfgbg("garbage"), None);
    }

    #[test]
    fn toggle_label_names_the_other_theme() {
        assert!(Theme::Dark.toggle_label().contains("Light"));
        assert!(Theme::Light.toggle_label().contains("Dark"));
    }
}
