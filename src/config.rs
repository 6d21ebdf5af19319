//! Optional user configuration (`config.toml`).

use crate::error::{AppError, Result};
use crate::task::{Category, Priority};
use crate::theme::Theme;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Where the task list and theme are stored
    pub data_dir: Option<PathBuf>,
    /// error, warn, info, debug, trace or off
    pub log_level: String,
    /// chrono format used to show due dates
    pub date_format: String,
    pub default_category: Category,
    pub default_priority: Priority,
    /// Used when nothing is stored and the terminal gives no hint
    pub default_theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "info".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            default_category: Category::Pessoal,
            default_priority: Priority::Baixa,
            default_theme: Theme::Light,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "tarefas", "tarefas")
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from `path`, or from the per-user config directory. A missing
    /// file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&contents).map_err(|e| AppError::Config {
            path,
            message: e.to_string(),
        })
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// `override_dir` (from the command line) wins over the config file.
    pub fn data_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir.or(self.data_dir.as_deref()) {
            return Ok(dir.to_path_buf());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(AppError::NoDataDir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_some_fields() {
        let config = AppConfig::parse(
            r#"
            log_level = "debug"
            default_category = "trabalho"
            default_priority = "alta"
            default_theme = "dark"
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.default_category, Category::Trabalho);
        assert_eq!(config.default_priority, Priority::Alta);
        assert_eq!(config.default_theme, Theme::Dark);
        assert_eq!(config.date_format, "%d/%m/%Y");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AppConfig::parse("colour = \"blue\"").is_err());
    }

    #[test]
    fn missing_file_is_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn bad_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_level = [").unwrap();
        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn data_dir_precedence() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Default::default()
        };
        assert_eq!(
            config.data_dir(Some(Path::new("/from/cli"))).unwrap(),
            PathBuf::from("/from/cli")
        );
        assert_eq!(config.data_dir(None).unwrap(), PathBuf::from("/from/config"));
    }
}
