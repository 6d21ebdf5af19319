//! Error types for tarefas

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No task at position {}", .0 + 1)]
    NoSuchTask(usize),

    #[error("Stored value for key '{key}' is corrupt: {source}")]
    CorruptStore {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not determine a data directory")]
    NoDataDir,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Configuration error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::NoSuchTask(_) => 2,
            AppError::InvalidDate(_) | AppError::InvalidArgument(_) => 3,
            AppError::CorruptStore { .. } => 4,
            AppError::Config { .. } => 5,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_reported_one_based() {
        assert_eq!(AppError::NoSuchTask(0).to_string(), "No task at position 1");
    }

    #[test]
    fn exit_codes_distinguish_user_errors() {
        assert_eq!(AppError::NoSuchTask(3).exit_code(), 2);
        assert_eq!(AppError::InvalidDate("x".into()).exit_code(), 3);
        assert_eq!(AppError::NoDataDir.exit_code(), 1);
    }

    #[test]
    fn corrupt_store_names_the_key() {
        let source = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let err = AppError::CorruptStore {
            key: "tasks".into(),
            source,
        };
        assert!(err.to_string().contains("'tasks'"));
        assert_eq!(err.exit_code(), 4);
    }
}
