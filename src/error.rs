use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevMindError {
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Path is not indexed: {0}. Run analyze_project first")]
    NotIndexed(String),

    #[error("Failed to read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Indexing was cancelled")]
    Cancelled,

    #[error("Failed to {operation} {}: {source}", path.display())]
    FileOperation {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl DevMindError {
    /// Stable tag used in tool error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            DevMindError::NotADirectory(_) => "not_a_directory",
            DevMindError::NotIndexed(_) => "not_indexed",
            DevMindError::ReadError { .. } => "read_error",
            DevMindError::Cancelled => "cancelled",
            DevMindError::FileOperation { .. } => "file_operation",
            DevMindError::InvalidInput(_) => "invalid_input",
            DevMindError::Config(_) => "config",
            DevMindError::TaskFailed(_) => "task_failed",
        }
    }

    pub(crate) fn file_op(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        DevMindError::FileOperation {
            operation,
            path: path.into(),
            source,
        }
    }
}

impl From<::config::ConfigError> for DevMindError {
    fn from(err: ::config::ConfigError) -> Self {
        DevMindError::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for DevMindError {
    fn from(err: tokio::task::JoinError) -> Self {
        DevMindError::TaskFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DevMindError>;
