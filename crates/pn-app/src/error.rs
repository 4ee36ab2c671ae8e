//! Error types for the pn-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI one error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Snapshot error: {0}")]
    Project(String),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse authority response: {0}")]
    Response(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pn-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<pn_project::ProjectError> for AppError {
    fn from(err: pn_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<pn_graph::GraphError> for AppError {
    fn from(err: pn_graph::GraphError) -> Self {
        match err {
            pn_graph::GraphError::UnknownNode { id } => AppError::NodeNotFound(id),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}
