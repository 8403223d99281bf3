// ABOUTME: Error type shared by the dashboard store and its validation rules
// ABOUTME: Validation kinds (port, duplicate category, not found) plus storage failures

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Invalid port: {0} (expected 1-65535)")]
    InvalidPort(String),
    #[error("Category name is empty or already exists: '{0}'")]
    DuplicateCategory(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Data directory not found")]
    NoDirFound,
}

pub type DashResult<T> = Result<T, DashError>;
