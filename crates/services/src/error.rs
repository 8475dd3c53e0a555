//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::session::SessionError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by question sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("question source unavailable: sheet, snapshot and cache all failed")]
    SourceUnavailable,
    #[error("sheet request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("snapshot could not be read: {0}")]
    Snapshot(String),
}

/// Errors emitted by the remote progress mirror.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteError {
    #[error("remote progress request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl From<RemoteError> for StorageError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::HttpStatus(status) => StorageError::Connection(format!("status {status}")),
            RemoteError::Http(err) if err.is_decode() => StorageError::Serialization(err.to_string()),
            RemoteError::Http(err) => StorageError::Connection(err.to_string()),
        }
    }
}

/// Errors emitted by `QuizRunner`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no quiz is active")]
    NoActiveQuiz,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl QuizError {
    /// The selection produced no questions.
    #[must_use]
    pub fn is_empty_set(&self) -> bool {
        matches!(self, QuizError::Session(SessionError::EmptySet))
    }
}

/// Errors emitted by the JSON to CSV conversion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Source(#[from] SourceError),
}
