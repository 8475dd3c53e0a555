use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{Progress, Question, QuestionId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    /// The stored payload exists but cannot be decoded.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, StorageError::Serialization(_))
    }
}

pub(crate) fn decode_progress(payload: &str) -> Result<Progress, StorageError> {
    serde_json::from_str(payload).map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Local, authoritative checkpoints keyed by session key.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the checkpoint for a session key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored payload is
    /// malformed; the caller decides whether to drop it.
    async fn get_progress(&self, key: &str) -> Result<Option<Progress>, StorageError>;

    /// Insert or overwrite the checkpoint for a session key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the checkpoint cannot be stored.
    async fn save_progress(&self, key: &str, progress: &Progress) -> Result<(), StorageError>;

    /// Remove the checkpoint; missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn delete_progress(&self, key: &str) -> Result<(), StorageError>;

    /// Keys of every stored checkpoint, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the keys cannot be read.
    async fn list_progress_keys(&self) -> Result<Vec<String>, StorageError>;

    /// Remove every checkpoint and return how many were deleted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn clear_progress(&self) -> Result<u64, StorageError>;
}

/// Best-effort copy of progress held by a remote account.
#[async_trait]
pub trait RemoteProgressRepository: Send + Sync {
    /// Fetch the remote checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on transport or decode failures.
    async fn get(&self, key: &str) -> Result<Option<Progress>, StorageError>;

    /// Overwrite the remote checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on transport failures.
    async fn put(&self, key: &str, progress: &Progress) -> Result<(), StorageError>;
}

/// Saved questions, stored as full copies so they survive sheet edits.
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Bookmarked questions, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if rows cannot be read or decoded.
    async fn list_bookmarks(&self) -> Result<Vec<Question>, StorageError>;

    /// Add or refresh a bookmark.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bookmark cannot be stored.
    async fn add_bookmark(&self, question: &Question, at: DateTime<Utc>) -> Result<(), StorageError>;

    /// Remove a bookmark.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the question was not bookmarked.
    async fn remove_bookmark(&self, id: QuestionId) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn is_bookmarked(&self, id: QuestionId) -> Result<bool, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Progress is kept as raw JSON, the same way the `SQLite` backend stores it,
/// so malformed payloads can be simulated with [`InMemoryRepository::insert_raw_progress`].
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<HashMap<String, String>>>,
    bookmarks: Arc<Mutex<HashMap<QuestionId, (DateTime<Utc>, Question)>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            progress: Arc::new(Mutex::new(HashMap::new())),
            bookmarks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store an arbitrary payload under a key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_raw_progress(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self, key: &str) -> Result<Option<Progress>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(key).map(|raw| decode_progress(raw)).transpose()
    }

    async fn save_progress(&self, key: &str, progress: &Progress) -> Result<(), StorageError> {
        let payload = encode_json(progress)?;
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), payload);
        Ok(())
    }

    async fn delete_progress(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }

    async fn list_progress_keys(&self) -> Result<Vec<String>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut keys: Vec<String> = guard.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn clear_progress(&self) -> Result<u64, StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let removed = guard.len() as u64;
        guard.clear();
        Ok(removed)
    }
}

#[async_trait]
impl RemoteProgressRepository for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<Progress>, StorageError> {
        self.get_progress(key).await
    }

    async fn put(&self, key: &str, progress: &Progress) -> Result<(), StorageError> {
        self.save_progress(key, progress).await
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryRepository {
    async fn list_bookmarks(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .bookmarks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut entries: Vec<_> = guard.values().cloned().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id().cmp(&b.1.id())));
        Ok(entries.into_iter().map(|(_, q)| q).collect())
    }

    async fn add_bookmark(&self, question: &Question, at: DateTime<Utc>) -> Result<(), StorageError> {
        let mut guard = self
            .bookmarks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let created_at = guard.get(&question.id()).map_or(at, |(t, _)| *t);
        guard.insert(question.id(), (created_at, question.clone()));
        Ok(())
    }

    async fn remove_bookmark(&self, id: QuestionId) -> Result<(), StorageError> {
        let mut guard = self
            .bookmarks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&id).map(|_| ()).ok_or(StorageError::NotFound)
    }

    async fn is_bookmarked(&self, id: QuestionId) -> Result<bool, StorageError> {
        let guard = self
            .bookmarks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.contains_key(&id))
    }
}

/// Aggregates the local repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub bookmarks: Arc<dyn BookmarkRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let bookmarks: Arc<dyn BookmarkRepository> = Arc::new(repo);
        Self {
            progress,
            bookmarks,
        }
    }
}
