use log::{debug, warn};
use std::sync::Arc;
use tokio::task::JoinHandle;

use quiz_core::model::{Progress, reconcile};
use storage::repository::{ProgressRepository, RemoteProgressRepository, StorageError};

/// Local checkpoints with an optional best-effort remote mirror.
///
/// Local storage is authoritative for writes. On load, a remote copy that is
/// strictly ahead replaces the local one.
#[derive(Clone)]
pub struct ProgressStore {
    local: Arc<dyn ProgressRepository>,
    remote: Option<Arc<dyn RemoteProgressRepository>>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(local: Arc<dyn ProgressRepository>) -> Self {
        Self {
            local,
            remote: None,
        }
    }

    #[must_use]
    pub fn with_remote(mut self, remote: Option<Arc<dyn RemoteProgressRepository>>) -> Self {
        self.remote = remote;
        self
    }

    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Write the checkpoint locally and start a background mirror write.
    ///
    /// The returned handle belongs to the mirror task; dropping it detaches
    /// the task. Mirror failures are only logged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the local write fails.
    pub async fn save(
        &self,
        key: &str,
        progress: &Progress,
    ) -> Result<Option<JoinHandle<()>>, StorageError> {
        self.local.save_progress(key, progress).await?;

        let Some(remote) = self.remote.clone() else {
            return Ok(None);
        };
        let key = key.to_string();
        let progress = progress.clone();
        Ok(Some(tokio::spawn(async move {
            if let Err(err) = remote.put(&key, &progress).await {
                warn!("remote progress write for {key} failed: {err}");
            }
        })))
    }

    /// Local checkpoint only. A malformed entry is deleted and reported as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for failures other than a malformed payload.
    pub async fn load_local(&self, key: &str) -> Result<Option<Progress>, StorageError> {
        match self.local.get_progress(key).await {
            Ok(progress) => Ok(progress),
            Err(err) if err.is_malformed() => {
                warn!("dropping malformed progress for {key}: {err}");
                self.local.delete_progress(key).await?;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Reconciled checkpoint for a session key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if local storage fails. Remote failures fall
    /// back to the local copy.
    pub async fn load(&self, key: &str) -> Result<Option<Progress>, StorageError> {
        let local = self.load_local(key).await?;
        let Some(remote) = self.remote.as_ref() else {
            return Ok(local);
        };

        let remote = match remote.get(key).await {
            Ok(progress) => progress,
            Err(err) => {
                warn!("remote progress read for {key} failed: {err}");
                None
            }
        };

        let Some(merged) = reconcile(local, remote) else {
            return Ok(None);
        };
        if merged.needs_local_write() {
            debug!("remote progress for {key} is ahead; updating local copy");
            self.local.save_progress(key, &merged.progress).await?;
        }
        Ok(Some(merged.progress))
    }

    /// Delete the local checkpoint. The remote copy is left alone.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    pub async fn clear(&self, key: &str) -> Result<(), StorageError> {
        self.local.delete_progress(key).await
    }

    /// Delete every local checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    pub async fn clear_all(&self) -> Result<u64, StorageError> {
        self.local.clear_progress().await
    }
}
