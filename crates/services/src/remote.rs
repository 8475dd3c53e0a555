use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use quiz_core::model::Progress;
use storage::repository::{RemoteProgressRepository, StorageError};

use crate::config::RemoteConfig;
use crate::error::RemoteError;

/// Per-user progress mirror over HTTP.
///
/// Checkpoints live at `{base_url}/users/{uid}/progress/{key}` and are sent
/// as JSON with a bearer token.
#[derive(Clone)]
pub struct HttpProgressMirror {
    client: Client,
    config: RemoteConfig,
}

impl HttpProgressMirror {
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Use a preconfigured client (timeouts, proxies).
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn url(&self, key: &str) -> String {
        format!(
            "{}/users/{}/progress/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.uid,
            key
        )
    }

    /// Fetch the mirrored checkpoint, `None` when the server has none.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on transport failures or non-success statuses.
    pub async fn fetch(&self, key: &str) -> Result<Option<Progress>, RemoteError> {
        let response = self
            .client
            .get(self.url(key))
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(RemoteError::HttpStatus(response.status()));
        }
        Ok(response.json::<Option<Progress>>().await?)
    }

    /// Replace the mirrored checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on transport failures or non-success statuses.
    pub async fn store(&self, key: &str, progress: &Progress) -> Result<(), RemoteError> {
        let response = self
            .client
            .put(self.url(key))
            .bearer_auth(&self.config.token)
            .json(progress)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::HttpStatus(response.status()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteProgressRepository for HttpProgressMirror {
    async fn get(&self, key: &str) -> Result<Option<Progress>, StorageError> {
        Ok(self.fetch(key).await?)
    }

    async fn put(&self, key: &str, progress: &Progress) -> Result<(), StorageError> {
        Ok(self.store(key, progress).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror(base_url: &str) -> HttpProgressMirror {
        HttpProgressMirror::new(RemoteConfig {
            base_url: base_url.into(),
            uid: "user-1".into(),
            token: "secret".into(),
        })
    }

    #[test]
    fn url_is_scoped_to_user() {
        let mirror = mirror("https://progress.example.com/");
        assert_eq!(
            mirror.url("year_2023"),
            "https://progress.example.com/users/user-1/progress/year_2023"
        );
    }

    #[tokio::test]
    async fn unreachable_server_maps_to_connection_error() {
        let mirror = mirror("http://127.0.0.1:9");
        let err = RemoteProgressRepository::get(&mirror, "k").await.unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));
    }
}
