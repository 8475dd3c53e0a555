use log::info;
use std::sync::Arc;

use storage::repository::{RemoteProgressRepository, Storage};

use crate::Clock;
use crate::config::QuizConfig;
use crate::error::AppServicesError;
use crate::progress_store::ProgressStore;
use crate::question_source::{QuestionSource, SheetQuestionSource};
use crate::remote::HttpProgressMirror;
use crate::sessions::QuizRunner;

/// Assembles app-facing services from configuration.
#[derive(Clone)]
pub struct AppServices {
    source: Arc<dyn QuestionSource>,
    runner: Arc<QuizRunner>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the configured sheet.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// HTTP client cannot be built.
    pub async fn new_sqlite(config: &QuizConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.db_url).await?;
        let source = Arc::new(SheetQuestionSource::new(config.sheet.clone(), clock)?);
        Ok(Self::from_parts(storage, source, config, clock))
    }

    /// Wire services around an existing storage and question source.
    #[must_use]
    pub fn from_parts(
        storage: Storage,
        source: Arc<dyn QuestionSource>,
        config: &QuizConfig,
        clock: Clock,
    ) -> Self {
        let remote = config.remote.clone().map(|remote| {
            info!("mirroring progress for user {}", remote.uid);
            Arc::new(HttpProgressMirror::new(remote)) as Arc<dyn RemoteProgressRepository>
        });
        let progress = ProgressStore::new(Arc::clone(&storage.progress)).with_remote(remote);
        let runner = QuizRunner::new(
            Arc::clone(&source),
            progress,
            Arc::clone(&storage.bookmarks),
            clock,
        )
        .with_exam_duration(config.exam_duration);

        Self {
            source,
            runner: Arc::new(runner),
        }
    }

    #[must_use]
    pub fn runner(&self) -> Arc<QuizRunner> {
        Arc::clone(&self.runner)
    }

    #[must_use]
    pub fn source(&self) -> Arc<dyn QuestionSource> {
        Arc::clone(&self.source)
    }
}
