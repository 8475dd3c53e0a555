use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use reqwest::Client;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use quiz_core::model::Question;

use crate::Clock;
use crate::config::SheetConfig;
use crate::error::SourceError;
use crate::sheet::{parse_sheet_csv, questions_from_dump};

//
// ─── FILTERS ───────────────────────────────────────────────────────────────────
//

/// Which questions a caller wants from the full sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionFilter {
    All,
    /// Questions of one year. `tags` is a comma-separated list of fragments;
    /// a question matches if any of its tags contains any fragment,
    /// ignoring case.
    Year { year: u32, tags: Option<String> },
    /// Questions carrying this exact tag, ignoring case.
    Tag(String),
}

impl QuestionFilter {
    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        match self {
            QuestionFilter::All => true,
            QuestionFilter::Year { year, tags } => {
                if question.year() != *year {
                    return false;
                }
                let fragments = tag_fragments(tags.as_deref());
                fragments.is_empty() || question.has_tag_containing(&fragments)
            }
            QuestionFilter::Tag(tag) => question.has_tag(tag),
        }
    }

    #[must_use]
    pub fn apply(&self, questions: &[Question]) -> Vec<Question> {
        questions
            .iter()
            .filter(|q| self.matches(q))
            .cloned()
            .collect()
    }
}

fn tag_fragments(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Entry of the year picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearEntry {
    pub id: String,
    pub year: u32,
    pub description: String,
}

/// Distinct non-zero years, newest first.
#[must_use]
pub fn years_of(questions: &[Question]) -> Vec<YearEntry> {
    let years: BTreeSet<u32> = questions
        .iter()
        .map(Question::year)
        .filter(|y| *y != 0)
        .collect();
    years
        .into_iter()
        .rev()
        .map(|year| YearEntry {
            id: year.to_string(),
            year,
            description: format!("Quiz Year {year}"),
        })
        .collect()
}

//
// ─── SOURCE CONTRACT ───────────────────────────────────────────────────────────
//

#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// The full question list, possibly served from cache.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::SourceUnavailable` when nothing can be loaded.
    async fn all_questions(&self) -> Result<Arc<Vec<Question>>, SourceError>;

    /// Bypass the cache and reload.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::SourceUnavailable` when nothing can be loaded.
    async fn refresh(&self) -> Result<Vec<Question>, SourceError>;

    /// # Errors
    ///
    /// Returns `SourceError` when the question list cannot be loaded.
    async fn fetch_questions(&self, filter: &QuestionFilter) -> Result<Vec<Question>, SourceError> {
        let questions = self.all_questions().await?;
        Ok(filter.apply(&questions))
    }

    /// # Errors
    ///
    /// Returns `SourceError` when the question list cannot be loaded.
    async fn list_years(&self) -> Result<Vec<YearEntry>, SourceError> {
        let questions = self.all_questions().await?;
        Ok(years_of(&questions))
    }
}

/// Fixed question list, used by tests and offline previews.
#[derive(Clone, Default)]
pub struct StaticQuestionSource {
    questions: Arc<Vec<Question>>,
}

impl StaticQuestionSource {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: Arc::new(questions),
        }
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn all_questions(&self) -> Result<Arc<Vec<Question>>, SourceError> {
        Ok(Arc::clone(&self.questions))
    }

    async fn refresh(&self) -> Result<Vec<Question>, SourceError> {
        Ok(self.questions.as_ref().clone())
    }
}

//
// ─── SHEET SOURCE ──────────────────────────────────────────────────────────────
//

struct SheetCache {
    questions: Arc<Vec<Question>>,
    fetched_at: DateTime<Utc>,
}

/// Questions from the published sheet, cached for the configured TTL.
///
/// Load order: fresh cache, sheet CSV, local JSON snapshot, stale cache.
pub struct SheetQuestionSource {
    client: Client,
    config: SheetConfig,
    clock: Clock,
    cache: Mutex<Option<SheetCache>>,
}

impl SheetQuestionSource {
    /// # Errors
    ///
    /// Returns `SourceError::Http` if the HTTP client cannot be built.
    pub fn new(config: SheetConfig, clock: Clock) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            clock,
            cache: Mutex::new(None),
        })
    }

    async fn load(&self, force: bool) -> Result<Arc<Vec<Question>>, SourceError> {
        let mut cache = self.cache.lock().await;
        let now = self.clock.now();

        if !force {
            if let Some(cached) = cache.as_ref().filter(|c| self.is_fresh(c, now)) {
                return Ok(Arc::clone(&cached.questions));
            }
        }

        match self.fetch_sheet().await {
            Ok(Some(questions)) => {
                info!("loaded {} questions from sheet", questions.len());
                return Ok(Self::store(&mut cache, questions, now));
            }
            Ok(None) => debug!("no sheet url configured"),
            Err(err) => error!("sheet fetch failed: {err}"),
        }

        if let Some(path) = self.config.snapshot_path.as_deref() {
            match read_snapshot(path).await {
                Ok(Some(questions)) => {
                    warn!(
                        "falling back to snapshot {} ({} questions)",
                        path.display(),
                        questions.len()
                    );
                    return Ok(Self::store(&mut cache, questions, now));
                }
                Ok(None) => debug!("snapshot {} not present", path.display()),
                Err(err) => error!("snapshot {} unreadable: {err}", path.display()),
            }
        }

        if let Some(stale) = cache.as_ref() {
            warn!("returning stale question cache");
            return Ok(Arc::clone(&stale.questions));
        }
        Err(SourceError::SourceUnavailable)
    }

    fn is_fresh(&self, cached: &SheetCache, now: DateTime<Utc>) -> bool {
        match (now - cached.fetched_at).to_std() {
            Ok(age) => age < self.config.cache_ttl,
            Err(_) => true,
        }
    }

    fn store(
        cache: &mut Option<SheetCache>,
        questions: Vec<Question>,
        now: DateTime<Utc>,
    ) -> Arc<Vec<Question>> {
        let questions = Arc::new(questions);
        *cache = Some(SheetCache {
            questions: Arc::clone(&questions),
            fetched_at: now,
        });
        questions
    }

    async fn fetch_sheet(&self) -> Result<Option<Vec<Question>>, SourceError> {
        let Some(url) = self.config.csv_url.as_deref() else {
            return Ok(None);
        };
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::HttpStatus(response.status()));
        }
        let body = response.text().await?;
        parse_sheet_csv(&body).map(Some)
    }
}

async fn read_snapshot(path: &Path) -> Result<Option<Vec<Question>>, SourceError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(SourceError::Snapshot(err.to_string())),
    };
    let value = serde_json::from_str(&text).map_err(|e| SourceError::Snapshot(e.to_string()))?;
    Ok(Some(questions_from_dump(value)))
}

#[async_trait]
impl QuestionSource for SheetQuestionSource {
    async fn all_questions(&self) -> Result<Arc<Vec<Question>>, SourceError> {
        self.load(false).await
    }

    async fn refresh(&self) -> Result<Vec<Question>, SourceError> {
        let questions = self.load(true).await?;
        Ok(questions.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionDraft, QuestionId};
    use quiz_core::time::fixed_now;
    use std::path::PathBuf;
    use std::time::Duration;

    fn question(id: u64, year: u32, tags: &[&str]) -> Question {
        QuestionDraft {
            id: QuestionId::new(id),
            year,
            text: format!("Q{id}"),
            correct_answer: "A".into(),
            tags: tags.iter().map(ToString::to_string).collect(),
            ..QuestionDraft::default()
        }
        .validate()
        .unwrap()
    }

    fn temp_snapshot(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("quiz-snapshot-{name}-{}.json", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn year_filter_uses_tag_fragments() {
        let questions = vec![
            question(1, 2023, &["HaryanaMO"]),
            question(2, 2023, &["Renal"]),
            question(3, 2022, &["HaryanaMO"]),
        ];
        let filter = QuestionFilter::Year {
            year: 2023,
            tags: Some("haryana, cardio".into()),
        };
        let ids: Vec<u64> = filter.apply(&questions).iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![1]);

        let all_2023 = QuestionFilter::Year {
            year: 2023,
            tags: None,
        };
        assert_eq!(all_2023.apply(&questions).len(), 2);
    }

    #[test]
    fn tag_filter_is_exact_but_case_insensitive() {
        let questions = vec![question(1, 0, &["Renal"]), question(2, 0, &["RenalStones"])];
        let matched = QuestionFilter::Tag("renal".into()).apply(&questions);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id(), QuestionId::new(1));
    }

    #[test]
    fn years_are_distinct_non_zero_descending() {
        let questions = vec![
            question(1, 2021, &[]),
            question(2, 0, &[]),
            question(3, 2023, &[]),
            question(4, 2021, &[]),
        ];
        let years = years_of(&questions);
        assert_eq!(
            years.iter().map(|y| y.year).collect::<Vec<_>>(),
            vec![2023, 2021]
        );
        assert_eq!(years[0].description, "Quiz Year 2023");
    }

    #[tokio::test]
    async fn falls_back_to_snapshot_when_sheet_unreachable() {
        let path = temp_snapshot("fallback", r#"[{"id": 1, "year": 2020, "question_text": "Q?"}]"#);
        let config = SheetConfig {
            csv_url: Some("http://127.0.0.1:9/sheet.csv".into()),
            snapshot_path: Some(path.clone()),
            cache_ttl: Duration::from_secs(300),
            timeout: Duration::from_secs(2),
        };
        let source = SheetQuestionSource::new(config, Clock::fixed(fixed_now())).unwrap();

        let years = source.list_years().await.unwrap();
        assert_eq!(years.len(), 1);
        assert_eq!(years[0].year, 2020);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn stale_cache_outlives_missing_snapshot() {
        let path = temp_snapshot("stale", r#"[{"id": 5, "question_text": "Q?", "tags": ["renal"]}]"#);
        let config = SheetConfig {
            csv_url: None,
            snapshot_path: Some(path.clone()),
            cache_ttl: Duration::ZERO,
            timeout: Duration::from_secs(1),
        };
        let source = SheetQuestionSource::new(config, Clock::fixed(fixed_now())).unwrap();

        assert_eq!(source.refresh().await.unwrap().len(), 1);
        std::fs::remove_file(&path).unwrap();

        let renal = source
            .fetch_questions(&QuestionFilter::Tag("Renal".into()))
            .await
            .unwrap();
        assert_eq!(renal.len(), 1);
    }

    #[tokio::test]
    async fn nothing_to_load_is_unavailable() {
        let config = SheetConfig {
            csv_url: None,
            snapshot_path: None,
            ..SheetConfig::default()
        };
        let source = SheetQuestionSource::new(config, Clock::fixed(fixed_now())).unwrap();
        assert!(matches!(
            source.all_questions().await,
            Err(SourceError::SourceUnavailable)
        ));
    }
}
