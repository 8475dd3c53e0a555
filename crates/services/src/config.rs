use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
pub const DEFAULT_SNAPSHOT_PATH: &str = "data.json";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;
pub const DEFAULT_EXAM_SECS: i64 = quiz_core::session::DEFAULT_EXAM_SECS;
pub const SHEET_TIMEOUT: Duration = Duration::from_secs(10);

/// Where questions come from and how long they stay cached.
#[derive(Clone, Debug)]
pub struct SheetConfig {
    pub csv_url: Option<String>,
    pub snapshot_path: Option<PathBuf>,
    pub cache_ttl: Duration,
    pub timeout: Duration,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            csv_url: None,
            snapshot_path: Some(PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            timeout: SHEET_TIMEOUT,
        }
    }
}

impl SheetConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let csv_url = non_empty_var("QUIZ_SHEET_CSV_URL");
        let snapshot_path = non_empty_var("QUIZ_SNAPSHOT_PATH")
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_PATH.into());
        let cache_ttl = non_empty_var("QUIZ_CACHE_TTL_SECS")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);
        Self {
            csv_url,
            snapshot_path: Some(PathBuf::from(snapshot_path)),
            cache_ttl: Duration::from_secs(cache_ttl),
            timeout: SHEET_TIMEOUT,
        }
    }
}

/// Identity for the remote progress mirror. All three values are required.
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub base_url: String,
    pub uid: String,
    pub token: String,
}

impl RemoteConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Some(Self {
            base_url: non_empty_var("QUIZ_REMOTE_BASE_URL")?,
            uid: non_empty_var("QUIZ_REMOTE_UID")?,
            token: non_empty_var("QUIZ_REMOTE_TOKEN")?,
        })
    }
}

/// Everything the app needs to assemble services.
#[derive(Clone, Debug)]
pub struct QuizConfig {
    pub db_url: String,
    pub sheet: SheetConfig,
    pub exam_duration: chrono::Duration,
    pub remote: Option<RemoteConfig>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.into(),
            sheet: SheetConfig::default(),
            exam_duration: chrono::Duration::seconds(DEFAULT_EXAM_SECS),
            remote: None,
        }
    }
}

impl QuizConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let db_url = non_empty_var("QUIZ_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.into());
        let exam_secs = non_empty_var("QUIZ_EXAM_SECS")
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_EXAM_SECS);
        Self {
            db_url,
            sheet: SheetConfig::from_env(),
            exam_duration: chrono::Duration::seconds(exam_secs),
            remote: RemoteConfig::from_env(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
