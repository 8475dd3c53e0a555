use async_trait::async_trait;
use chrono::Utc;
use quiz_core::model::Progress;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, ser};
use crate::repository::{ProgressRepository, StorageError, decode_progress, encode_json};

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(&self, key: &str) -> Result<Option<Progress>, StorageError> {
        let row = sqlx::query("SELECT payload FROM progress WHERE session_key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let payload: String = row.try_get("payload").map_err(ser)?;
        decode_progress(&payload).map(Some)
    }

    async fn save_progress(&self, key: &str, progress: &Progress) -> Result<(), StorageError> {
        let payload = encode_json(progress)?;
        sqlx::query(
            r"
            INSERT INTO progress (session_key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(session_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn delete_progress(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM progress WHERE session_key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }

    async fn list_progress_keys(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query("SELECT session_key FROM progress ORDER BY session_key")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("session_key").map_err(ser))
            .collect()
    }

    async fn clear_progress(&self) -> Result<u64, StorageError> {
        let res = sqlx::query("DELETE FROM progress")
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(res.rows_affected())
    }
}
