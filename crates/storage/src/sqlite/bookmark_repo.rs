use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{Question, QuestionId};

use super::SqliteRepository;
use super::mapping::{conn, map_bookmark_row, question_id_to_i64};
use crate::repository::{BookmarkRepository, StorageError, encode_json};

#[async_trait]
impl BookmarkRepository for SqliteRepository {
    async fn list_bookmarks(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT question_id, payload
            FROM bookmarks
            ORDER BY created_at ASC, question_id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_bookmark_row).collect()
    }

    async fn add_bookmark(&self, question: &Question, at: DateTime<Utc>) -> Result<(), StorageError> {
        // Re-bookmarking refreshes the copy but keeps the original position.
        sqlx::query(
            r"
            INSERT INTO bookmarks (question_id, payload, created_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(question_id) DO UPDATE SET
                payload = excluded.payload
            ",
        )
        .bind(question_id_to_i64(question.id())?)
        .bind(encode_json(question)?)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn remove_bookmark(&self, id: QuestionId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM bookmarks WHERE question_id = ?1")
            .bind(question_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn is_bookmarked(&self, id: QuestionId) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM bookmarks WHERE question_id = ?1")
            .bind(question_id_to_i64(id)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        Ok(row.is_some())
    }
}
