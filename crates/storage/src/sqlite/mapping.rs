use quiz_core::model::{Question, QuestionId};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn question_id_to_i64(id: QuestionId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("question_id overflow".into()))
}

pub(crate) fn map_bookmark_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let payload: String = row.try_get("payload").map_err(ser)?;
    let question: Question = serde_json::from_str(&payload).map_err(ser)?;

    let stored_id: i64 = row.try_get("question_id").map_err(ser)?;
    if question_id_to_i64(question.id())? != stored_id {
        return Err(StorageError::Serialization(format!(
            "bookmark {stored_id} holds question {}",
            question.id()
        )));
    }
    Ok(question)
}
