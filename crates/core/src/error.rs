use thiserror::Error;

use crate::model::{LetterError, QuestionError, SelectionParseError};
use crate::session::SessionError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Letter(#[from] LetterError),
    #[error(transparent)]
    Selection(#[from] SelectionParseError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
