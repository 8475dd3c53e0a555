use dioxus::prelude::*;

use services::QuizError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    /// The selection resolved to zero questions.
    EmptySet,
    /// No question source could be reached.
    Unavailable,
    /// The quiz refused the action in its current state.
    Rejected,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Unknown => "Something went wrong. Please try again.",
            ViewError::EmptySet => "No questions found for this selection.",
            ViewError::Unavailable => "Questions could not be loaded. Check your connection.",
            ViewError::Rejected => "That action is not available right now.",
        }
    }
}

impl From<&QuizError> for ViewError {
    fn from(err: &QuizError) -> Self {
        match err {
            err if err.is_empty_set() => ViewError::EmptySet,
            QuizError::Source(_) => ViewError::Unavailable,
            QuizError::Session(_) | QuizError::NoActiveQuiz => ViewError::Rejected,
            _ => ViewError::Unknown,
        }
    }
}

impl From<QuizError> for ViewError {
    fn from(err: QuizError) -> Self {
        ViewError::from(&err)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
