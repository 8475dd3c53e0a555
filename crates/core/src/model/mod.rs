mod ids;
mod progress;
mod question;
mod selection;
mod summary;

pub use ids::{ParseIdError, QuestionId};

pub use progress::{Progress, ProgressSource, Reconciled, reconcile};
pub use question::{Letter, LetterError, Question, QuestionDraft, QuestionError};
pub use selection::{QuizMode, Selection, SelectionParseError, mock_paper_number, mock_paper_title};
pub use summary::{QuizSummary, Verdict};

#[cfg(test)]
pub(crate) use question::tests::question as test_question;
