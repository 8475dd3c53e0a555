use chrono::{DateTime, Utc};

use quiz_core::exam::ExamState;
use quiz_core::extract::clean_explanation;
use quiz_core::model::{Letter, Progress, Question, QuizSummary, Selection};
use quiz_core::session::{QuizSession, SessionState, exam_state};

/// Presentation-agnostic snapshot of the active session.
///
/// Built after every change and handed to the rendering layer. It carries
/// no markup; the UI decides how to format it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub state: SessionState,
    pub selection: Option<Selection>,
    pub title: String,
    pub position: usize,
    pub total: usize,
    pub score: usize,
    pub question: Option<QuestionView>,
    pub exam: Option<ExamView>,
    pub navigator: Vec<NavigatorCell>,
    pub review: bool,
    pub can_go_back: bool,
    pub resume_offer: Option<Progress>,
    pub bookmarked: bool,
    pub summary: Option<QuizSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub text: String,
    pub display_year: String,
    pub category: String,
    pub options: Vec<OptionView>,
    /// Cleaned explanation, present once the answer is revealed.
    pub explanation: Option<String>,
    pub answered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub letter: Letter,
    pub text: String,
    pub state: OptionState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    /// Picked during a running exam; correctness stays hidden.
    Selected,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamView {
    pub remaining_secs: i64,
    pub submitted: bool,
    pub timed_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorCell {
    pub index: usize,
    pub current: bool,
    pub answered: bool,
    /// Known only in review.
    pub correct: Option<bool>,
}

impl SessionView {
    #[must_use]
    pub fn idle() -> Self {
        Self::build(&QuizSession::new(), false, DateTime::<Utc>::MIN_UTC)
    }

    #[must_use]
    pub fn build(session: &QuizSession, bookmarked: bool, now: DateTime<Utc>) -> Self {
        let state = session.state();
        let review = session.is_review();
        let in_quiz = matches!(state, SessionState::InProgress | SessionState::Completed);
        let resume_offer = session.pending_resume().cloned();

        let question = session
            .current_question()
            .filter(|_| in_quiz && resume_offer.is_none())
            .map(|q| question_view(session, session.current_index(), q, review));

        let navigator = if session.is_timed() && in_quiz {
            navigator(session, review)
        } else {
            Vec::new()
        };

        let exam = exam_state(session).map(|exam| match exam {
            ExamState::Submitted { timed_out, .. } => ExamView {
                remaining_secs: 0,
                submitted: true,
                timed_out,
            },
            ExamState::NotStarted | ExamState::Running { .. } => ExamView {
                remaining_secs: session.remaining(now).unwrap_or(0),
                submitted: false,
                timed_out: false,
            },
        });

        Self {
            state,
            selection: session.selection().cloned(),
            title: session.selection().map(Selection::title).unwrap_or_default(),
            position: session.current_index(),
            total: session.questions().len(),
            score: session.score(),
            question,
            exam,
            navigator,
            review,
            can_go_back: in_quiz && session.current_index() > 0 && !session.is_exam_running(),
            resume_offer,
            bookmarked,
            summary: (state == SessionState::Completed).then(|| session.summary()),
        }
    }

    /// "Question n of m" counter, one-based.
    #[must_use]
    pub fn counter(&self) -> String {
        if self.total == 0 {
            return String::new();
        }
        format!("Question {} of {}", self.position + 1, self.total)
    }
}

fn question_view(session: &QuizSession, index: usize, question: &Question, review: bool) -> QuestionView {
    let picked = session.answer_for(index);
    let locked = session.is_locked(index);
    let answered = picked.is_some() || locked;
    let revealed = review || (!session.is_timed() && answered);

    let options = question
        .options()
        .iter()
        .map(|(letter, text)| {
            let state = if revealed {
                if question.is_correct(*letter) {
                    OptionState::Correct
                } else if picked == Some(*letter) {
                    OptionState::Incorrect
                } else {
                    OptionState::Idle
                }
            } else if picked == Some(*letter) {
                OptionState::Selected
            } else {
                OptionState::Idle
            };
            OptionView {
                letter: *letter,
                text: text.clone(),
                state,
            }
        })
        .collect();

    QuestionView {
        index,
        text: question.text().to_string(),
        display_year: question.display_year(),
        category: question.category().to_string(),
        options,
        explanation: revealed.then(|| clean_explanation(question.explanation())),
        answered,
    }
}

fn navigator(session: &QuizSession, review: bool) -> Vec<NavigatorCell> {
    session
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let picked = session.answer_for(index);
            NavigatorCell {
                index,
                current: index == session.current_index(),
                answered: picked.is_some() || session.is_locked(index),
                correct: review.then(|| picked.is_some_and(|l| question.is_correct(l))),
            }
        })
        .collect()
}
