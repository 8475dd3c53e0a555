use chrono::Duration;

use quiz_core::model::{Letter, Verdict};
use quiz_core::session::SessionState;
use services::QuizRunner;
use services::sessions::{OptionState, SessionView};

use crate::views::ViewError;
use crate::vm::markdown_vm::markdown_to_html;
use crate::vm::time_fmt::format_countdown;

/// User actions on the quiz screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Answer { index: usize, letter: Letter },
    Next,
    Previous,
    Jump(usize),
    Submit,
    Resume,
    StartOver,
    Reset,
    ToggleBookmark,
}

/// Apply an intent through the runner.
///
/// # Errors
///
/// Returns the `ViewError` to show as a notice.
pub async fn dispatch(runner: &QuizRunner, intent: QuizIntent) -> Result<(), ViewError> {
    let result = match intent {
        QuizIntent::Answer { index, letter } => runner.answer(index, letter).await.map(drop),
        QuizIntent::Next => runner.advance().await.map(drop),
        QuizIntent::Previous => runner.go_back().await.map(drop),
        QuizIntent::Jump(index) => runner.jump_to(index).await,
        QuizIntent::Submit => runner.submit().await.map(drop),
        QuizIntent::Resume => runner.resume().await,
        QuizIntent::StartOver => runner.restart().await,
        QuizIntent::Reset => runner.reset().await,
        QuizIntent::ToggleBookmark => runner.toggle_bookmark().await.map(drop),
    };
    result.map_err(|err| ViewError::from(&err))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub letter: Letter,
    pub label: String,
    pub class: &'static str,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavCellVm {
    pub index: usize,
    pub label: String,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub score_label: String,
    pub percentage_label: String,
    pub message: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
    /// Nothing loaded, or the selection turned out empty.
    Idle,
    ResumePrompt,
    Question,
    Results,
}

/// Everything the quiz screen renders, derived from one `SessionView`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizScreenVm {
    pub phase: QuizPhase,
    pub title: String,
    pub counter: String,
    pub resume_label: Option<String>,
    pub index: usize,
    pub question_html: String,
    pub year_label: String,
    pub category: String,
    pub options: Vec<OptionVm>,
    pub explanation_html: Option<String>,
    pub timer_label: Option<String>,
    pub show_submit: bool,
    pub review_banner: Option<&'static str>,
    pub navigator: Vec<NavCellVm>,
    pub can_go_back: bool,
    pub can_advance: bool,
    pub next_label: &'static str,
    pub bookmark_label: &'static str,
    pub results: Option<ResultsVm>,
}

impl QuizScreenVm {
    #[must_use]
    pub fn from_view(view: &SessionView) -> Self {
        let phase = match view.state {
            SessionState::Completed => QuizPhase::Results,
            SessionState::InProgress if view.resume_offer.is_some() => QuizPhase::ResumePrompt,
            SessionState::InProgress => QuizPhase::Question,
            SessionState::Idle | SessionState::ModeSelected => QuizPhase::Idle,
        };

        let exam_running = view.exam.is_some_and(|exam| !exam.submitted);
        let question = view.question.as_ref();
        let options = question
            .map(|q| {
                q.options
                    .iter()
                    .map(|option| OptionVm {
                        letter: option.letter,
                        label: format!("{}. {}", option.letter, option.text),
                        class: option_class(option.state),
                        disabled: view.review || (!exam_running && q.answered),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let navigator = view
            .navigator
            .iter()
            .map(|cell| NavCellVm {
                index: cell.index,
                label: (cell.index + 1).to_string(),
                class: match (cell.current, cell.correct, cell.answered) {
                    (true, _, _) => "nav-cell nav-cell--current",
                    (false, Some(true), _) => "nav-cell nav-cell--correct",
                    (false, Some(false), _) => "nav-cell nav-cell--incorrect",
                    (false, None, true) => "nav-cell nav-cell--answered",
                    (false, None, false) => "nav-cell",
                },
            })
            .collect();

        let is_last = view.total > 0 && view.position + 1 == view.total;
        let answered = question.is_some_and(|q| q.answered);
        let review_banner = view.exam.filter(|exam| exam.submitted).map(|exam| {
            if exam.timed_out {
                "Time is up! Your answers were submitted."
            } else {
                "Test submitted. Review your answers."
            }
        });

        Self {
            phase,
            title: view.title.clone(),
            counter: view.counter(),
            resume_label: view.resume_offer.as_ref().map(|p| {
                format!("Resume from question {} of {}?", p.index.saturating_add(2), p.total)
            }),
            index: view.position,
            question_html: question.map(|q| markdown_to_html(&q.text)).unwrap_or_default(),
            year_label: question.map(|q| q.display_year.clone()).unwrap_or_default(),
            category: question.map(|q| q.category.clone()).unwrap_or_default(),
            options,
            explanation_html: question
                .and_then(|q| q.explanation.as_deref())
                .filter(|text| !text.is_empty())
                .map(markdown_to_html),
            timer_label: view
                .exam
                .filter(|exam| !exam.submitted)
                .map(|exam| format!("Time Left: {}", format_countdown(Duration::seconds(exam.remaining_secs)))),
            show_submit: exam_running,
            review_banner,
            navigator,
            can_go_back: view.can_go_back,
            can_advance: exam_running || view.review || answered,
            next_label: if is_last { "Finish" } else { "Next" },
            bookmark_label: if view.bookmarked { "★ Bookmarked" } else { "☆ Bookmark" },
            results: view.summary.map(|summary| ResultsVm {
                score_label: format!("{} / {}", summary.score(), summary.total()),
                percentage_label: format!("{}%", summary.percentage()),
                message: verdict_message(summary.verdict()),
            }),
        }
    }
}

fn option_class(state: OptionState) -> &'static str {
    match state {
        OptionState::Idle => "option-btn",
        OptionState::Selected => "option-btn option-btn--selected",
        OptionState::Correct => "option-btn option-btn--correct",
        OptionState::Incorrect => "option-btn option-btn--incorrect",
    }
}

fn verdict_message(verdict: Verdict) -> &'static str {
    verdict.message()
}
