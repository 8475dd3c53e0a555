use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::exam::{ExamState, TestModeController, TickOutcome};
use crate::model::{Letter, Progress, Question, QuizMode, QuizSummary, Selection};

/// Default length of a mock paper.
pub const DEFAULT_EXAM_SECS: i64 = 60 * 60;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions found for this selection")]
    EmptySet,
    #[error("no selection has been made")]
    NoSelection,
    #[error("session is not in progress")]
    NotInProgress,
    #[error("question {given} is not the current question ({current})")]
    NotCurrentQuestion { given: usize, current: usize },
    #[error("option {letter} does not exist on this question")]
    UnknownOption { letter: Letter },
    #[error("question {index} was already answered")]
    AlreadyAnswered { index: usize },
    #[error("the exam was submitted; answers are read-only")]
    ReadOnly,
    #[error("a saved session is waiting to be resumed or restarted")]
    ResumePending,
    #[error("there is no saved session to resume")]
    NoResumePending,
    #[error("navigation is locked while the exam is running")]
    ExamRunning,
    #[error("free navigation is only available in exam mode")]
    NavigationLocked,
    #[error("index {index} is outside 0..{len}")]
    OutOfRange { index: usize, len: usize },
}

//
// ─── OUTCOMES ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    ModeSelected,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The session starts at the first question. `discarded_stale` is set when
    /// saved progress no longer matched the question list.
    Started { discarded_stale: bool },
    /// Saved progress can be resumed; call [`QuizSession::resume`] or
    /// [`QuizSession::restart`].
    ResumeOffered { progress: Progress },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: Letter,
    pub correct: bool,
    pub correct_answer: Option<Letter>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Practice answer: revealed immediately and checkpointed.
    Practice {
        feedback: AnswerFeedback,
        checkpoint: Progress,
    },
    /// Exam answer: recorded only, may be changed until submission.
    Recorded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Moved { index: usize },
    Completed { summary: QuizSummary },
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// One quiz attempt, from selection to results.
///
/// All transitions are plain methods; nothing here performs IO. The caller
/// loads questions and saved progress, feeds them in, and persists the
/// checkpoints handed back.
#[derive(Debug, Clone)]
pub struct QuizSession {
    state: SessionState,
    selection: Option<Selection>,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    user_answers: BTreeMap<usize, Letter>,
    // Questions before this index were answered in an earlier sitting.
    resumed_before: usize,
    exam: Option<TestModeController>,
    exam_duration: Duration,
    pending_resume: Option<Progress>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            selection: None,
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            user_answers: BTreeMap::new(),
            resumed_before: 0,
            exam: None,
            exam_duration: Duration::seconds(DEFAULT_EXAM_SECS),
            pending_resume: None,
        }
    }

    #[must_use]
    pub fn with_exam_duration(mut self, duration: Duration) -> Self {
        self.exam_duration = duration;
        self
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    #[must_use]
    pub fn mode(&self) -> Option<QuizMode> {
        self.selection.as_ref().map(Selection::mode)
    }

    #[must_use]
    pub fn session_key(&self) -> Option<String> {
        self.selection.as_ref().map(Selection::session_key)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn user_answers(&self) -> &BTreeMap<usize, Letter> {
        &self.user_answers
    }

    #[must_use]
    pub fn answer_for(&self, index: usize) -> Option<Letter> {
        self.user_answers.get(&index).copied()
    }

    /// Answered in an earlier sitting: read-only, and its pick is not known.
    #[must_use]
    pub fn is_locked(&self, index: usize) -> bool {
        index < self.resumed_before
    }

    #[must_use]
    pub fn exam(&self) -> Option<&TestModeController> {
        self.exam.as_ref()
    }

    #[must_use]
    pub fn pending_resume(&self) -> Option<&Progress> {
        self.pending_resume.as_ref()
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.selection.as_ref().is_some_and(Selection::is_timed)
    }

    /// Exam submitted: answers and explanations are shown read-only.
    #[must_use]
    pub fn is_review(&self) -> bool {
        self.exam.as_ref().is_some_and(TestModeController::is_submitted)
    }

    #[must_use]
    pub fn is_exam_running(&self) -> bool {
        self.exam.as_ref().is_some_and(TestModeController::is_running)
    }

    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.exam
            .as_ref()
            .filter(|exam| exam.is_running())
            .map(|exam| exam.remaining(now))
    }

    #[must_use]
    pub fn summary(&self) -> QuizSummary {
        QuizSummary::new(
            self.questions.len(),
            self.score,
            self.user_answers.len() + self.resumed_before,
        )
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Record what the user picked. Any previous attempt is dropped.
    pub fn select_mode(&mut self, selection: Selection) {
        *self = Self::new().with_exam_duration(self.exam_duration);
        self.selection = Some(selection);
        self.state = SessionState::ModeSelected;
    }

    /// Load the question list and decide between a fresh start and a resume
    /// offer.
    ///
    /// `saved` must already be reconciled between local and remote copies.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` if `select_mode` was not called.
    /// Returns `SessionError::EmptySet` (and falls back to `Idle`) if there
    /// are no questions.
    pub fn start(
        &mut self,
        questions: Vec<Question>,
        saved: Option<Progress>,
        now: DateTime<Utc>,
    ) -> Result<StartOutcome, SessionError> {
        let Some(selection) = self.selection.clone() else {
            return Err(SessionError::NoSelection);
        };

        let mut questions = questions;
        let mut saved = saved;
        if selection.is_shuffle() {
            if let Some(pinned) = saved.as_mut().and_then(|p| p.questions.take()) {
                if !pinned.is_empty() {
                    questions = pinned;
                }
            }
        }

        if questions.is_empty() {
            self.state = SessionState::Idle;
            self.selection = None;
            return Err(SessionError::EmptySet);
        }

        let mut discarded_stale = false;
        if saved.as_ref().is_some_and(|p| p.total != questions.len()) {
            saved = None;
            discarded_stale = true;
        }

        self.questions = questions;
        self.state = SessionState::InProgress;

        match saved {
            Some(progress) if progress.is_resumable() => {
                self.clear_attempt();
                self.pending_resume = Some(progress.clone());
                Ok(StartOutcome::ResumeOffered { progress })
            }
            _ => {
                self.begin(now);
                Ok(StartOutcome::Started { discarded_stale })
            }
        }
    }

    /// Continue after the saved checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoResumePending` if no resume was offered.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        let progress = self
            .pending_resume
            .take()
            .ok_or(SessionError::NoResumePending)?;
        self.begin(now);
        self.current_index = progress
            .index
            .saturating_add(1)
            .min(self.questions.len().saturating_sub(1));
        self.score = progress.score.min(self.current_index);
        self.resumed_before = self.current_index;
        Ok(())
    }

    /// Decline the resume offer and start from the first question.
    /// `reordered` replaces the question list (a fresh shuffle draw).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoResumePending` if no resume was offered.
    /// Returns `SessionError::EmptySet` if `reordered` is empty.
    pub fn restart(
        &mut self,
        reordered: Option<Vec<Question>>,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.pending_resume.is_none() {
            return Err(SessionError::NoResumePending);
        }
        self.replace_questions(reordered)?;
        self.pending_resume = None;
        self.begin(now);
        Ok(())
    }

    /// Clear answers, score, and position. A timed paper gets a new
    /// countdown. The caller deletes the stored checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` before `start`.
    /// Returns `SessionError::EmptySet` if `reordered` is empty.
    pub fn reset(
        &mut self,
        reordered: Option<Vec<Question>>,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if !matches!(
            self.state,
            SessionState::InProgress | SessionState::Completed
        ) {
            return Err(SessionError::NotInProgress);
        }
        self.replace_questions(reordered)?;
        self.pending_resume = None;
        self.state = SessionState::InProgress;
        self.begin(now);
        Ok(())
    }

    /// Answer the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ResumePending` while a resume offer is open.
    /// Returns `SessionError::ReadOnly` after the exam was submitted or ran
    /// out at `now`.
    /// Returns `SessionError::NotCurrentQuestion`, `UnknownOption`, or
    /// `AlreadyAnswered` for answers that do not apply.
    pub fn answer(
        &mut self,
        question_index: usize,
        letter: Letter,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        self.ensure_active()?;
        if self.is_review() {
            return Err(SessionError::ReadOnly);
        }
        if let TickOutcome::TimeUp { .. } = self.tick(now) {
            return Err(SessionError::ReadOnly);
        }
        if question_index != self.current_index {
            return Err(SessionError::NotCurrentQuestion {
                given: question_index,
                current: self.current_index,
            });
        }
        let question = &self.questions[question_index];
        if !question.has_option(letter) {
            return Err(SessionError::UnknownOption { letter });
        }

        if self.is_exam_running() {
            self.user_answers.insert(question_index, letter);
            return Ok(AnswerOutcome::Recorded);
        }

        if self.is_locked(question_index) || self.user_answers.contains_key(&question_index) {
            return Err(SessionError::AlreadyAnswered {
                index: question_index,
            });
        }

        let correct = question.is_correct(letter);
        let feedback = AnswerFeedback {
            selected: letter,
            correct,
            correct_answer: question.correct_answer(),
            explanation: question.explanation().to_string(),
        };
        self.user_answers.insert(question_index, letter);
        if correct {
            self.score += 1;
        }

        Ok(AnswerOutcome::Practice {
            feedback,
            checkpoint: self.checkpoint(),
        })
    }

    /// Move to the next question. Past the last one the session completes;
    /// a running exam is submitted first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` or `ResumePending` when there is
    /// nothing to advance.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<AdvanceOutcome, SessionError> {
        self.ensure_active()?;
        self.tick(now);
        self.current_index += 1;
        if self.current_index < self.questions.len() {
            return Ok(AdvanceOutcome::Moved {
                index: self.current_index,
            });
        }

        self.current_index = self.questions.len() - 1;
        if self.is_exam_running() {
            self.submit()?;
        }
        self.state = SessionState::Completed;
        Ok(AdvanceOutcome::Completed {
            summary: self.summary(),
        })
    }

    /// Step back one question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ExamRunning` while the countdown runs.
    pub fn go_back(&mut self) -> Result<usize, SessionError> {
        self.ensure_active()?;
        if self.is_exam_running() {
            return Err(SessionError::ExamRunning);
        }
        self.current_index = self.current_index.saturating_sub(1);
        Ok(self.current_index)
    }

    /// Navigator jump, available during an exam and its review.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NavigationLocked` outside exam mode and
    /// `SessionError::OutOfRange` for an index past the end.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_active()?;
        if self.exam.is_none() {
            return Err(SessionError::NavigationLocked);
        }
        if index >= self.questions.len() {
            return Err(SessionError::OutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        self.current_index = index;
        Ok(())
    }

    /// Submit the running exam. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NavigationLocked` outside exam mode.
    pub fn submit(&mut self) -> Result<usize, SessionError> {
        let exam = self.exam.as_mut().ok_or(SessionError::NavigationLocked)?;
        let score = exam.submit(&self.user_answers, &self.questions);
        self.score = score;
        Ok(score)
    }

    /// Drive the exam countdown. On expiry the exam is submitted and the
    /// session switches to review.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let Some(exam) = self.exam.as_mut() else {
            return TickOutcome::Idle;
        };
        let outcome = exam.tick(now, &self.user_answers, &self.questions);
        if let TickOutcome::TimeUp { score } = outcome {
            self.score = score;
        }
        outcome
    }

    /// Snapshot to persist under the session key. Shuffle sessions pin their
    /// question list.
    #[must_use]
    pub fn checkpoint(&self) -> Progress {
        let progress = Progress::new(self.current_index, self.score, self.questions.len());
        if self.selection.as_ref().is_some_and(Selection::is_shuffle) {
            progress.with_questions(self.questions.clone())
        } else {
            progress
        }
    }

    //
    // ─── HELPERS ───────────────────────────────────────────────────────────────
    //

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.pending_resume.is_some() {
            return Err(SessionError::ResumePending);
        }
        match self.state {
            SessionState::InProgress => Ok(()),
            SessionState::Completed if self.is_review() => Err(SessionError::ReadOnly),
            _ => Err(SessionError::NotInProgress),
        }
    }

    fn replace_questions(&mut self, reordered: Option<Vec<Question>>) -> Result<(), SessionError> {
        if let Some(questions) = reordered {
            if questions.is_empty() {
                return Err(SessionError::EmptySet);
            }
            self.questions = questions;
        }
        Ok(())
    }

    fn clear_attempt(&mut self) {
        self.current_index = 0;
        self.score = 0;
        self.user_answers.clear();
        self.resumed_before = 0;
        self.exam = None;
    }

    fn begin(&mut self, now: DateTime<Utc>) {
        self.clear_attempt();
        if self.is_timed() {
            let mut exam = TestModeController::new();
            exam.start(self.exam_duration, now);
            self.exam = Some(exam);
        }
    }
}

/// Convenience for views that render the exam header.
#[must_use]
pub fn exam_state(session: &QuizSession) -> Option<ExamState> {
    session.exam().map(TestModeController::state)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_question;
    use crate::time::{fixed_clock, fixed_now};

    fn questions(n: u64) -> Vec<Question> {
        (1..=n).map(|i| test_question(i, "A")).collect()
    }

    fn year() -> Selection {
        Selection::Year {
            year: 2023,
            tag: None,
        }
    }

    fn started(selection: Selection, n: u64) -> QuizSession {
        let mut session = QuizSession::new();
        session.select_mode(selection);
        session.start(questions(n), None, fixed_now()).unwrap();
        session
    }

    #[test]
    fn advancing_through_every_question_completes() {
        let mut session = started(year(), 4);
        let mut last = None;
        for _ in 0..4 {
            last = Some(session.advance(fixed_now()).unwrap());
        }
        assert!(matches!(last, Some(AdvanceOutcome::Completed { .. })));
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn practice_score_counts_correct_answers() {
        let mut session = started(year(), 3);
        for (idx, letter) in [Letter::A, Letter::B, Letter::A].into_iter().enumerate() {
            session.answer(idx, letter, fixed_now()).unwrap();
            session.advance(fixed_now()).unwrap();
        }
        assert_eq!(session.score(), 2);
        assert_eq!(session.summary().score(), 2);
    }

    #[test]
    fn practice_answer_reveals_and_checkpoints() {
        let mut session = started(year(), 3);
        session.advance(fixed_now()).unwrap();
        let outcome = session.answer(1, Letter::C, fixed_now()).unwrap();
        let AnswerOutcome::Practice {
            feedback,
            checkpoint,
        } = outcome
        else {
            panic!("expected practice feedback");
        };
        assert!(!feedback.correct);
        assert_eq!(feedback.correct_answer, Some(Letter::A));
        assert_eq!(checkpoint, Progress::new(1, 0, 3));
    }

    #[test]
    fn answer_must_target_current_question_and_existing_option() {
        let mut session = started(year(), 3);
        assert_eq!(
            session.answer(2, Letter::A, fixed_now()),
            Err(SessionError::NotCurrentQuestion {
                given: 2,
                current: 0
            })
        );
        session.answer(0, Letter::A, fixed_now()).unwrap();
        assert_eq!(
            session.answer(0, Letter::B, fixed_now()),
            Err(SessionError::AlreadyAnswered { index: 0 })
        );
    }

    #[test]
    fn empty_question_set_returns_to_idle() {
        let mut session = QuizSession::new();
        session.select_mode(year());
        assert_eq!(
            session.start(Vec::new(), None, fixed_now()),
            Err(SessionError::EmptySet)
        );
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn resumable_progress_is_offered_then_resumed() {
        let mut session = QuizSession::new();
        session.select_mode(year());
        let outcome = session
            .start(questions(5), Some(Progress::new(2, 2, 5)), fixed_now())
            .unwrap();
        assert!(matches!(outcome, StartOutcome::ResumeOffered { .. }));
        assert_eq!(
            session.advance(fixed_now()),
            Err(SessionError::ResumePending)
        );

        session.resume(fixed_now()).unwrap();
        assert_eq!(session.current_index(), 3);
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn questions_before_the_resume_point_are_locked() {
        let mut session = QuizSession::new();
        session.select_mode(year());
        session
            .start(questions(5), Some(Progress::new(2, 2, 5)), fixed_now())
            .unwrap();
        session.resume(fixed_now()).unwrap();

        assert!(session.is_locked(2));
        assert!(!session.is_locked(3));
        assert_eq!(session.go_back(), Ok(2));
        assert_eq!(
            session.answer(2, Letter::A, fixed_now()),
            Err(SessionError::AlreadyAnswered { index: 2 })
        );
        assert_eq!(
            session.advance(fixed_now()),
            Ok(AdvanceOutcome::Moved { index: 3 })
        );
    }

    #[test]
    fn oversized_checkpoint_index_is_not_offered() {
        let saved: Progress =
            serde_json::from_str(r#"{"index":18446744073709551615,"score":0,"total":3}"#).unwrap();
        let mut session = QuizSession::new();
        session.select_mode(year());
        let outcome = session.start(questions(3), Some(saved), fixed_now()).unwrap();

        assert_eq!(
            outcome,
            StartOutcome::Started {
                discarded_stale: false
            }
        );
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn restart_declines_the_offer() {
        let mut session = QuizSession::new();
        session.select_mode(year());
        session
            .start(questions(5), Some(Progress::new(2, 2, 5)), fixed_now())
            .unwrap();
        session.restart(None, fixed_now()).unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.restart(None, fixed_now()), Err(SessionError::NoResumePending));
    }

    #[test]
    fn stale_progress_is_discarded() {
        let mut session = QuizSession::new();
        session.select_mode(year());
        let outcome = session
            .start(questions(4), Some(Progress::new(1, 1, 9)), fixed_now())
            .unwrap();
        assert_eq!(
            outcome,
            StartOutcome::Started {
                discarded_stale: true
            }
        );
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn shuffle_resume_replays_pinned_questions() {
        let pinned = vec![test_question(40, "A"), test_question(7, "A"), test_question(12, "A")];
        let saved = Progress::new(0, 1, 3).with_questions(pinned.clone());
        let mut session = QuizSession::new();
        session.select_mode(Selection::Shuffle { tag: "renal".into() });
        session.start(questions(60), Some(saved), fixed_now()).unwrap();
        session.resume(fixed_now()).unwrap();

        assert_eq!(session.questions(), pinned.as_slice());
        assert_eq!(session.checkpoint().questions.as_deref(), Some(pinned.as_slice()));
    }

    #[test]
    fn exam_answers_are_recorded_and_scored_on_timeout() {
        let mut clock = fixed_clock();
        let mut session = QuizSession::new().with_exam_duration(Duration::seconds(5));
        session.select_mode(Selection::Mock {
            paper: "mocktest1".into(),
        });
        session.start(questions(3), None, clock.now()).unwrap();

        assert_eq!(session.answer(0, Letter::B, clock.now()), Ok(AnswerOutcome::Recorded));
        assert_eq!(session.answer(0, Letter::A, clock.now()), Ok(AnswerOutcome::Recorded));
        assert_eq!(session.go_back(), Err(SessionError::ExamRunning));
        session.jump_to(2).unwrap();
        session.answer(2, Letter::A, clock.now()).unwrap();

        let mut outcome = TickOutcome::Idle;
        for _ in 0..6 {
            clock.advance_secs(1);
            outcome = session.tick(clock.now());
        }
        assert_eq!(outcome, TickOutcome::Idle);
        assert_eq!(
            exam_state(&session),
            Some(ExamState::Submitted {
                score: 2,
                timed_out: true
            })
        );
        assert_eq!(session.score(), 2);
        assert_eq!(
            session.answer(2, Letter::B, clock.now()),
            Err(SessionError::ReadOnly)
        );
        session.jump_to(0).unwrap();
        assert_eq!(session.go_back(), Ok(0));
    }

    #[test]
    fn advancing_past_the_end_submits_the_exam() {
        let mut session = started(
            Selection::Mock {
                paper: "mocktest2".into(),
            },
            2,
        );
        session.answer(0, Letter::A, fixed_now()).unwrap();
        session.advance(fixed_now()).unwrap();
        let outcome = session.advance(fixed_now()).unwrap();

        assert!(session.is_review());
        assert_eq!(session.submit(), Ok(1));
        assert!(matches!(outcome, AdvanceOutcome::Completed { summary } if summary.score() == 1));
    }

    #[test]
    fn reset_clears_the_attempt() {
        let mut session = started(year(), 3);
        session.answer(0, Letter::A, fixed_now()).unwrap();
        session.advance(fixed_now()).unwrap();
        session.reset(None, fixed_now()).unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.user_answers().is_empty());
    }
}
