use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

use crate::model::{Letter, Question};

/// Lifecycle of a timed mock paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamState {
    NotStarted,
    Running { ends_at: DateTime<Utc> },
    Submitted { score: usize, timed_out: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do: the exam has not started or is already submitted.
    Idle,
    Running { remaining: i64 },
    /// The countdown hit zero and the exam was submitted on this tick.
    TimeUp { score: usize },
}

/// Countdown and submission for exam mode.
///
/// The controller never reads the clock itself; callers pass `now`, which
/// keeps the countdown deterministic under a fixed clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestModeController {
    state: ExamState,
}

impl Default for TestModeController {
    fn default() -> Self {
        Self::new()
    }
}

impl TestModeController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ExamState::NotStarted,
        }
    }

    #[must_use]
    pub fn state(&self) -> ExamState {
        self.state
    }

    /// Start (or restart) the countdown.
    pub fn start(&mut self, duration: Duration, now: DateTime<Utc>) {
        self.state = ExamState::Running {
            ends_at: now + duration,
        };
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, ExamState::Running { .. })
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        matches!(self.state, ExamState::Submitted { .. })
    }

    #[must_use]
    pub fn score(&self) -> Option<usize> {
        match self.state {
            ExamState::Submitted { score, .. } => Some(score),
            _ => None,
        }
    }

    /// Whole seconds left on the countdown, never negative. Zero unless
    /// running.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> i64 {
        match self.state {
            ExamState::Running { ends_at } => (ends_at - now).num_seconds().max(0),
            _ => 0,
        }
    }

    pub fn tick(
        &mut self,
        now: DateTime<Utc>,
        answers: &BTreeMap<usize, Letter>,
        questions: &[Question],
    ) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }
        let remaining = self.remaining(now);
        if remaining > 0 {
            return TickOutcome::Running { remaining };
        }
        let score = score_answers(answers, questions);
        self.state = ExamState::Submitted {
            score,
            timed_out: true,
        };
        TickOutcome::TimeUp { score }
    }

    /// Submit the exam. Submitting again returns the first score unchanged.
    pub fn submit(&mut self, answers: &BTreeMap<usize, Letter>, questions: &[Question]) -> usize {
        if let ExamState::Submitted { score, .. } = self.state {
            return score;
        }
        let score = score_answers(answers, questions);
        self.state = ExamState::Submitted {
            score,
            timed_out: false,
        };
        score
    }
}

/// Count of recorded answers that match the question's correct letter.
#[must_use]
pub fn score_answers(answers: &BTreeMap<usize, Letter>, questions: &[Question]) -> usize {
    answers
        .iter()
        .filter(|(idx, letter)| questions.get(**idx).is_some_and(|q| q.is_correct(**letter)))
        .count()
}
