use log::{debug, info};
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use quiz_core::exam::TickOutcome;
use quiz_core::model::{Letter, Question, Selection};
use quiz_core::session::{AdvanceOutcome, AnswerOutcome, QuizSession, SessionState, StartOutcome};
use storage::repository::BookmarkRepository;

use super::plan::{SelectionPlanner, SetCatalog};
use super::view::SessionView;
use crate::Clock;
use crate::error::QuizError;
use crate::progress_store::ProgressStore;
use crate::question_source::{QuestionFilter, QuestionSource, YearEntry};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Owns the active quiz session and performs its IO.
///
/// Transitions run under one async mutex, so callbacks from the UI are
/// applied in order. Every change bumps a `watch` counter the rendering
/// layer subscribes to.
pub struct QuizRunner {
    session: Arc<Mutex<QuizSession>>,
    changes: Arc<watch::Sender<u64>>,
    source: Arc<dyn QuestionSource>,
    progress: ProgressStore,
    bookmarks: Arc<dyn BookmarkRepository>,
    planner: SelectionPlanner,
    clock: Clock,
    tick_interval: Duration,
    ticker: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl QuizRunner {
    #[must_use]
    pub fn new(
        source: Arc<dyn QuestionSource>,
        progress: ProgressStore,
        bookmarks: Arc<dyn BookmarkRepository>,
        clock: Clock,
    ) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            session: Arc::new(Mutex::new(QuizSession::new())),
            changes: Arc::new(changes),
            source,
            progress,
            bookmarks,
            planner: SelectionPlanner::new(),
            clock,
            tick_interval: TICK_INTERVAL,
            ticker: std::sync::Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_exam_duration(mut self, duration: chrono::Duration) -> Self {
        self.session = Arc::new(Mutex::new(
            QuizSession::new().with_exam_duration(duration),
        ));
        self
    }

    #[must_use]
    pub fn with_planner(mut self, planner: SelectionPlanner) -> Self {
        self.planner = planner;
        self
    }

    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Change counter; a new value means the view should be rebuilt.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Snapshot of the session for rendering.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` if the bookmark lookup fails.
    pub async fn view(&self) -> Result<SessionView, QuizError> {
        let session = self.session.lock().await;
        let bookmarked = match session.current_question() {
            Some(question) => self.bookmarks.is_bookmarked(question.id()).await?,
            None => false,
        };
        Ok(SessionView::build(&session, bookmarked, self.clock.now()))
    }

    //
    // ─── SESSION LIFECYCLE ─────────────────────────────────────────────────────
    //

    /// Load the questions for `selection` and start it, or offer a resume.
    ///
    /// A select that resolves after a newer one replaces it. Selecting the
    /// exam that is already running or under review keeps it as it is.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session(EmptySet)` when nothing matches; the
    /// session is back to idle. Source and storage failures pass through.
    pub async fn select(&self, selection: Selection) -> Result<StartOutcome, QuizError> {
        if self.rejoin(&selection).await {
            debug!("rejoined exam {}", selection.session_key());
            return Ok(StartOutcome::Started {
                discarded_stale: false,
            });
        }
        self.stop_ticker();

        let questions = match SelectionPlanner::source_filter(&selection) {
            Some(filter) => self.source.fetch_questions(&filter).await?,
            None => self.bookmarks.list_bookmarks().await?,
        };
        let planned = self.planner.build(&selection, questions);
        let key = selection.session_key();
        let saved = self.progress.load(&key).await?;

        let mut session = self.session.lock().await;
        session.select_mode(selection);
        let started = session.start(planned, saved, self.clock.now());
        self.notify();
        let outcome = started?;

        match &outcome {
            StartOutcome::Started { discarded_stale } => {
                if *discarded_stale {
                    debug!("saved progress for {key} no longer matches the question list");
                }
                self.ensure_ticker(&session);
            }
            StartOutcome::ResumeOffered { progress } => {
                debug!("offering resume for {key} at {}", progress.badge());
            }
        }
        Ok(outcome)
    }

    /// Accept the resume offer.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` if no resume is pending.
    pub async fn resume(&self) -> Result<(), QuizError> {
        let mut session = self.session.lock().await;
        session.resume(self.clock.now())?;
        self.ensure_ticker(&session);
        self.notify();
        Ok(())
    }

    /// Decline the resume offer: the checkpoint is cleared and a shuffle is
    /// redrawn from its current questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` if no resume is pending.
    pub async fn restart(&self) -> Result<(), QuizError> {
        let mut session = self.session.lock().await;
        let selection = session.selection().cloned().ok_or(QuizError::NoActiveQuiz)?;
        let reordered = self
            .planner
            .reshuffle(&selection, session.questions().to_vec());
        session.restart(reordered, self.clock.now())?;
        self.progress.clear(&selection.session_key()).await?;
        self.ensure_ticker(&session);
        self.notify();
        Ok(())
    }

    /// Start the current selection over and forget its checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` before a quiz has started.
    pub async fn reset(&self) -> Result<(), QuizError> {
        self.stop_ticker();
        let mut session = self.session.lock().await;
        let selection = session.selection().cloned().ok_or(QuizError::NoActiveQuiz)?;
        let reordered = self
            .planner
            .reshuffle(&selection, session.questions().to_vec());
        session.reset(reordered, self.clock.now())?;
        self.progress.clear(&selection.session_key()).await?;
        self.ensure_ticker(&session);
        self.notify();
        Ok(())
    }

    //
    // ─── ANSWERING & NAVIGATION ────────────────────────────────────────────────
    //

    /// Answer the current question. Practice answers are checkpointed.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` for answers the session rejects and
    /// `QuizError::Storage` if the local checkpoint write fails.
    pub async fn answer(&self, index: usize, letter: Letter) -> Result<AnswerOutcome, QuizError> {
        let mut session = self.session.lock().await;
        let result = session.answer(index, letter, self.clock.now());
        self.notify();
        let outcome = result?;

        if let AnswerOutcome::Practice { checkpoint, .. } = &outcome {
            let key = session.session_key().ok_or(QuizError::NoActiveQuiz)?;
            // Mirror task runs detached.
            let _mirror = self.progress.save(&key, checkpoint).await?;
        }
        Ok(outcome)
    }

    /// Next question, or the results once past the last one. Completing
    /// clears the checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` when no quiz is running.
    pub async fn advance(&self) -> Result<AdvanceOutcome, QuizError> {
        let mut session = self.session.lock().await;
        let outcome = session.advance(self.clock.now())?;
        if let AdvanceOutcome::Completed { summary } = &outcome {
            self.stop_ticker();
            if let Some(key) = session.session_key() {
                self.progress.clear(&key).await?;
            }
            info!(
                "quiz completed: {}/{} ({}%)",
                summary.score(),
                summary.total(),
                summary.percentage()
            );
        }
        self.notify();
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns `QuizError::Session` while an exam is running.
    pub async fn go_back(&self) -> Result<usize, QuizError> {
        let index = self.session.lock().await.go_back()?;
        self.notify();
        Ok(index)
    }

    /// Navigator jump.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` outside exam mode or for a bad index.
    pub async fn jump_to(&self, index: usize) -> Result<(), QuizError> {
        self.session.lock().await.jump_to(index)?;
        self.notify();
        Ok(())
    }

    /// Submit the running exam and switch to review.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` outside exam mode.
    pub async fn submit(&self) -> Result<usize, QuizError> {
        let score = self.session.lock().await.submit()?;
        self.stop_ticker();
        self.notify();
        Ok(score)
    }

    /// One countdown step at the current clock time.
    pub async fn tick(&self) -> TickOutcome {
        let outcome = self.session.lock().await.tick(self.clock.now());
        if !matches!(outcome, TickOutcome::Idle) {
            self.notify();
        }
        outcome
    }

    //
    // ─── BOOKMARKS ─────────────────────────────────────────────────────────────
    //

    /// Bookmark the current question, or remove its bookmark. Returns the
    /// new state.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveQuiz` without a current question.
    pub async fn toggle_bookmark(&self) -> Result<bool, QuizError> {
        let session = self.session.lock().await;
        let question = session.current_question().ok_or(QuizError::NoActiveQuiz)?;
        let bookmarked = if self.bookmarks.is_bookmarked(question.id()).await? {
            self.bookmarks.remove_bookmark(question.id()).await?;
            false
        } else {
            self.bookmarks.add_bookmark(question, self.clock.now()).await?;
            true
        };
        self.notify();
        Ok(bookmarked)
    }

    /// # Errors
    ///
    /// Returns `QuizError::Storage` on repository failures.
    pub async fn bookmarks(&self) -> Result<Vec<Question>, QuizError> {
        Ok(self.bookmarks.list_bookmarks().await?)
    }

    //
    // ─── CATALOG ───────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `QuizError::Source` if no questions can be loaded.
    pub async fn list_years(&self) -> Result<Vec<YearEntry>, QuizError> {
        Ok(self.source.list_years().await?)
    }

    /// Set picker for `tag`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Source` if no questions can be loaded.
    pub async fn set_catalog(&self, tag: &str) -> Result<SetCatalog, QuizError> {
        let questions = self
            .source
            .fetch_questions(&QuestionFilter::Tag(tag.to_string()))
            .await?;
        Ok(self.planner.catalog(tag, &questions))
    }

    /// Force a sheet reload. Returns the number of questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Source` if the reload and every fallback fail.
    pub async fn refresh(&self) -> Result<usize, QuizError> {
        Ok(self.source.refresh().await?.len())
    }

    /// "Progress: n/m" for a selection card, if a checkpoint exists.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` on repository failures.
    pub async fn progress_badge(&self, selection: &Selection) -> Result<Option<String>, QuizError> {
        let saved = self.progress.load_local(&selection.session_key()).await?;
        Ok(saved.map(|progress| progress.badge()))
    }

    /// Drop every local checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Storage` on repository failures.
    pub async fn reset_all_progress(&self) -> Result<u64, QuizError> {
        let removed = self.progress.clear_all().await?;
        info!("cleared {removed} saved progress entries");
        self.notify();
        Ok(removed)
    }

    //
    // ─── HELPERS ───────────────────────────────────────────────────────────────
    //

    async fn rejoin(&self, selection: &Selection) -> bool {
        let mut session = self.session.lock().await;
        let active = matches!(
            session.state(),
            SessionState::InProgress | SessionState::Completed
        );
        if !active || session.exam().is_none() || session.selection() != Some(selection) {
            return false;
        }
        session.tick(self.clock.now());
        if session.is_exam_running() && !self.is_ticking() {
            self.start_ticker();
        }
        self.notify();
        true
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version = version.wrapping_add(1));
    }

    fn ensure_ticker(&self, session: &QuizSession) {
        if session.is_exam_running() {
            self.start_ticker();
        }
    }

    fn start_ticker(&self) {
        let session = Arc::clone(&self.session);
        let changes = Arc::clone(&self.changes);
        let clock = self.clock;
        let period = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                let outcome = session.lock().await.tick(clock.now());
                changes.send_modify(|version| *version = version.wrapping_add(1));
                match outcome {
                    TickOutcome::Running { .. } => {}
                    TickOutcome::TimeUp { score } => {
                        info!("exam time is up; score {score}");
                        break;
                    }
                    TickOutcome::Idle => break,
                }
            }
        });

        let mut slot = self.ticker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    fn stop_ticker(&self) {
        let mut slot = self.ticker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }

    /// True while a countdown task is alive.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for QuizRunner {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
