use serde::{Deserialize, Serialize};

use crate::model::question::Question;

/// Checkpoint of a session, persisted under its session key.
///
/// `index` is the position of the most recently answered question. Shuffle
/// sessions also pin the drawn subset in `questions` so a resume replays the
/// same list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub index: usize,
    pub score: usize,
    pub total: usize,
    #[serde(default)]
    pub questions: Option<Vec<Question>>,
}

impl Progress {
    #[must_use]
    pub fn new(index: usize, score: usize, total: usize) -> Self {
        Self {
            index,
            score,
            total,
            questions: None,
        }
    }

    #[must_use]
    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = Some(questions);
        self
    }

    /// A checkpoint is worth offering for resume only if at least one
    /// question is left after it.
    #[must_use]
    pub fn is_resumable(&self) -> bool {
        self.index < self.total.saturating_sub(1)
    }

    /// Label for selection cards, e.g. `Progress: 4/50`.
    #[must_use]
    pub fn badge(&self) -> String {
        format!("Progress: {}/{}", self.index.saturating_add(1), self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressSource {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub progress: Progress,
    pub source: ProgressSource,
}

impl Reconciled {
    /// The remote copy won and must be written back locally.
    #[must_use]
    pub fn needs_local_write(&self) -> bool {
        self.source == ProgressSource::Remote
    }
}

/// Pick the checkpoint to resume from.
///
/// The remote copy wins only when its index is strictly ahead of the local
/// one; ties keep local.
#[must_use]
pub fn reconcile(local: Option<Progress>, remote: Option<Progress>) -> Option<Reconciled> {
    match (local, remote) {
        (None, None) => None,
        (Some(progress), None) => Some(Reconciled {
            progress,
            source: ProgressSource::Local,
        }),
        (None, Some(progress)) => Some(Reconciled {
            progress,
            source: ProgressSource::Remote,
        }),
        (Some(local), Some(remote)) => {
            if remote.index > local.index {
                Some(Reconciled {
                    progress: remote,
                    source: ProgressSource::Remote,
                })
            } else {
                Some(Reconciled {
                    progress: local,
                    source: ProgressSource::Local,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_ahead_wins() {
        let merged = reconcile(Some(Progress::new(3, 2, 10)), Some(Progress::new(7, 5, 10))).unwrap();
        assert_eq!(merged.progress.index, 7);
        assert!(merged.needs_local_write());
    }

    #[test]
    fn tie_keeps_local() {
        let merged = reconcile(Some(Progress::new(4, 1, 10)), Some(Progress::new(4, 4, 10))).unwrap();
        assert_eq!(merged.source, ProgressSource::Local);
        assert_eq!(merged.progress.score, 1);
    }

    #[test]
    fn remote_behind_is_ignored() {
        let merged = reconcile(Some(Progress::new(8, 6, 10)), Some(Progress::new(2, 2, 10))).unwrap();
        assert_eq!(merged.progress.index, 8);
        assert!(!merged.needs_local_write());
    }

    #[test]
    fn remote_only_is_adopted() {
        let merged = reconcile(None, Some(Progress::new(1, 1, 5))).unwrap();
        assert_eq!(merged.source, ProgressSource::Remote);
        assert!(reconcile(None, None).is_none());
    }

    #[test]
    fn resumable_needs_a_question_left() {
        assert!(Progress::new(3, 1, 5).is_resumable());
        assert!(!Progress::new(4, 1, 5).is_resumable());
        assert_eq!(Progress::new(3, 1, 5).badge(), "Progress: 4/5");
    }

    #[test]
    fn huge_index_does_not_overflow() {
        let progress = Progress::new(usize::MAX, 0, 3);
        assert!(!progress.is_resumable());
        assert_eq!(progress.badge(), format!("Progress: {}/3", usize::MAX));
        assert!(!Progress::new(0, 0, 0).is_resumable());
    }

    #[test]
    fn parses_payload_without_questions() {
        let p: Progress = serde_json::from_str(r#"{"index":2,"score":1,"total":9,"questions":null}"#).unwrap();
        assert_eq!(p, Progress::new(2, 1, 9));
        let p: Progress = serde_json::from_str(r#"{"index":2,"score":1,"total":9}"#).unwrap();
        assert!(p.questions.is_none());
    }
}
