use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How the question list of a session was assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizMode {
    Year,
    Set,
    Shuffle,
    Bookmarks,
}

impl QuizMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuizMode::Year => "year",
            QuizMode::Set => "set",
            QuizMode::Shuffle => "shuffle",
            QuizMode::Bookmarks => "bookmarks",
        }
    }
}

/// The concrete slot a user picked from a selection screen.
///
/// Each selection owns exactly one persisted progress entry, addressed by
/// [`Selection::session_key`]. The key parses back into the selection, which
/// lets routes carry nothing but the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    /// All questions of a year, optionally narrowed by comma-separated tag
    /// fragments.
    Year { year: u32, tag: Option<String> },
    /// The n-th chunk (zero-based) of a tag's questions sorted by id.
    Set { tag: String, index: usize },
    /// A timed mock paper, identified by its `mocktestN` tag.
    Mock { paper: String },
    /// A random subset of a tag, pinned once drawn.
    Shuffle { tag: String },
    Bookmarks,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionParseError {
    #[error("unknown session key: {0:?}")]
    UnknownKey(String),
    #[error("invalid number in session key {key:?}")]
    InvalidNumber { key: String },
    #[error("session key {0:?} is missing its tag")]
    MissingTag(String),
}

const PREFIX: &str = "progress_";

impl Selection {
    #[must_use]
    pub fn mode(&self) -> QuizMode {
        match self {
            Selection::Year { .. } => QuizMode::Year,
            Selection::Set { .. } | Selection::Mock { .. } => QuizMode::Set,
            Selection::Shuffle { .. } => QuizMode::Shuffle,
            Selection::Bookmarks => QuizMode::Bookmarks,
        }
    }

    /// Mock papers run under the exam countdown; everything else is practice.
    #[must_use]
    pub fn is_timed(&self) -> bool {
        matches!(self, Selection::Mock { .. })
    }

    #[must_use]
    pub fn is_shuffle(&self) -> bool {
        matches!(self, Selection::Shuffle { .. })
    }

    #[must_use]
    pub fn session_key(&self) -> String {
        match self {
            Selection::Year { year, tag } => {
                format!("{PREFIX}year_{year}_{}", tag.as_deref().unwrap_or("null"))
            }
            Selection::Set { tag, index } => format!("{PREFIX}set_{tag}_{index}"),
            Selection::Mock { paper } => format!("{PREFIX}mock_{paper}"),
            Selection::Shuffle { tag } => format!("{PREFIX}shuffle_{tag}"),
            Selection::Bookmarks => format!("{PREFIX}bookmarks"),
        }
    }

    /// Human title for headers and cards.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Selection::Year { year, tag: None } => format!("Quiz Year {year}"),
            Selection::Year { year, tag: Some(tag) } => format!("Quiz Year {year} ({tag})"),
            Selection::Set { index, .. } => format!("Set {}", index.saturating_add(1)),
            Selection::Mock { paper } => mock_paper_title(paper),
            Selection::Shuffle { tag } => format!("Shuffle: {tag}"),
            Selection::Bookmarks => "Bookmarks".to_string(),
        }
    }
}

/// Number suffix of a `mocktestN` tag, if any.
#[must_use]
pub fn mock_paper_number(paper: &str) -> Option<u32> {
    let lower = paper.to_lowercase();
    lower.strip_prefix("mocktest")?.parse().ok()
}

#[must_use]
pub fn mock_paper_title(paper: &str) -> String {
    match mock_paper_number(paper) {
        Some(n) => format!("Mock Test {n}"),
        None => paper.to_string(),
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.session_key())
    }
}

impl FromStr for Selection {
    type Err = SelectionParseError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let unknown = || SelectionParseError::UnknownKey(key.to_string());
        let invalid = || SelectionParseError::InvalidNumber {
            key: key.to_string(),
        };
        let rest = key.strip_prefix(PREFIX).ok_or_else(unknown)?;

        if rest == "bookmarks" {
            return Ok(Selection::Bookmarks);
        }
        if let Some(rest) = rest.strip_prefix("year_") {
            let (year, tag) = rest.split_once('_').ok_or_else(unknown)?;
            let year = year.parse().map_err(|_| invalid())?;
            let tag = match tag {
                "" | "null" => None,
                other => Some(other.to_string()),
            };
            return Ok(Selection::Year { year, tag });
        }
        if let Some(rest) = rest.strip_prefix("set_") {
            // Tags may contain underscores; the index is always the last part.
            let (tag, index) = rest.rsplit_once('_').ok_or_else(unknown)?;
            if tag.is_empty() {
                return Err(SelectionParseError::MissingTag(key.to_string()));
            }
            let index = index.parse().map_err(|_| invalid())?;
            return Ok(Selection::Set {
                tag: tag.to_string(),
                index,
            });
        }
        if let Some(paper) = rest.strip_prefix("mock_") {
            if paper.is_empty() {
                return Err(SelectionParseError::MissingTag(key.to_string()));
            }
            return Ok(Selection::Mock {
                paper: paper.to_string(),
            });
        }
        if let Some(tag) = rest.strip_prefix("shuffle_") {
            if tag.is_empty() {
                return Err(SelectionParseError::MissingTag(key.to_string()));
            }
            return Ok(Selection::Shuffle {
                tag: tag.to_string(),
            });
        }
        Err(unknown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_persisted_layout() {
        let year = Selection::Year {
            year: 2023,
            tag: None,
        };
        assert_eq!(year.session_key(), "progress_year_2023_null");
        assert_eq!(
            Selection::Set {
                tag: "anatomy".into(),
                index: 2
            }
            .session_key(),
            "progress_set_anatomy_2"
        );
        assert_eq!(
            Selection::Shuffle { tag: "renal".into() }.session_key(),
            "progress_shuffle_renal"
        );
    }

    #[test]
    fn keys_parse_back() {
        let selections = [
            Selection::Year {
                year: 2021,
                tag: Some("haryana,mo".into()),
            },
            Selection::Year {
                year: 2020,
                tag: None,
            },
            Selection::Set {
                tag: "general_medicine".into(),
                index: 11,
            },
            Selection::Mock {
                paper: "mocktest3".into(),
            },
            Selection::Shuffle { tag: "pharma".into() },
            Selection::Bookmarks,
        ];
        for selection in selections {
            let parsed: Selection = selection.session_key().parse().unwrap();
            assert_eq!(parsed, selection);
        }
    }

    #[test]
    fn rejects_foreign_keys() {
        assert!(matches!(
            "settings_theme".parse::<Selection>(),
            Err(SelectionParseError::UnknownKey(_))
        ));
        assert!(matches!(
            "progress_set_anatomy_x".parse::<Selection>(),
            Err(SelectionParseError::InvalidNumber { .. })
        ));
        assert!(matches!(
            "progress_shuffle_".parse::<Selection>(),
            Err(SelectionParseError::MissingTag(_))
        ));
    }

    #[test]
    fn only_mock_papers_are_timed() {
        let mock = Selection::Mock {
            paper: "mocktest12".into(),
        };
        assert!(mock.is_timed());
        assert_eq!(mock.mode(), QuizMode::Set);
        assert_eq!(mock.title(), "Mock Test 12");
        assert!(!Selection::Bookmarks.is_timed());
    }
}
