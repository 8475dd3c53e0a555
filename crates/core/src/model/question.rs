use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── LETTER ────────────────────────────────────────────────────────────────────
//

/// Multiple-choice option key.
///
/// `FromStr` is strict: only uppercase `A`–`D` parse. Ingestion code calls
/// [`Letter::normalize`] on raw sheet values first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Letter {
    A,
    B,
    C,
    D,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("not an option letter: {raw:?}")]
pub struct LetterError {
    raw: String,
}

impl Letter {
    pub const ALL: [Letter; 4] = [Letter::A, Letter::B, Letter::C, Letter::D];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Letter::A => "A",
            Letter::B => "B",
            Letter::C => "C",
            Letter::D => "D",
        }
    }

    /// Trim and uppercase a raw value before parsing. Empty or unknown
    /// values yield `None`.
    #[must_use]
    pub fn normalize(raw: &str) -> Option<Self> {
        raw.trim().to_uppercase().parse().ok()
    }
}

impl FromStr for Letter {
    type Err = LetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Letter::A),
            "B" => Ok(Letter::B),
            "C" => Ok(Letter::C),
            "D" => Ok(Letter::D),
            _ => Err(LetterError { raw: s.to_string() }),
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Letter {
    type Error = LetterError;

    // Persisted maps written by older clients may carry lowercase keys.
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Letter::normalize(&value).ok_or(LetterError { raw: value })
    }
}

impl From<Letter> for String {
    fn from(value: Letter) -> Self {
        value.as_str().to_string()
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has no text")]
    EmptyText { id: QuestionId },
}

/// Unvalidated question as it comes out of a sheet row or a JSON dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub year: u32,
    pub text: String,
    pub options: BTreeMap<Letter, String>,
    pub correct_answer: String,
    pub explanation: String,
    pub tags: Vec<String>,
}

impl QuestionDraft {
    /// Normalize the draft into an immutable question.
    ///
    /// The correct answer is trimmed and uppercased; a blank or unknown value
    /// becomes `None`, which makes every answer to the question incorrect.
    /// Tags are trimmed and empty ones dropped.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the question text is blank.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let text = self.text.trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText { id: self.id });
        }

        let tags = self
            .tags
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();

        Ok(Question {
            id: self.id,
            year: self.year,
            text,
            options: self.options,
            correct_answer: Letter::normalize(&self.correct_answer),
            explanation: self.explanation,
            tags,
        })
    }
}

/// A multiple-choice question. Immutable once loaded.
///
/// Field names on the wire match the spreadsheet columns so the same JSON
/// shape works for snapshots, bookmarks, and pinned shuffle subsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    #[serde(default, deserialize_with = "lenient::year")]
    year: u32,
    #[serde(rename = "question_text", alias = "questionText", default)]
    text: String,
    #[serde(default)]
    options: BTreeMap<Letter, String>,
    #[serde(
        rename = "correct_answer",
        alias = "correctAnswer",
        default,
        deserialize_with = "lenient::letter"
    )]
    correct_answer: Option<Letter>,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn year(&self) -> u32 {
        self.year
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &BTreeMap<Letter, String> {
        &self.options
    }

    #[must_use]
    pub fn option(&self, letter: Letter) -> Option<&str> {
        self.options.get(&letter).map(String::as_str)
    }

    #[must_use]
    pub fn has_option(&self, letter: Letter) -> bool {
        self.options.contains_key(&letter)
    }

    #[must_use]
    pub fn correct_answer(&self) -> Option<Letter> {
        self.correct_answer
    }

    /// Exact letter comparison. A question without a correct answer never
    /// matches.
    #[must_use]
    pub fn is_correct(&self, letter: Letter) -> bool {
        self.correct_answer == Some(letter)
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Case-insensitive exact tag match.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }

    /// True if any tag contains any of the given lowercase fragments.
    #[must_use]
    pub fn has_tag_containing(&self, fragments: &[String]) -> bool {
        self.tags.iter().any(|tag| {
            let tag = tag.to_lowercase();
            fragments.iter().any(|f| tag.contains(f.as_str()))
        })
    }

    /// Year label for display; year 0 marks practice-only questions.
    #[must_use]
    pub fn display_year(&self) -> String {
        if self.year == 0 {
            "Practice Question".to_string()
        } else {
            self.year.to_string()
        }
    }

    #[must_use]
    pub fn category(&self) -> &str {
        self.tags.first().map_or("General", String::as_str)
    }
}

mod lenient {
    use super::{Deserialize, Deserializer, Letter};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrText {
        Number(u64),
        Text(String),
    }

    pub(super) fn year<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<NumOrText>::deserialize(deserializer)?;
        Ok(match raw {
            Some(NumOrText::Number(n)) => u32::try_from(n).unwrap_or(0),
            Some(NumOrText::Text(s)) => s.trim().parse().unwrap_or(0),
            None => 0,
        })
    }

    pub(super) fn letter<'de, D>(deserializer: D) -> Result<Option<Letter>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Letter::normalize))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
