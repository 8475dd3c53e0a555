use rand::rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

use quiz_core::model::{Question, Selection, mock_paper_number, mock_paper_title};

use crate::question_source::QuestionFilter;

pub const SET_SIZE: usize = 50;
pub const SHUFFLE_SIZE: usize = 50;
/// Tag of the structured practice sets.
pub const PRACTICE_SET_TAG: &str = "practiseset";
/// Marks practice-set questions that belong to a mock paper.
pub const MOCK_TAG: &str = "mocktest";
/// Tag the shuffle card draws from.
pub const SHUFFLE_TAG: &str = "haryanamo";

/// Turns a selection plus the matching source questions into the ordered
/// list a session runs on.
#[derive(Debug, Clone, Copy)]
pub struct SelectionPlanner {
    set_size: usize,
    shuffle_size: usize,
}

impl Default for SelectionPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionPlanner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            set_size: SET_SIZE,
            shuffle_size: SHUFFLE_SIZE,
        }
    }

    #[must_use]
    pub fn with_set_size(mut self, size: usize) -> Self {
        self.set_size = size.max(1);
        self
    }

    #[must_use]
    pub fn with_shuffle_size(mut self, size: usize) -> Self {
        self.shuffle_size = size.max(1);
        self
    }

    /// Filter to request from the question source. Bookmarks come from
    /// storage instead, so they have none.
    #[must_use]
    pub fn source_filter(selection: &Selection) -> Option<QuestionFilter> {
        match selection {
            Selection::Year { year, tag } => Some(QuestionFilter::Year {
                year: *year,
                tags: tag.clone(),
            }),
            Selection::Set { tag, .. } | Selection::Shuffle { tag } => {
                Some(QuestionFilter::Tag(tag.clone()))
            }
            Selection::Mock { .. } => Some(QuestionFilter::Tag(PRACTICE_SET_TAG.into())),
            Selection::Bookmarks => None,
        }
    }

    /// Order and cut `questions` for the selection.
    ///
    /// - years, sets and mock papers are sorted by id;
    /// - a set is one `set_size` chunk of the non-mock questions;
    /// - a shuffle is a random draw of up to `shuffle_size` questions;
    /// - bookmarks keep the order they were given in.
    #[must_use]
    pub fn build(&self, selection: &Selection, questions: Vec<Question>) -> Vec<Question> {
        match selection {
            Selection::Year { .. } => sorted_by_id(questions),
            Selection::Set { tag, index } => sorted_by_id(set_pool(tag, questions))
                .into_iter()
                .skip(index.saturating_mul(self.set_size))
                .take(self.set_size)
                .collect(),
            Selection::Mock { paper } => sorted_by_id(
                questions
                    .into_iter()
                    .filter(|q| q.has_tag(MOCK_TAG) && q.has_tag(paper))
                    .collect(),
            ),
            Selection::Shuffle { .. } => self.draw(questions),
            Selection::Bookmarks => questions,
        }
    }

    /// A fresh order for a restart. Only shuffles are redrawn.
    #[must_use]
    pub fn reshuffle(&self, selection: &Selection, questions: Vec<Question>) -> Option<Vec<Question>> {
        selection.is_shuffle().then(|| self.draw(questions))
    }

    fn draw(&self, mut questions: Vec<Question>) -> Vec<Question> {
        let mut rng = rng();
        questions.as_mut_slice().shuffle(&mut rng);
        questions.truncate(self.shuffle_size);
        questions
    }

    /// Cards of the set picker for `tag`, built from the questions carrying
    /// that tag.
    #[must_use]
    pub fn catalog(&self, tag: &str, questions: &[Question]) -> SetCatalog {
        let pool = set_pool(tag, questions.to_vec());
        let total = pool.len();
        let sets = (0..total.div_ceil(self.set_size))
            .map(|index| {
                let first = index * self.set_size + 1;
                let last = ((index + 1) * self.set_size).min(total);
                SetSlot {
                    selection: Selection::Set {
                        tag: tag.to_string(),
                        index,
                    },
                    title: format!("Set {}", index + 1),
                    range: format!("Questions {first} - {last}"),
                }
            })
            .collect();

        let mock_papers = if tag.eq_ignore_ascii_case(PRACTICE_SET_TAG) {
            mock_papers(questions)
        } else {
            Vec::new()
        };

        SetCatalog {
            shuffle: ShuffleCard {
                selection: Selection::Shuffle {
                    tag: SHUFFLE_TAG.into(),
                },
                size: self.shuffle_size,
            },
            mock_papers,
            sets,
        }
    }
}

fn sorted_by_id(mut questions: Vec<Question>) -> Vec<Question> {
    questions.sort_by_key(Question::id);
    questions
}

/// Practice sets leave out mock paper questions.
fn set_pool(tag: &str, questions: Vec<Question>) -> Vec<Question> {
    if tag.eq_ignore_ascii_case(PRACTICE_SET_TAG) {
        questions.into_iter().filter(|q| !q.has_tag(MOCK_TAG)).collect()
    } else {
        questions
    }
}

fn paper_tag(question: &Question) -> Option<String> {
    question
        .tags()
        .iter()
        .map(|t| t.to_lowercase())
        .find(|t| t.starts_with(MOCK_TAG) && t != MOCK_TAG)
}

fn mock_papers(questions: &[Question]) -> Vec<MockPaperSlot> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for question in questions.iter().filter(|q| q.has_tag(MOCK_TAG)) {
        if let Some(paper) = paper_tag(question) {
            *counts.entry(paper).or_default() += 1;
        }
    }

    let mut papers: Vec<MockPaperSlot> = counts
        .into_iter()
        .map(|(paper, count)| MockPaperSlot {
            title: mock_paper_title(&paper),
            selection: Selection::Mock { paper },
            count,
        })
        .collect();
    papers.sort_by_key(|slot| match &slot.selection {
        Selection::Mock { paper } => mock_paper_number(paper).unwrap_or(0),
        _ => 0,
    });
    papers
}

/// The set picker: the shuffle card first, then mock papers, then sets.
#[derive(Debug, Clone, PartialEq)]
pub struct SetCatalog {
    pub shuffle: ShuffleCard,
    pub mock_papers: Vec<MockPaperSlot>,
    pub sets: Vec<SetSlot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShuffleCard {
    pub selection: Selection,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockPaperSlot {
    pub selection: Selection,
    pub title: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetSlot {
    pub selection: Selection,
    pub title: String,
    pub range: String,
}
