use quiz_core::model::Selection;
use services::QuizRunner;
use services::sessions::{SetCatalog, SHUFFLE_TAG};

use crate::views::ViewError;

/// One clickable card on a selection screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionCardVm {
    pub key: String,
    pub title: String,
    pub subtitle: String,
    pub badge: Option<String>,
}

impl SelectionCardVm {
    fn new(selection: &Selection, title: String, subtitle: String) -> Self {
        Self {
            key: selection.session_key(),
            title,
            subtitle,
            badge: None,
        }
    }
}

/// Cards of the practice-set screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetsScreenVm {
    pub shuffle: SelectionCardVm,
    pub mock_count: usize,
    pub sets: Vec<SelectionCardVm>,
}

#[must_use]
pub fn shuffle_card(size: usize) -> SelectionCardVm {
    let selection = Selection::Shuffle {
        tag: SHUFFLE_TAG.to_string(),
    };
    SelectionCardVm::new(
        &selection,
        "Shuffle".to_string(),
        format!("{size} random questions"),
    )
}

#[must_use]
pub fn map_set_catalog(catalog: &SetCatalog) -> SetsScreenVm {
    SetsScreenVm {
        shuffle: SelectionCardVm::new(
            &catalog.shuffle.selection,
            "Shuffle".to_string(),
            format!("{} random questions", catalog.shuffle.size),
        ),
        mock_count: catalog.mock_papers.len(),
        sets: catalog
            .sets
            .iter()
            .map(|slot| SelectionCardVm::new(&slot.selection, slot.title.clone(), slot.range.clone()))
            .collect(),
    }
}

#[must_use]
pub fn map_mock_papers(catalog: &SetCatalog) -> Vec<SelectionCardVm> {
    catalog
        .mock_papers
        .iter()
        .map(|paper| {
            SelectionCardVm::new(
                &paper.selection,
                paper.title.clone(),
                format!("{} questions · timed", paper.count),
            )
        })
        .collect()
}

/// Fill in "Progress: n/m" badges from saved checkpoints.
///
/// # Errors
///
/// Returns `ViewError` if progress cannot be read.
pub async fn attach_badges(
    runner: &QuizRunner,
    cards: &mut [SelectionCardVm],
) -> Result<(), ViewError> {
    for card in cards.iter_mut() {
        let Ok(selection) = card.key.parse::<Selection>() else {
            continue;
        };
        card.badge = runner.progress_badge(&selection).await?;
    }
    Ok(())
}

/// Year cards, newest first, with badges.
///
/// # Errors
///
/// Returns `ViewError` if the question list or progress cannot be read.
pub async fn load_years(runner: &QuizRunner) -> Result<Vec<SelectionCardVm>, ViewError> {
    let years = runner.list_years().await?;
    let mut cards: Vec<SelectionCardVm> = years
        .into_iter()
        .map(|entry| {
            let selection = Selection::Year {
                year: entry.year,
                tag: None,
            };
            SelectionCardVm::new(&selection, entry.id, entry.description)
        })
        .collect();
    attach_badges(runner, &mut cards).await?;
    Ok(cards)
}

/// Practice-set screen for `tag`.
///
/// # Errors
///
/// Returns `ViewError` if the question list or progress cannot be read.
pub async fn load_sets(runner: &QuizRunner, tag: &str) -> Result<SetsScreenVm, ViewError> {
    let catalog = runner.set_catalog(tag).await?;
    let mut screen = map_set_catalog(&catalog);
    attach_badges(runner, std::slice::from_mut(&mut screen.shuffle)).await?;
    attach_badges(runner, &mut screen.sets).await?;
    Ok(screen)
}

/// Mock paper cards for `tag`.
///
/// # Errors
///
/// Returns `ViewError` if the question list or progress cannot be read.
pub async fn load_mock_papers(
    runner: &QuizRunner,
    tag: &str,
) -> Result<Vec<SelectionCardVm>, ViewError> {
    let catalog = runner.set_catalog(tag).await?;
    let mut cards = map_mock_papers(&catalog);
    attach_badges(runner, &mut cards).await?;
    Ok(cards)
}
