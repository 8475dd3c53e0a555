mod cards;
mod home;
mod quiz;
mod sets;
mod state;
mod years;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use cards::{LoadError, NavCard, SelectionCard};
pub use home::HomeView;
pub use quiz::QuizView;
pub use sets::{MockPapersView, SetsView};
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use years::YearsView;
