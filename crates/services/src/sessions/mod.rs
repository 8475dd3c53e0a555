mod plan;
mod runner;
mod view;

// Public API of the session subsystem.
pub use plan::{
    MOCK_TAG, MockPaperSlot, PRACTICE_SET_TAG, SET_SIZE, SHUFFLE_SIZE, SHUFFLE_TAG, SelectionPlanner,
    SetCatalog, SetSlot, ShuffleCard,
};
pub use runner::QuizRunner;
pub use view::{ExamView, NavigatorCell, OptionState, OptionView, QuestionView, SessionView};
