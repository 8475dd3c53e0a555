mod catalog_vm;
mod markdown_vm;
mod quiz_vm;
mod time_fmt;

pub use catalog_vm::{
    SelectionCardVm, SetsScreenVm, attach_badges, load_mock_papers, load_sets, load_years,
    map_mock_papers, map_set_catalog, shuffle_card,
};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use quiz_vm::{
    NavCellVm, OptionVm, QuizIntent, QuizPhase, QuizScreenVm, ResultsVm, dispatch,
};
pub use time_fmt::format_countdown;
