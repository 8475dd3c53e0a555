#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod convert;
pub mod error;
pub mod progress_store;
pub mod question_source;
pub mod remote;
pub mod sessions;
pub mod sheet;

#[cfg(test)]
pub(crate) mod test_support;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use config::{QuizConfig, RemoteConfig, SheetConfig};
pub use convert::{ConvertReport, convert_file, dump_to_csv};
pub use error::{AppServicesError, ConvertError, QuizError, RemoteError, SourceError};
pub use progress_store::ProgressStore;
pub use question_source::{
    QuestionFilter, QuestionSource, SheetQuestionSource, StaticQuestionSource, YearEntry,
};
pub use remote::HttpProgressMirror;
pub use sessions::{QuizRunner, SelectionPlanner, SessionView};
