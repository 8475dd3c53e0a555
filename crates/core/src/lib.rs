#![forbid(unsafe_code)]

pub mod error;
pub mod exam;
pub mod extract;
pub mod model;
pub mod session;
pub mod time;

pub use error::Error;
pub use time::Clock;
