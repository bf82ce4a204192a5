#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod session;
pub mod time;

pub use error::Error;
pub use session::{QuizSession, SECONDS_PER_QUESTION, SessionConfigError, SessionPhase};
pub use time::Clock;
