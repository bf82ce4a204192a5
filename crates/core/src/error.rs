use thiserror::Error;

use crate::model::{QuestionError, QuizConfigError};
use crate::session::SessionConfigError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Config(#[from] QuizConfigError),
    #[error(transparent)]
    Session(#[from] SessionConfigError),
}
