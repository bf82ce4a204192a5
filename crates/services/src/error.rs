//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{QuestionError, QuizConfigError, TestId};
use exam_core::session::SessionConfigError;

/// Errors emitted by `AiClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiError {
    #[error("the AI question service is not configured")]
    Disabled,
    #[error("the AI service returned an empty response")]
    EmptyResponse,
    #[error("AI service request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("the AI reply did not contain a usable question list: {0}")]
    MalformedReply(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// Errors emitted by question sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("no stored test with id {0}")]
    TestNotFound(TestId),
    #[error("the quiz config does not reference a stored test")]
    MissingTestId,
    #[error("no questions available for this test")]
    NoQuestions,
    #[error(transparent)]
    Ai(#[from] AiError),
}

/// Errors emitted by result sinks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SinkError {
    #[error("result delivery failed: {reason}")]
    Delivery { reason: String },
}

/// Errors emitted by `SessionFlowService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlowError {
    #[error(transparent)]
    Config(#[from] QuizConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Session(#[from] SessionConfigError),
}
