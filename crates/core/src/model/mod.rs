mod config;
mod ids;
mod question;
mod report;
mod subject;

pub use config::{
    Difficulty, MAX_QUESTION_COUNT, QuizConfig, QuizConfigError, SessionLabels, TestType,
};
pub use ids::{AttemptId, ParseIdError, QuestionId, TestId};
pub use question::{OPTION_COUNT, Question, QuestionDraft, QuestionError};
pub use report::{AnswerRecord, PASSING_PERCENTAGE, QuizReport};
pub use subject::{Subject, SubjectCatalog, SubjectSection};
