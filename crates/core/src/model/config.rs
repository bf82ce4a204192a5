use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::TestId;

/// Upper bound on how many questions one attempt may hold.
pub const MAX_QUESTION_COUNT: usize = 50;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizConfigError {
    #[error("a subject category is required")]
    EmptyCategory,

    #[error("question count {requested} is out of range")]
    InvalidQuestionCount { requested: usize },

    #[error("official tests require a stored test id")]
    MissingTestId,
}

//
// ─── TEST TYPE & DIFFICULTY ────────────────────────────────────────────────────
//

/// Where the questions for an attempt come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestType {
    /// Questions generated on demand by the AI service.
    AiGenerated,
    /// A pre-authored test from the center's question bank.
    CenterOfficial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{label}")
    }
}

//
// ─── QUIZ CONFIG ───────────────────────────────────────────────────────────────
//

/// Everything the student picks on the setup screen before an attempt starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    pub test_type: TestType,
    pub category: String,
    pub topic: String,
    pub sub_topic: String,
    pub difficulty: Difficulty,
    pub question_count: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub center_test_id: Option<TestId>,
}

impl QuizConfig {
    /// Check the config before any questions are fetched.
    ///
    /// # Errors
    ///
    /// Returns `QuizConfigError` if the category is blank, the question count
    /// is outside `1..=MAX_QUESTION_COUNT`, or an official test is requested
    /// without a stored test id.
    pub fn validate(&self) -> Result<(), QuizConfigError> {
        if self.category.trim().is_empty() {
            return Err(QuizConfigError::EmptyCategory);
        }
        if self.question_count == 0 || self.question_count > MAX_QUESTION_COUNT {
            return Err(QuizConfigError::InvalidQuestionCount {
                requested: self.question_count,
            });
        }
        if self.test_type == TestType::CenterOfficial && self.center_test_id.is_none() {
            return Err(QuizConfigError::MissingTestId);
        }
        Ok(())
    }
}

//
// ─── SESSION LABELS ────────────────────────────────────────────────────────────
//

/// Pass-through reporting labels a session carries into its final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLabels {
    pub category: String,
    pub topic: Option<String>,
    pub sub_topic: Option<String>,
    pub test_type: TestType,
}

impl SessionLabels {
    #[must_use]
    pub fn new(category: impl Into<String>, test_type: TestType) -> Self {
        Self {
            category: category.into(),
            topic: None,
            sub_topic: None,
            test_type,
        }
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    #[must_use]
    pub fn with_sub_topic(mut self, sub_topic: impl Into<String>) -> Self {
        self.sub_topic = Some(sub_topic.into());
        self
    }

    /// Derive the labels from a setup config; blank topics are dropped.
    #[must_use]
    pub fn from_config(config: &QuizConfig) -> Self {
        Self {
            category: config.category.clone(),
            topic: non_empty(&config.topic),
            sub_topic: non_empty(&config.sub_topic),
            test_type: config.test_type,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
