use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::config::TestType;
use crate::model::ids::{AttemptId, QuestionId};

/// Minimum percentage counted as a passing attempt.
pub const PASSING_PERCENTAGE: usize = 70;

//
// ─── ANSWER RECORD ─────────────────────────────────────────────────────────────
//

/// Per-question outcome inside a finished attempt.
///
/// `selected_option` is `None` when the question was left unanswered; an
/// unanswered question is never correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub selected_option: Option<u8>,
    pub is_correct: bool,
}

//
// ─── QUIZ REPORT ───────────────────────────────────────────────────────────────
//

/// The one result record a session emits when it terminates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizReport {
    pub attempt_id: AttemptId,
    pub score: usize,
    pub answered_count: usize,
    pub total_questions: usize,
    #[serde(rename = "timeSpent")]
    pub time_spent_secs: u32,
    pub answers: Vec<AnswerRecord>,
    #[serde(rename = "date")]
    pub finished_at: DateTime<Utc>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sub_topic: Option<String>,
    pub test_type: TestType,
}

impl QuizReport {
    /// Score as a rounded percentage of the total.
    #[must_use]
    pub fn percentage(&self) -> usize {
        if self.total_questions == 0 {
            return 0;
        }
        (self.score * 100 + self.total_questions / 2) / self.total_questions
    }

    /// Questions answered but answered wrong.
    #[must_use]
    pub fn wrong_count(&self) -> usize {
        self.answered_count.saturating_sub(self.score)
    }

    /// Questions left blank.
    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.total_questions.saturating_sub(self.answered_count)
    }

    #[must_use]
    pub fn is_passing(&self) -> bool {
        self.percentage() >= PASSING_PERCENTAGE
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
