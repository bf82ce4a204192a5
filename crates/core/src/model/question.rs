use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Every question carries exactly this many answer options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question prompt must not be empty")]
    EmptyPrompt,

    #[error("expected exactly 4 answer options, got {got}")]
    WrongOptionCount { got: usize },

    #[error("answer option {index} is blank")]
    BlankOption { index: usize },

    #[error("correct answer index {index} is out of range")]
    CorrectIndexOutOfRange { index: u8 },
}

//
// ─── QUESTION DRAFT ────────────────────────────────────────────────────────────
//

/// Unvalidated question data as it arrives from a generator or an import.
///
/// Drafts come straight out of JSON (AI replies, stored test payloads) and
/// carry no identifier; `validate` checks the structural rules and assigns
/// the id, producing an immutable [`Question`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: u8,
    #[serde(default)]
    pub explanation: String,
}

impl QuestionDraft {
    /// Validate the draft and assign its session-unique id.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, the option list does
    /// not hold exactly four non-blank entries, or the correct-answer index
    /// falls outside the option range.
    pub fn validate(self, id: QuestionId) -> Result<Question, QuestionError> {
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount {
                got: self.options.len(),
            });
        }
        if let Some(index) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::BlankOption { index });
        }
        if usize::from(self.correct_answer_index) >= OPTION_COUNT {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: self.correct_answer_index,
            });
        }

        Ok(Question {
            id,
            text: self.text,
            options: self.options,
            correct_answer_index: self.correct_answer_index,
            explanation: self.explanation,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_answer_index: u8,
    explanation: String,
}

impl Question {
    /// Build a question directly, running the same checks as a draft.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for the structural violations listed on
    /// [`QuestionDraft::validate`].
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer_index: u8,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        QuestionDraft {
            text: text.into(),
            options,
            correct_answer_index,
            explanation: explanation.into(),
        }
        .validate(id)
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer_index(&self) -> u8 {
        self.correct_answer_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Whether selecting `option` answers this question correctly.
    #[must_use]
    pub fn is_correct(&self, option: u8) -> bool {
        option == self.correct_answer_index
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: [&str; 4]) -> Vec<String> {
        values.into_iter().map(String::from).collect()
    }

    fn draft() -> QuestionDraft {
        QuestionDraft {
            text: "What is 2 + 2?".to_string(),
            options: options(["3", "4", "5", "6"]),
            correct_answer_index: 1,
            explanation: "Basic addition.".to_string(),
        }
    }

    #[test]
    fn valid_draft_becomes_question() {
        let question = draft().validate(QuestionId::new(7)).unwrap();
        assert_eq!(question.id(), QuestionId::new(7));
        assert_eq!(question.options().len(), OPTION_COUNT);
        assert!(question.is_correct(1));
        assert!(!question.is_correct(0));
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let mut d = draft();
        d.text = "   ".to_string();
        let err = d.validate(QuestionId::new(1)).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn wrong_option_count_is_rejected() {
        let mut d = draft();
        d.options.pop();
        let err = d.validate(QuestionId::new(1)).unwrap_err();
        assert_eq!(err, QuestionError::WrongOptionCount { got: 3 });
    }

    #[test]
    fn blank_option_is_rejected() {
        let mut d = draft();
        d.options[2] = " ".to_string();
        let err = d.validate(QuestionId::new(1)).unwrap_err();
        assert_eq!(err, QuestionError::BlankOption { index: 2 });
    }

    #[test]
    fn out_of_range_correct_index_is_rejected() {
        let mut d = draft();
        d.correct_answer_index = 4;
        let err = d.validate(QuestionId::new(1)).unwrap_err();
        assert_eq!(err, QuestionError::CorrectIndexOutOfRange { index: 4 });
    }

    #[test]
    fn draft_deserializes_from_wire_field_names() {
        let json = r#"{
            "text": "Pick one",
            "options": ["a", "b", "c", "d"],
            "correctAnswerIndex": 2,
            "explanation": "because"
        }"#;
        let d: QuestionDraft = serde_json::from_str(json).unwrap();
        assert_eq!(d.correct_answer_index, 2);
    }

    #[test]
    fn missing_explanation_defaults_to_empty() {
        let json = r#"{
            "text": "Pick one",
            "options": ["a", "b", "c", "d"],
            "correctAnswerIndex": 0
        }"#;
        let d: QuestionDraft = serde_json::from_str(json).unwrap();
        assert!(d.explanation.is_empty());
        assert!(d.validate(QuestionId::new(1)).is_ok());
    }
}
