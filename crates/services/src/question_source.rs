use async_trait::async_trait;
use chrono::{DateTime, Utc};

use exam_core::model::{Difficulty, Question, QuizConfig, TestId};

use crate::error::SourceError;

//
// ─── QUESTION SOURCE ───────────────────────────────────────────────────────────
//

/// Supplies the ordered question list an attempt runs over.
///
/// Implementations own how questions come to exist (a stored bank, an AI
/// generator); the session engine only ever sees the finished list.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the questions for the given setup config.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the config cannot be satisfied.
    async fn fetch_questions(&self, config: &QuizConfig) -> Result<Vec<Question>, SourceError>;
}

//
// ─── CENTER TESTS ──────────────────────────────────────────────────────────────
//

/// A pre-authored test from the center's question bank.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterTest {
    pub id: TestId,
    pub title: String,
    pub category: String,
    pub topic: String,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
    pub difficulty: Difficulty,
}

/// In-memory bank of center tests, looked up by id.
#[derive(Debug, Default)]
pub struct StoredTestSource {
    tests: Vec<CenterTest>,
}

impl StoredTestSource {
    #[must_use]
    pub fn new(tests: Vec<CenterTest>) -> Self {
        Self { tests }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    #[must_use]
    pub fn find(&self, id: TestId) -> Option<&CenterTest> {
        self.tests.iter().find(|t| t.id == id)
    }
}

#[async_trait]
impl QuestionSource for StoredTestSource {
    async fn fetch_questions(&self, config: &QuizConfig) -> Result<Vec<Question>, SourceError> {
        let id = config.center_test_id.ok_or(SourceError::MissingTestId)?;
        let test = self.find(id).ok_or(SourceError::TestNotFound(id))?;
        if test.questions.is_empty() {
            return Err(SourceError::NoQuestions);
        }
        Ok(test.questions.clone())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{QuestionId, TestType};
    use exam_core::time::fixed_now;

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("question {id}"),
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            0,
            "",
        )
        .unwrap()
    }

    fn bank() -> (TestId, StoredTestSource) {
        let id = TestId::generate();
        let test = CenterTest {
            id,
            title: "Midterm".to_string(),
            category: "Physics".to_string(),
            topic: "Mechanics".to_string(),
            questions: vec![question(1), question(2)],
            created_at: fixed_now(),
            difficulty: Difficulty::Hard,
        };
        (id, StoredTestSource::new(vec![test]))
    }

    fn config_for(id: Option<TestId>) -> QuizConfig {
        QuizConfig {
            test_type: TestType::CenterOfficial,
            category: "Physics".to_string(),
            topic: "Mechanics".to_string(),
            sub_topic: String::new(),
            difficulty: Difficulty::Hard,
            question_count: 2,
            center_test_id: id,
        }
    }

    #[tokio::test]
    async fn finds_stored_test_by_id() {
        let (id, source) = bank();
        let questions = source.fetch_questions(&config_for(Some(id))).await.unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[tokio::test]
    async fn unknown_test_id_is_an_error() {
        let (_, source) = bank();
        let missing = TestId::generate();
        let err = source
            .fetch_questions(&config_for(Some(missing)))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::TestNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn config_without_test_id_is_an_error() {
        let (_, source) = bank();
        let err = source.fetch_questions(&config_for(None)).await.unwrap_err();
        assert!(matches!(err, SourceError::MissingTestId));
    }

    #[tokio::test]
    async fn empty_test_surfaces_no_questions() {
        let id = TestId::generate();
        let source = StoredTestSource::new(vec![CenterTest {
            id,
            title: "Empty".to_string(),
            category: "Physics".to_string(),
            topic: "Mechanics".to_string(),
            questions: Vec::new(),
            created_at: fixed_now(),
            difficulty: Difficulty::Easy,
        }]);
        let err = source.fetch_questions(&config_for(Some(id))).await.unwrap_err();
        assert!(matches!(err, SourceError::NoQuestions));
    }
}
