use std::sync::{Arc, Mutex};
use std::time::Duration;

use exam_core::Clock;
use exam_core::model::{QuizConfig, QuizReport, SessionLabels, TestType};
use exam_core::session::QuizSession;

use crate::error::{FlowError, SourceError};
use crate::question_source::QuestionSource;
use crate::result_sink::ResultSink;

/// Cadence of the session countdown.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A finished attempt together with its delivery status.
///
/// `delivered` is false when the sink rejected the report; the report itself
/// is always present — delivery problems never lose a computed result.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedAttempt {
    pub report: QuizReport,
    pub delivered: bool,
}

//
// ─── SESSION FLOW ──────────────────────────────────────────────────────────────
//

/// Orchestrates one attempt: config → questions → engine → result sink.
#[derive(Clone)]
pub struct SessionFlowService {
    clock: Clock,
    ai_source: Arc<dyn QuestionSource>,
    stored_source: Arc<dyn QuestionSource>,
    sink: Arc<dyn ResultSink>,
}

impl SessionFlowService {
    #[must_use]
    pub fn new(
        clock: Clock,
        ai_source: Arc<dyn QuestionSource>,
        stored_source: Arc<dyn QuestionSource>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            clock,
            ai_source,
            stored_source,
            sink,
        }
    }

    /// Fetch questions for the config and start a session over them.
    ///
    /// # Errors
    ///
    /// Returns `FlowError` when the config is invalid, the source cannot
    /// supply questions, or the session rejects its input.
    pub async fn start_session(&self, config: &QuizConfig) -> Result<QuizSession, FlowError> {
        config.validate()?;

        let source = match config.test_type {
            TestType::AiGenerated => &self.ai_source,
            TestType::CenterOfficial => &self.stored_source,
        };
        let questions = source.fetch_questions(config).await?;
        if questions.is_empty() {
            return Err(SourceError::NoQuestions.into());
        }

        let session = QuizSession::new(questions, SessionLabels::from_config(config), self.clock)?;
        Ok(session)
    }

    /// Terminate the session (idempotent) and hand its report to the sink.
    pub async fn finish_and_submit(&self, session: &mut QuizSession) -> CompletedAttempt {
        let report = session.force_finish().clone();
        self.submit_report(report).await
    }

    /// Deliver a finished report to the result sink.
    ///
    /// The sink accepting or rejecting the report is recorded in
    /// `delivered`; the report comes back to the caller either way.
    pub async fn submit_report(&self, report: QuizReport) -> CompletedAttempt {
        let delivered = match self.sink.submit(&report).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "result delivery failed, keeping report in memory");
                false
            }
        };
        CompletedAttempt { report, delivered }
    }
}

//
// ─── COUNTDOWN DRIVER ──────────────────────────────────────────────────────────
//

/// Drive the 1 Hz countdown of a shared session until it terminates.
///
/// The loop is the session's only autonomous event source. It stops — and
/// never resumes — the moment the session reports finished, whether the
/// timeout path inside `tick` fired or some other caller finished the
/// attempt between ticks.
pub async fn drive_countdown(session: Arc<Mutex<QuizSession>>) {
    let mut ticker = tokio::time::interval(TICK_PERIOD);
    ticker.tick().await; // the first tick completes immediately
    loop {
        ticker.tick().await;
        let Ok(mut locked) = session.lock() else {
            return;
        };
        if locked.is_finished() {
            return;
        }
        locked.tick();
        if locked.is_finished() {
            return;
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
