use std::sync::Mutex;

use async_trait::async_trait;

use exam_core::model::QuizReport;

use crate::error::SinkError;

/// How many finished reports `MemorySink` keeps around.
pub const RECENT_REPORT_LIMIT: usize = 50;

//
// ─── RESULT SINK ───────────────────────────────────────────────────────────────
//

/// Receives the one report a finished session emits.
///
/// Delivery is a transport concern: a failing sink must never cost the
/// student their computed result, so callers keep the report regardless of
/// what `submit` returns.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Deliver a finished report.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` when the report could not be accepted.
    async fn submit(&self, report: &QuizReport) -> Result<(), SinkError>;
}

//
// ─── MEMORY SINK ───────────────────────────────────────────────────────────────
//

/// In-memory sink keeping the most recent reports, newest first.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<QuizReport>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored reports, newest first.
    #[must_use]
    pub fn recent(&self) -> Vec<QuizReport> {
        self.reports.lock().map(|r| r.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.lock().map(|r| r.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn submit(&self, report: &QuizReport) -> Result<(), SinkError> {
        let mut reports = self.reports.lock().map_err(|_| SinkError::Delivery {
            reason: "report store is poisoned".to_string(),
        })?;
        reports.insert(0, report.clone());
        reports.truncate(RECENT_REPORT_LIMIT);
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
