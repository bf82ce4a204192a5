use chrono::{DateTime, Datelike, Utc};
use rand::Rng;

use exam_core::Clock;
use exam_core::model::QuizReport;

const SERIAL_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SERIAL_LENGTH: usize = 6;
const SERIAL_PREFIX: &str = "EX";

/// Greeting used when no AI line was produced.
pub const DEFAULT_GREETING: &str = "Wishing you continued success in your studies!";

/// A printable certificate for one finished attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub serial: String,
    pub student_name: String,
    pub category: String,
    pub percentage: usize,
    pub greeting: String,
    pub issued_at: DateTime<Utc>,
}

/// Issues certificates with verifiable serials.
#[derive(Debug, Clone)]
pub struct CertificateService {
    clock: Clock,
}

impl CertificateService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    /// Issue a certificate for a finished attempt.
    ///
    /// `greeting` is usually the AI line from
    /// [`crate::AiClient::certificate_greeting`]; pass `None` to fall back to
    /// the default.
    #[must_use]
    pub fn issue(
        &self,
        student_name: impl Into<String>,
        report: &QuizReport,
        greeting: Option<String>,
    ) -> Certificate {
        Certificate {
            serial: self.generate_serial(),
            student_name: student_name.into(),
            category: report.category.clone(),
            percentage: report.percentage(),
            greeting: greeting.unwrap_or_else(|| DEFAULT_GREETING.to_string()),
            issued_at: self.clock.now(),
        }
    }

    /// Serials look like `EX-2025-7QK2NM`: prefix, issue year, random tail.
    fn generate_serial(&self) -> String {
        let year = self.clock.now().year();
        let mut rng = rand::rng();
        let tail: String = (0..SERIAL_LENGTH)
            .map(|_| {
                let index = rng.random_range(0..SERIAL_CHARSET.len());
                SERIAL_CHARSET[index] as char
            })
            .collect();
        format!("{SERIAL_PREFIX}-{year}-{tail}")
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
