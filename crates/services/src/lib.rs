#![forbid(unsafe_code)]

pub mod ai;
pub mod certificate;
pub mod error;
pub mod question_source;
pub mod result_sink;
pub mod session_flow;

pub use exam_core::Clock;

pub use ai::{AiClient, AiConfig};
pub use certificate::{Certificate, CertificateService};
pub use error::{AiError, FlowError, SinkError, SourceError};
pub use question_source::{CenterTest, QuestionSource, StoredTestSource};
pub use result_sink::{MemorySink, RECENT_REPORT_LIMIT, ResultSink};
pub use session_flow::{CompletedAttempt, SessionFlowService, drive_countdown};
