use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use exam_core::Clock;
use exam_core::model::{Question, QuestionDraft, QuestionId, QuizConfig, QuizReport};

use crate::ai::parse::extract_json_array;
use crate::error::{AiError, SourceError};
use crate::question_source::QuestionSource;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Extra attempts after a quota rejection before giving up.
const QUOTA_RETRIES: u32 = 2;
const QUOTA_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Free-text extraction clips its input to this many characters.
const MAX_SOURCE_TEXT_CHARS: usize = 15_000;

const GENERATION_TEMPERATURE: f32 = 0.8;
const EXTRACTION_TEMPERATURE: f32 = 0.1;
const COMMENTARY_TEMPERATURE: f32 = 0.4;

const ANALYSIS_FALLBACK: &str = "Great effort — keep practicing and the score will follow.";
const GREETING_FALLBACK: &str = "Wishing you continued success in your studies!";

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AiConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("EXAM_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("EXAM_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = env::var("EXAM_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

//
// ─── CLIENT ────────────────────────────────────────────────────────────────────
//

/// Chat-completions client behind question generation and commentary.
///
/// Built without a config the client is disabled: every generation call
/// fails with `AiError::Disabled`, and the commentary helpers fall back to
/// their canned lines.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    config: Option<AiConfig>,
    clock: Clock,
}

impl AiClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(AiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<AiConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
            clock: Clock::default_clock(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Generate a fresh question set for the given setup config.
    ///
    /// Quota rejections (HTTP 429) are retried twice with a short pause,
    /// matching how the upstream service sheds load.
    ///
    /// # Errors
    ///
    /// Returns `AiError` when the client is disabled, the request fails, or
    /// the reply cannot be turned into valid questions.
    pub async fn generate_questions(
        &self,
        config: &QuizConfig,
    ) -> Result<Vec<Question>, AiError> {
        let prompt = generation_prompt(config);
        let reply = self.chat_with_retry(&prompt, GENERATION_TEMPERATURE).await?;
        self.questions_from_reply(&reply)
    }

    /// Extract up to `count` questions from arbitrary pasted text.
    ///
    /// # Errors
    ///
    /// Returns `AiError` when the client is disabled, the request fails, or
    /// the reply cannot be turned into valid questions.
    pub async fn parse_questions_from_text(
        &self,
        raw: &str,
        count: usize,
    ) -> Result<Vec<Question>, AiError> {
        let clipped = clip_chars(raw, MAX_SOURCE_TEXT_CHARS);
        let prompt = format!(
            "Extract exactly {count} multiple-choice questions from the text below. \
             Each question needs exactly 4 options. Reply with a JSON array only; \
             every item carries text, options, correctAnswerIndex and explanation fields.\n\n{clipped}"
        );
        let reply = self.chat_with_retry(&prompt, EXTRACTION_TEMPERATURE).await?;
        self.questions_from_reply(&reply)
    }

    /// One short, encouraging line about a finished attempt.
    ///
    /// Never fails: any transport or parsing problem yields the canned line.
    pub async fn analyze_performance(&self, report: &QuizReport) -> String {
        let prompt = format!(
            "A student scored {}/{} on a {} quiz. \
             Write one short, encouraging sentence about the result.",
            report.score, report.total_questions, report.category
        );
        match self.chat(&prompt, COMMENTARY_TEMPERATURE).await {
            Ok(text) if !text.is_empty() => text,
            _ => ANALYSIS_FALLBACK.to_string(),
        }
    }

    /// A greeting of at most seven words for a certificate.
    ///
    /// Never fails: any transport problem yields the canned line.
    pub async fn certificate_greeting(&self, student_name: &str, category: &str) -> String {
        let prompt = format!(
            "Write a congratulation of at most 7 words for a certificate. \
             Student: {student_name}. Subject: {category}."
        );
        match self.chat(&prompt, COMMENTARY_TEMPERATURE).await {
            Ok(text) if !text.is_empty() => text,
            _ => GREETING_FALLBACK.to_string(),
        }
    }

    fn questions_from_reply(&self, reply: &str) -> Result<Vec<Question>, AiError> {
        let payload = extract_json_array(reply).ok_or(AiError::EmptyResponse)?;
        let drafts: Vec<QuestionDraft> = serde_json::from_str(payload)
            .map_err(|err| AiError::MalformedReply(err.to_string()))?;
        if drafts.is_empty() {
            return Err(AiError::EmptyResponse);
        }

        let base = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
        drafts
            .into_iter()
            .enumerate()
            .map(|(i, draft)| {
                let id = QuestionId::new(base.saturating_add(i as u64));
                draft.validate(id).map_err(AiError::from)
            })
            .collect()
    }

    async fn chat_with_retry(&self, prompt: &str, temperature: f32) -> Result<String, AiError> {
        let mut attempt = 0;
        loop {
            match self.chat(prompt, temperature).await {
                Ok(reply) => return Ok(reply),
                Err(err) if attempt < QUOTA_RETRIES && is_quota_error(&err) => {
                    attempt += 1;
                    tracing::warn!(attempt, "AI quota hit, retrying");
                    tokio::time::sleep(QUOTA_RETRY_DELAY).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn chat(&self, prompt: &str, temperature: f32) -> Result<String, AiError> {
        let config = self.config.as_ref().ok_or(AiError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature,
        };

        tracing::debug!(model = %config.model, "sending chat request");
        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AiError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AiError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl QuestionSource for AiClient {
    async fn fetch_questions(&self, config: &QuizConfig) -> Result<Vec<Question>, SourceError> {
        Ok(self.generate_questions(config).await?)
    }
}

fn is_quota_error(err: &AiError) -> bool {
    matches!(err, AiError::HttpStatus(status) if *status == StatusCode::TOO_MANY_REQUESTS)
}

fn generation_prompt(config: &QuizConfig) -> String {
    format!(
        "You are a professional exam question writer.\n\
         Subject: {category}\n\
         Topic: {category} - {topic} - {sub_topic}\n\
         Difficulty: {difficulty}\n\
         Write exactly {count} multiple-choice questions, each with exactly 4 options.\n\
         Reply with a JSON array only; every item carries text, options, \
         correctAnswerIndex and explanation fields.",
        category = config.category,
        topic = config.topic,
        sub_topic = config.sub_topic,
        difficulty = config.difficulty,
        count = config.question_count,
    )
}

fn clip_chars(raw: &str, limit: usize) -> String {
    if raw.chars().count() <= limit {
        return raw.to_string();
    }
    let mut clipped: String = raw.chars().take(limit).collect();
    clipped.push_str("...");
    clipped
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
