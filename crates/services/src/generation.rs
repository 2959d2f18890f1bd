use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// A remote text generator. One call, one response; retries are the caller's decision.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate text for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when the generator is unavailable or returns nothing.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Trimmed value of `key`, or `default` when unset or blank.
fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl GeneratorConfig {
    /// Read `MCQ_AI_API_KEY`, `MCQ_AI_BASE_URL`, `MCQ_AI_MODEL` and `MCQ_AI_TIMEOUT_SECS`.
    ///
    /// Returns `None` when no API key is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env_or("MCQ_AI_API_KEY", "");
        if api_key.is_empty() {
            return None;
        }
        let timeout = env_or("MCQ_AI_TIMEOUT_SECS", "")
            .parse()
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        Some(Self {
            base_url: env_or("MCQ_AI_BASE_URL", DEFAULT_BASE_URL),
            api_key,
            model: env_or("MCQ_AI_MODEL", DEFAULT_MODEL),
            timeout,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Generator backed by an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatCompletionsGenerator {
    client: Client,
    config: Option<GeneratorConfig>,
}

impl ChatCompletionsGenerator {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GeneratorConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GeneratorConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl ContentGenerator for ChatCompletionsGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let config = self.config.as_ref().ok_or(GenerationError::Disabled)?;

        let payload = QuizRequest::new(&config.model, prompt);

        log::info!("requesting questions from {}", config.model);
        let response = self
            .client
            .post(config.completions_url())
            .bearer_auth(&config.api_key)
            .timeout(config.timeout)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            log::warn!("generation request failed with {}", response.status());
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body: CompletionBody = response.json().await?;
        body.into_text()
    }
}

/// Standing instruction sent ahead of every quiz prompt.
const QUIZ_WRITER_ROLE: &str = "You write multiple-choice quiz questions from study material. \
Use only facts stated in the material. Reply with the questions alone, in the exact format requested, \
without explanations or Markdown.";

const QUIZ_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Serialize)]
struct QuizRequest<'a> {
    model: &'a str,
    messages: [Turn<'a>; 2],
    temperature: f32,
}

impl<'a> QuizRequest<'a> {
    fn new(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            messages: [
                Turn {
                    role: "system",
                    content: QUIZ_WRITER_ROLE,
                },
                Turn {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: QUIZ_TEMPERATURE,
        }
    }
}

#[derive(Debug, Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionBody {
    choices: Vec<Completion>,
}

#[derive(Debug, Deserialize)]
struct Completion {
    message: CompletionMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl CompletionBody {
    /// Text of the first choice, trimmed. A reply cut off at the token limit
    /// is still returned; the parser keeps whatever questions are complete.
    fn into_text(self) -> Result<String, GenerationError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyResponse)?;
        if choice.finish_reason.as_deref() == Some("length") {
            log::warn!("generated questions were truncated at the token limit");
        }
        choice
            .message
            .content
            .map(|content| content.trim().to_owned())
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}
