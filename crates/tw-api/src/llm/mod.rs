//! Generative text completion.
//!
//! Pipelines talk to the model through [`TextCompletion`], so tests can
//! swap in deterministic fakes. Every failure is a typed
//! [`CompletionError`]; callers fall back to fixed text on any of them.

pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

pub use openai::OpenAiCompatClient;

/// One completion call: a system directive, the user-facing prompt, and
/// optional retrieved context.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub context: Option<String>,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Why a completion produced no text.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("text generation is disabled (no API key configured)")]
    Disabled,

    #[error("request failed: {0}")]
    Http(String),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("provider returned no text")]
    EmptyResponse,

    #[error("invalid response body: {0}")]
    Decode(String),
}

pub type CompletionResult<T> = Result<T, CompletionError>;

/// A text-completion service.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<String>;

    /// Provider name (for logging).
    fn provider_name(&self) -> &str;
}

/// Completion used when no API key is configured. Always fails, so the
/// pipelines answer with their deterministic fallbacks.
pub struct DisabledCompletion;

#[async_trait]
impl TextCompletion for DisabledCompletion {
    async fn complete(&self, _request: &CompletionRequest) -> CompletionResult<String> {
        Err(CompletionError::Disabled)
    }

    fn provider_name(&self) -> &str {
        "disabled"
    }
}

/// Settings for the OpenAI-compatible chat completions endpoint (Groq by default).
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// API base URL; `/chat/completions` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Bearer token. None disables generation.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_model() -> String {
    "llama3-8b-8192".into()
}
fn default_timeout_secs() -> u64 {
    20
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Build the completion client for `config`, or [`DisabledCompletion`]
/// when no key is set.
pub fn create_completion(config: &LlmConfig) -> CompletionResult<Arc<dyn TextCompletion>> {
    match &config.api_key {
        Some(_) => Ok(Arc::new(OpenAiCompatClient::new(config.clone())?)),
        None => {
            tracing::warn!("no LLM API key configured, generative answers disabled");
            Ok(Arc::new(DisabledCompletion))
        }
    }
}
