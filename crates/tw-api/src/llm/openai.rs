//! OpenAI-compatible chat completions client (Groq, OpenAI, local gateways).
//!
//! Single attempt per call, bounded by `timeout_secs`. No retries; callers
//! substitute fallback text on error.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CompletionError, CompletionRequest, CompletionResult, LlmConfig, TextCompletion};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body (only the fields we read).
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for `POST {base_url}/chat/completions`.
pub struct OpenAiCompatClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiCompatClient {
    pub fn new(config: LlmConfig) -> CompletionResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CompletionError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn user_content(request: &CompletionRequest) -> String {
        match &request.context {
            Some(context) if !context.trim().is_empty() => format!(
                "Restaurant information:\n{context}\n\nCustomer message: {}",
                request.prompt
            ),
            _ => request.prompt.clone(),
        }
    }
}

#[async_trait]
impl TextCompletion for OpenAiCompatClient {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<String> {
        let api_key = self.config.api_key.as_deref().ok_or(CompletionError::Disabled)?;
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let user = Self::user_content(request);

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: 0.7,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout(self.config.timeout_secs)
                } else {
                    CompletionError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                CompletionError::Timeout(self.config.timeout_secs)
            } else {
                CompletionError::Decode(e.to_string())
            }
        })?;

        let text = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(CompletionError::EmptyResponse)?;

        tracing::debug!(model = %self.config.model, chars = text.len(), "completion received");
        Ok(text)
    }

    fn provider_name(&self) -> &str {
        "openai-compatible"
    }
}
