//! OpenAI-compatible chat-completions client
//!
//! Works against Ollama, Gemini's OpenAI endpoint and Azure OpenAI; the
//! differences live in `BackendConfig`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::preset::{AuthScheme, BackendConfig};
use super::{ChatMessage, TranslationBackend};
use crate::error::{TranslationError, TranslationResult};

/// Chat-completions backend over HTTP
pub struct ChatCompletionsClient {
    client: Client,
    config: BackendConfig,
    temperature: f32,
    name: String,
}

impl ChatCompletionsClient {
    /// Create a client with a per-request timeout
    pub fn new(
        config: BackendConfig,
        temperature: f32,
        timeout: Duration,
    ) -> TranslationResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TranslationError::Config(err.to_string()))?;
        let name = format!("chat-completions:{}", config.model);
        Ok(Self {
            client,
            config,
            temperature,
            name,
        })
    }

    /// Connection settings in use
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[async_trait]
impl TranslationBackend for ChatCompletionsClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, messages: &[ChatMessage]) -> TranslationResult<String> {
        let url = self.config.completions_url();
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: self.temperature,
        };

        let builder = self.client.post(&url).json(&request);
        let builder = match &self.config.auth {
            AuthScheme::Bearer => builder.bearer_auth(&self.config.api_key),
            AuthScheme::AzureApiKey { .. } => builder.header("api-key", &self.config.api_key),
        };

        let start = Instant::now();
        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Status { status, body });
        }

        let chat_response: ChatResponse = response.json().await?;
        tracing::debug!(
            backend = %self.name,
            duration_ms = start.elapsed().as_millis() as u64,
            "Backend replied"
        );

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(TranslationError::EmptyResponse)
    }
}
