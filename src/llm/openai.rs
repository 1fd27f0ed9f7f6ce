use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::config::ApiConfig;
use crate::llm::client::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::llm::prompts::SYSTEM_PROMPT;
use crate::llm::provider::{chat_completions_url, models_url, request_headers};
use crate::{HttpFailure, MinutesError, Result};

const MIN_OUTPUT_TOKENS: u32 = 256;
const MAX_OUTPUT_TOKENS: u32 = 32000;
const DEFAULT_OUTPUT_TOKENS: u32 = 4000;

const DEFAULT_TEMPERATURE: f64 = 0.4;
const DEFAULT_TOP_P: f64 = 0.9;

/// Token ceiling sent to the provider.
///
/// Non-finite or non-positive requests fall back to the default; everything
/// else is clamped to [256, 32000].
pub fn clamp_tokens(requested: f64) -> u32 {
    if !requested.is_finite() || requested <= 0.0 {
        return DEFAULT_OUTPUT_TOKENS;
    }

    requested
        .round()
        .clamp(MIN_OUTPUT_TOKENS as f64, MAX_OUTPUT_TOKENS as f64) as u32
}

fn clamp_unit(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        default
    }
}

/// OpenAI-compatible chat completion request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ChatCompletionRequest {
    pub fn new(config: &ApiConfig, prompt: &str) -> Self {
        let response_format = config
            .provider
            .profile()
            .json_response_format
            .then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            });

        Self {
            model: config.model.trim().to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: clamp_tokens(config.max_tokens as f64),
            temperature: clamp_unit(config.temperature, DEFAULT_TEMPERATURE),
            top_p: clamp_unit(config.top_p, DEFAULT_TOP_P),
            response_format,
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<ModelInfo>,
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    id: String,
}

/// Map a non-2xx reply to its error kind.
pub fn classify_failure(response: HttpResponse) -> MinutesError {
    let failure = HttpFailure {
        status: response.status,
        status_text: response.status_text,
        body: response.body,
    };

    match failure.status {
        401 | 403 => MinutesError::Authentication(failure),
        429 => MinutesError::RateLimited(failure),
        500..=599 => MinutesError::ProviderServer(failure),
        _ => MinutesError::Api(failure),
    }
}

/// Chat-completions client speaking the OpenAI wire format
#[derive(Clone)]
pub struct ChatClient {
    transport: Arc<dyn HttpTransport>,
}

impl ChatClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Send one prompt and return the assistant's message content.
    pub async fn complete(&self, config: &ApiConfig, prompt: &str) -> Result<String> {
        let url = chat_completions_url(config);
        let body = ChatCompletionRequest::new(config, prompt);

        tracing::info!(
            provider = %config.provider,
            model = %body.model,
            max_tokens = body.max_tokens,
            prompt_chars = prompt.chars().count(),
            "Sending chat completion request"
        );

        let body = serde_json::to_value(&body)
            .map_err(|e| MinutesError::MalformedResponse(format!("request encoding: {}", e)))?;

        let started = Instant::now();
        let response = self
            .transport
            .send(HttpRequest {
                method: HttpMethod::Post,
                url: url.clone(),
                headers: request_headers(config),
                body: Some(body),
            })
            .await?;

        tracing::debug!(
            url = %url,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Chat completion reply received"
        );

        if !response.is_success() {
            let err = classify_failure(response);
            tracing::warn!("Chat completion failed: {}", err);
            return Err(err);
        }

        let payload: ChatCompletionResponse = serde_json::from_str(&response.body)
            .map_err(|e| MinutesError::MalformedResponse(format!("unreadable reply: {}", e)))?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| MinutesError::MalformedResponse("reply contained no choices".to_string()))
    }

    /// List model ids offered at `{base}/models`.
    pub async fn list_models(&self, config: &ApiConfig) -> Result<Vec<String>> {
        let response = self
            .transport
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: models_url(config),
                headers: request_headers(config),
                body: None,
            })
            .await?;

        if !response.is_success() {
            return Err(classify_failure(response));
        }

        let payload: ModelsResponse = serde_json::from_str(&response.body)
            .map_err(|e| MinutesError::MalformedResponse(format!("unreadable model list: {}", e)))?;

        let models = if payload.data.is_empty() {
            payload.models
        } else {
            payload.data
        };

        Ok(models.into_iter().map(|m| m.id).collect())
    }
}
