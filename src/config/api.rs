//! Provider connection settings consumed by the LLM pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// LLM vendor or gateway the requests go to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenRouter,
    /// Poe's OpenAI-compatible gateway
    Poe,
    /// Any OpenAI-compatible endpoint (OpenAI itself when no base URL is set)
    Custom,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenRouter => "openrouter",
            Self::Poe => "poe",
            Self::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openrouter" => Some(Self::OpenRouter),
            "poe" => Some(Self::Poe),
            "custom" | "openai" => Some(Self::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of everything needed to talk to the provider.
///
/// The service reads one snapshot per call; updating the configuration replaces
/// the snapshot as a whole.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Provider (openrouter, poe, custom)
    #[serde(default)]
    pub provider: Provider,

    /// Bearer token sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Overrides the provider's default base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Model identifier, e.g. "openai/gpt-4o-mini"
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Nucleus sampling (0.0 - 1.0)
    #[serde(default = "default_top_p")]
    pub top_p: f64,

    /// Output token ceiling; clamped before sending
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i64,
}

fn default_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.4
}

fn default_top_p() -> f64 {
    0.9
}

fn default_max_tokens() -> i64 {
    4000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            api_key: String::new(),
            base_url: None,
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl ApiConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// Keep the key out of logs and `{:?}` output.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("provider", &self.provider)
            .field("api_key", &if self.has_api_key() { "<set>" } else { "<empty>" })
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
