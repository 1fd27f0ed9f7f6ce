//! Per-provider endpoint and header table

use crate::config::{ApiConfig, Provider};

/// How to reach one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderProfile {
    pub base_url: &'static str,
    /// Headers sent in addition to content type and authorization
    pub extra_headers: &'static [(&'static str, &'static str)],
    /// Whether `response_format: {"type": "json_object"}` is accepted
    pub json_response_format: bool,
}

const OPENROUTER: ProviderProfile = ProviderProfile {
    base_url: "https://openrouter.ai/api/v1",
    extra_headers: &[
        ("X-Title", "MinutesMaster AI"),
        ("HTTP-Referer", "https://minutesmaster.ai"),
    ],
    json_response_format: true,
};

const POE: ProviderProfile = ProviderProfile {
    base_url: "https://api.poe.com/v1",
    extra_headers: &[],
    json_response_format: false,
};

const OPENAI_COMPATIBLE: ProviderProfile = ProviderProfile {
    base_url: "https://api.openai.com/v1",
    extra_headers: &[],
    json_response_format: true,
};

impl Provider {
    pub fn profile(&self) -> &'static ProviderProfile {
        match self {
            Self::OpenRouter => &OPENROUTER,
            Self::Poe => &POE,
            Self::Custom => &OPENAI_COMPATIBLE,
        }
    }
}

/// Base URL without trailing slashes; an explicit override wins.
pub fn resolve_base_url(config: &ApiConfig) -> String {
    let base = config
        .base_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(config.provider.profile().base_url);

    base.trim_end_matches('/').to_string()
}

pub fn chat_completions_url(config: &ApiConfig) -> String {
    format!("{}/chat/completions", resolve_base_url(config))
}

pub fn models_url(config: &ApiConfig) -> String {
    format!("{}/models", resolve_base_url(config))
}

/// Full header set for a request, authorization included
pub fn request_headers(config: &ApiConfig) -> Vec<(String, String)> {
    let mut headers = vec![
        ("Content-Type".to_string(), "application/json".to_string()),
        (
            "Authorization".to_string(),
            format!("Bearer {}", config.api_key.trim()),
        ),
    ];

    headers.extend(
        config
            .provider
            .profile()
            .extra_headers
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string())),
    );

    headers
}
