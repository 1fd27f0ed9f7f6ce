//! minutesmaster - Turn meeting transcripts into structured minutes
//!
//! The pipeline assembles prompt context from terminology, instructions, style
//! samples and an optional template profile, sends one chat-completion request to
//! an OpenAI-compatible provider, and normalizes the JSON reply into
//! [`models::GeneratedMinutes`].

pub mod cli;
pub mod config;
pub mod export;
pub mod llm;
pub mod models;

use std::fmt;

use thiserror::Error;

/// A non-2xx reply from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API request failed: {} {} - {}",
            self.status, self.status_text, self.body
        )
    }
}

/// Main error type for minutesmaster
#[derive(Error, Debug)]
pub enum MinutesError {
    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("CORS error - API might not be accessible from your domain ({0})")]
    Cors(String),

    #[error("Authentication failed - please check your API key ({0})")]
    Authentication(HttpFailure),

    #[error("Rate limit exceeded - please wait and try again ({0})")]
    RateLimited(HttpFailure),

    #[error("AI provider server error - please try again later ({0})")]
    ProviderServer(HttpFailure),

    #[error("{0}")]
    Api(HttpFailure),

    #[error("AI returned invalid JSON format: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid response format from AI provider: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`MinutesError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputValidation,
    Transport,
    Authentication,
    RateLimited,
    ProviderServer,
    MalformedResponse,
    Config,
}

impl MinutesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputValidation(_) => ErrorKind::InputValidation,
            Self::Network(_) | Self::Cors(_) | Self::Api(_) | Self::Io(_) => ErrorKind::Transport,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::RateLimited(_) => ErrorKind::RateLimited,
            Self::ProviderServer(_) => ErrorKind::ProviderServer,
            Self::InvalidJson(_) | Self::MissingField(_) | Self::MalformedResponse(_) => {
                ErrorKind::MalformedResponse
            }
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// The HTTP reply behind this error, when there was one.
    pub fn http_failure(&self) -> Option<&HttpFailure> {
        match self {
            Self::Authentication(failure)
            | Self::RateLimited(failure)
            | Self::ProviderServer(failure)
            | Self::Api(failure) => Some(failure),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MinutesError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "minutesmaster";
