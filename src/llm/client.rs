//! HTTP transport used by the chat client
//!
//! The service never builds its own HTTP stack: it is handed an
//! [`HttpTransport`], which is a `reqwest` client in production and a recorder
//! in tests.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::error::Error as _;
use std::time::Duration;

use crate::{MinutesError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// One outbound request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A reply with any status; classification happens in the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform exactly one request. Errors are reserved for failures where no
    /// reply arrived at all.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// `reqwest`-backed transport
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| MinutesError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(network_error)?;

        let status = response.status();
        let body = if status.is_success() {
            response.text().await.map_err(network_error)?
        } else {
            response.text().await.unwrap_or_else(|e| {
                tracing::debug!("Failed to read error body: {}", e);
                "Unknown error".to_string()
            })
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }
}

/// Classify a request that failed before a complete reply arrived.
///
/// Only the URL-free error chain is inspected, so a host name cannot decide
/// the kind. The reported message keeps the URL.
pub fn network_error(error: reqwest::Error) -> MinutesError {
    let message = error.to_string();
    let error = error.without_url();

    let mut detail = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }

    classify_network_failure(&detail, message)
}

/// `detail` must not contain the request URL.
fn classify_network_failure(detail: &str, message: String) -> MinutesError {
    if detail.to_lowercase().contains("cors") {
        MinutesError::Cors(message)
    } else {
        MinutesError::Network(message)
    }
}
