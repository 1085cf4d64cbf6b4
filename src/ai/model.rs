//! The seam between the chat orchestrator and a hosted model.
//!
//! A `CompletionModel` takes a fully assembled `Prompt` (the service
//! keeps no state between calls so the whole conversation is sent
//! every time) and returns the assistant's reply text.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;

use super::prompt::Prompt;

/// Classification of a failed model call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelErrorKind {
    /// Connection failures and other transport errors
    Network,
    /// No response before the client timeout elapsed
    Timeout,
    /// Missing or rejected credential (401, 403)
    Auth,
    /// Quota exhausted (429)
    RateLimit,
    /// The service rejected the request (400 and other 4xx)
    InvalidRequest,
    /// The service failed (5xx)
    Server,
    /// A 2xx response that didn't contain a reply
    MalformedResponse,
}

impl ModelErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Auth => "auth",
            Self::RateLimit => "rate_limit",
            Self::InvalidRequest => "invalid_request",
            Self::Server => "server",
            Self::MalformedResponse => "malformed_response",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ModelError {
    pub kind: ModelErrorKind,
    pub message: String,
}

impl ModelError {
    pub fn new(kind: ModelErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ModelErrorKind::MalformedResponse, message)
    }

    /// Map a non-success HTTP status from the provider to an error.
    pub fn from_status(status: http::StatusCode, detail: &str) -> Self {
        let kind = match status.as_u16() {
            401 | 403 => ModelErrorKind::Auth,
            429 => ModelErrorKind::RateLimit,
            500..=599 => ModelErrorKind::Server,
            _ => ModelErrorKind::InvalidRequest,
        };
        Self::new(kind, format!("HTTP {}: {}", status, detail))
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ModelErrorKind::Timeout, format!("Request timed out: {}", err))
        } else if err.is_decode() {
            Self::malformed(format!("Failed to decode response: {}", err))
        } else {
            Self::new(ModelErrorKind::Network, format!("Request failed: {}", err))
        }
    }
}

#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Send the prompt and wait for the complete reply.
    async fn complete(&self, prompt: &Prompt) -> Result<String, ModelError>;

    fn model_id(&self) -> &str;
}

pub type SharedModel = Arc<dyn CompletionModel>;

/// Wraps a model and logs the duration and outcome of every call.
pub struct LoggingModel {
    inner: SharedModel,
}

impl LoggingModel {
    pub fn new(inner: SharedModel) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl CompletionModel for LoggingModel {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ModelError> {
        let start = Instant::now();
        let result = self.inner.complete(prompt).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(reply) => tracing::info!(
                model = self.inner.model_id(),
                duration_ms,
                turns = prompt.turns().len(),
                reply_len = reply.len(),
                "Model call completed"
            ),
            Err(e) => tracing::error!(
                model = self.inner.model_id(),
                duration_ms,
                kind = e.kind.as_str(),
                error = %e,
                "Model call failed"
            ),
        }

        result
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}
