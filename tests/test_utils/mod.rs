//! Test utilities for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use tower::util::ServiceExt;

use agentchat::ai::chat::RetentionPolicy;
use agentchat::ai::prompt::{DEFAULT_SYSTEM_MESSAGE, Prompt};
use agentchat::ai::{CompletionModel, ModelError, ModelErrorKind};
use agentchat::api::{AppState, app};
use agentchat::core::{AppConfig, ErrorMode, Provider};

/// A stand-in for the hosted model. Replies with queued results in
/// order (or echoes the last user message once the queue is empty)
/// and records every prompt it receives.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, ModelError>>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn replying(replies: Vec<Result<String, ModelError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// A model whose every call fails
    pub fn failing() -> Arc<Self> {
        Self::replying(
            (0..10)
                .map(|_| Err(ModelError::new(ModelErrorKind::RateLimit, "quota exceeded")))
                .collect(),
        )
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => {
                let last = prompt.turns().last().map(|t| t.text()).unwrap_or_default();
                Ok(format!("echo: {}", last))
            }
        }
    }

    fn model_id(&self) -> &str {
        "scripted"
    }
}

pub fn test_config(static_path: &Path) -> AppConfig {
    AppConfig {
        provider: Provider::Gemini,
        model: String::from("gemini-2.5-flash"),
        api_hostname: String::from("http://localhost:1"),
        api_key: String::from("test-api-key"),
        temperature: 0.4,
        system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
        timeout: Duration::from_secs(5),
        retention: RetentionPolicy::Unbounded,
        error_mode: ErrorMode::Legacy,
        static_path: static_path.display().to_string(),
    }
}

/// Creates a test application router around `model`.
pub fn test_app_with(model: Arc<ScriptedModel>, config: AppConfig) -> Router {
    app(Arc::new(AppState::with_model(model, config)))
}

pub fn test_app(model: Arc<ScriptedModel>) -> Router {
    test_app_with(model, test_config(Path::new("./static")))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}

pub fn chat_request(payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri("/chat")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

/// Send one chat message and return the raw response
pub async fn post_chat(app: &Router, payload: serde_json::Value) -> Response<Body> {
    app.clone().oneshot(chat_request(payload)).await.unwrap()
}
