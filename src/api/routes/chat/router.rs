//! Router for the chat API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use super::public;
use crate::ai::ModelErrorKind;
use crate::ai::chat::ChatError;
use crate::api::public::ErrorResponse;
use crate::api::state::AppState;
use crate::core::ErrorMode;

type SharedState = Arc<AppState>;

/// Marker put in front of the error text when failures are reported
/// inside a successful response.
const ERROR_PREFIX: &str = "⚠️ Error: ";

/// Result of a chat turn at the handler boundary. Kept separate from
/// the HTTP status so the error mode alone decides how a failure goes
/// over the wire.
enum ChatOutcome {
    Reply(String),
    Failed(ChatError),
}

impl ChatOutcome {
    fn render(self, mode: ErrorMode) -> Response {
        match (self, mode) {
            (ChatOutcome::Reply(reply), _) => {
                Json(public::ChatResponse::new(&reply)).into_response()
            }
            (ChatOutcome::Failed(err), ErrorMode::Legacy) => {
                Json(public::ChatResponse::new(&format!("{ERROR_PREFIX}{err}"))).into_response()
            }
            (ChatOutcome::Failed(err), ErrorMode::Structured) => {
                let status = match &err {
                    ChatError::Model(e) if e.kind == ModelErrorKind::Timeout => {
                        StatusCode::GATEWAY_TIMEOUT
                    }
                    ChatError::Model(_) => StatusCode::BAD_GATEWAY,
                };
                ErrorResponse::new(status, err.kind(), &err.to_string()).into_response()
            }
        }
    }
}

/// Add a message to a chat session and respond with the model's reply
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ChatRequest>,
) -> Response {
    let outcome = match state
        .chat
        .respond(&payload.message, payload.session_id.as_deref())
        .await
    {
        Ok(reply) => ChatOutcome::Reply(reply),
        Err(e) => ChatOutcome::Failed(e),
    };

    outcome.render(state.config.error_mode)
}

/// Get the transcript for a chat session
async fn chat_session(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Json<public::ChatTranscriptResponse> {
    let transcript = state.chat.transcript(&session_id).await;

    Json(public::ChatTranscriptResponse {
        session_id,
        transcript: transcript.into_iter().collect(),
    })
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(chat_handler))
        .route("/{session_id}", get(chat_session))
}
