//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::ai::chat::Turn;

#[derive(Deserialize, Serialize)]
pub struct ChatRequest {
    pub message: String,
    // Falls back to the default session when omitted
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

impl ChatResponse {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ChatTranscriptResponse {
    pub session_id: String,
    pub transcript: Vec<Turn>,
}
