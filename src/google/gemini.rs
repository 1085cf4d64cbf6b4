//! Google Gemini `generateContent` client

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ai::chat::models::Role;
use crate::ai::model::{CompletionModel, ModelError};
use crate::ai::prompt::Prompt;

pub const DEFAULT_API_HOSTNAME: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub struct GeminiClient {
    client: reqwest::Client,
    api_hostname: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        api_hostname: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_hostname.trim_end_matches('/'),
            self.model
        )
    }
}

/// Gemini has no system role in `contents` so system turns are folded
/// into the system instruction and assistant turns become `model`.
fn translate_prompt(prompt: &Prompt) -> GeminiRequest {
    let mut system = vec![prompt.system().to_string()];
    let mut contents = Vec::with_capacity(prompt.turns().len());

    for turn in prompt.turns() {
        let role = match turn.role() {
            Role::System => {
                system.push(turn.text().to_string());
                continue;
            }
            Role::User => "user",
            Role::Assistant => "model",
        };
        contents.push(GeminiContent {
            role: Some(role.to_string()),
            parts: vec![GeminiPart {
                text: turn.text().to_string(),
            }],
        });
    }

    GeminiRequest {
        contents,
        system_instruction: GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: system.join("\n\n"),
            }],
        },
        generation_config: GeminiGenerationConfig {
            temperature: prompt.temperature(),
        },
    }
}

fn normalize_response(resp: GeminiResponse) -> Result<String, ModelError> {
    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::malformed("No candidates in response"))?;

    let content = candidate.content.ok_or_else(|| {
        ModelError::malformed(format!(
            "Candidate has no content (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ))
    })?;

    let text: String = content.parts.into_iter().map(|p| p.text).collect();
    if text.is_empty() {
        return Err(ModelError::malformed("Candidate has no text parts"));
    }
    Ok(text)
}

#[async_trait]
impl CompletionModel for GeminiClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ModelError> {
        let request = translate_prompt(prompt);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ModelError::from_status(status, &detail));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            ModelError::malformed(format!("Failed to parse response: {} - body: {}", e, body))
        })?;

        normalize_response(gemini_response)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    system_instruction: GeminiContent,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}
