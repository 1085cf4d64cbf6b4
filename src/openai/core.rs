use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::ai::chat::models::{Role, Turn};
use crate::ai::model::{CompletionModel, ModelError};
use crate::ai::prompt::Prompt;

pub const DEFAULT_API_HOSTNAME: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        Message::new(turn.role(), turn.text())
    }
}

/// The system instruction always goes first, followed by the
/// transcript in conversation order.
pub fn prompt_messages(prompt: &Prompt) -> Vec<Message> {
    let mut messages = Vec::with_capacity(prompt.turns().len() + 1);
    messages.push(Message::new(Role::System, prompt.system()));
    messages.extend(prompt.turns().iter().map(Message::from));
    messages
}

/// Client for any OpenAI compatible chat completions API.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_hostname: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
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
}

#[async_trait]
impl CompletionModel for OpenAiClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ModelError> {
        let payload = json!({
            "model": self.model,
            "messages": prompt_messages(prompt),
            "temperature": prompt.temperature(),
        });
        let url = format!(
            "{}/v1/chat/completions",
            self.api_hostname.trim_end_matches("/")
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::from_status(status, &error_detail(&body)));
        }

        let resp: Value = response.json().await?;
        resp["choices"][0]["message"]["content"]
            .as_str()
            .filter(|content| !content.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ModelError::malformed(format!("No message received. Resp:\n\n {}", resp))
            })
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// OpenAI style errors look like {"error": {"message": "..."}}. Fall
// back to the raw body for anything else.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
