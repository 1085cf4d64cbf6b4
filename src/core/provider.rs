use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Result, anyhow};

use super::AppConfig;
use crate::ai::model::{LoggingModel, SharedModel};
use crate::google::{self, GeminiClient};
use crate::openai::{self, OpenAiClient};

/// Hosted model services the chat can talk to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Gemini,
    OpenAi,
}

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => google::gemini::DEFAULT_MODEL,
            Provider::OpenAi => openai::DEFAULT_MODEL,
        }
    }

    pub fn default_api_hostname(&self) -> &'static str {
        match self {
            Provider::Gemini => google::gemini::DEFAULT_API_HOSTNAME,
            Provider::OpenAi => openai::DEFAULT_API_HOSTNAME,
        }
    }

    /// Env var holding the credential for this provider
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            other => Err(anyhow!("Unknown model provider: {}", other)),
        }
    }
}

/// Construct the model client described by `config`, wrapped so
/// every call is logged.
pub fn build_model(config: &AppConfig) -> Result<SharedModel> {
    let inner: SharedModel = match config.provider {
        Provider::Gemini => Arc::new(GeminiClient::new(
            &config.api_hostname,
            &config.api_key,
            &config.model,
            config.timeout,
        )?),
        Provider::OpenAi => Arc::new(OpenAiClient::new(
            &config.api_hostname,
            &config.api_key,
            &config.model,
            config.timeout,
        )?),
    };
    Ok(Arc::new(LoggingModel::new(inner)))
}
