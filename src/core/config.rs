use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};

use super::provider::Provider;
use crate::ai::chat::RetentionPolicy;
use crate::ai::prompt::{DEFAULT_SYSTEM_MESSAGE, DEFAULT_TEMPERATURE};

/// How a failed chat turn is reported over HTTP.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// HTTP 200 with the error text in `response`, which is what the
    /// bundled web UI expects
    #[default]
    Legacy,
    /// Non-2xx status with `{"error": {"kind", "message"}}`
    Structured,
}

impl FromStr for ErrorMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "structured" => Ok(Self::Structured),
            other => Err(anyhow!("Unknown error mode: {}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub provider: Provider,
    pub model: String,
    pub api_hostname: String,
    pub api_key: String,
    pub temperature: f32,
    pub system_message: String,
    pub timeout: Duration,
    pub retention: RetentionPolicy,
    pub error_mode: ErrorMode,
    pub static_path: String,
}

impl AppConfig {
    /// Read the config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Unset and empty values
    /// fall back to defaults, except the provider's API key which is
    /// required.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = var("AGENTCHAT_PROVIDER")
            .map(|v| v.parse::<Provider>())
            .transpose()?
            .unwrap_or_default();
        let model = var("AGENTCHAT_MODEL").unwrap_or_else(|| provider.default_model().to_string());
        let api_hostname = var("AGENTCHAT_API_HOST")
            .unwrap_or_else(|| provider.default_api_hostname().to_string());
        let api_key = var(provider.api_key_var())
            .ok_or_else(|| anyhow!("Missing env var {}", provider.api_key_var()))?;
        let temperature = var("AGENTCHAT_TEMPERATURE")
            .map(|v| v.parse::<f32>())
            .transpose()
            .context("AGENTCHAT_TEMPERATURE must be a number")?
            .unwrap_or(DEFAULT_TEMPERATURE);
        let system_message =
            var("AGENTCHAT_SYSTEM_MESSAGE").unwrap_or_else(|| DEFAULT_SYSTEM_MESSAGE.to_string());
        let timeout_secs = var("AGENTCHAT_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("AGENTCHAT_TIMEOUT_SECS must be a whole number of seconds")?
            .unwrap_or(60);
        let max_turns = var("AGENTCHAT_MAX_TURNS")
            .map(|v| v.parse::<usize>())
            .transpose()
            .context("AGENTCHAT_MAX_TURNS must be a whole number")?;
        let error_mode = var("AGENTCHAT_ERROR_MODE")
            .map(|v| v.parse::<ErrorMode>())
            .transpose()?
            .unwrap_or_default();
        let static_path = var("AGENTCHAT_STATIC_DIR").unwrap_or_else(|| "./static".to_string());

        if timeout_secs == 0 {
            bail!("AGENTCHAT_TIMEOUT_SECS must be greater than 0");
        }
        let retention = match max_turns {
            None => RetentionPolicy::Unbounded,
            // One turn can't hold a message together with its reply
            Some(n) if n < 2 => bail!("AGENTCHAT_MAX_TURNS must be at least 2"),
            Some(n) => RetentionPolicy::MaxTurns(n),
        };

        Ok(Self {
            provider,
            model,
            api_hostname,
            api_key,
            temperature,
            system_message,
            timeout: Duration::from_secs(timeout_secs),
            retention,
            error_mode,
            static_path,
        })
    }
}
