use std::sync::Arc;

use anyhow::Result;

use crate::ai::SharedModel;
use crate::ai::chat::{Chat, SessionStore};
use crate::core::{AppConfig, build_model};

pub struct AppState {
    pub chat: Arc<Chat>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(chat: Chat, config: AppConfig) -> Self {
        Self {
            chat: Arc::new(chat),
            config,
        }
    }

    /// Wire up a chat with an empty session store around `model`
    /// using the prompt settings from `config`.
    pub fn with_model(model: SharedModel, config: AppConfig) -> Self {
        let store = Arc::new(SessionStore::with_retention(config.retention));
        let chat = Chat::builder(model)
            .store(store)
            .system_message(&config.system_message)
            .temperature(config.temperature)
            .build();
        Self::new(chat, config)
    }

    /// Build the model client described by `config` and wire it up
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let model = build_model(&config)?;
        Ok(Self::with_model(model, config))
    }
}
