use std::sync::Arc;

use thiserror::Error;

use super::models::{Transcript, Turn};
use super::store::SessionStore;
use crate::ai::model::{ModelError, SharedModel};
use crate::ai::prompt::{DEFAULT_SYSTEM_MESSAGE, DEFAULT_TEMPERATURE, Prompt};

/// Session used when the caller doesn't name one.
pub const DEFAULT_SESSION_ID: &str = "default";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ChatError {
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::Model(e) => e.kind.as_str(),
        }
    }
}

/// Runs chat turns against a hosted model while keeping each
/// session's transcript in a `SessionStore`.
///
/// The model is stateless from our side so every turn resends the
/// system instruction and the whole transcript.
///
/// Use `Chat::builder()` to construct a valid `Chat`.
pub struct Chat {
    model: SharedModel,
    store: Arc<SessionStore>,
    system_message: String,
    temperature: f32,
}

impl Chat {
    pub fn builder(model: SharedModel) -> ChatBuilder {
        ChatBuilder::new(model)
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// Runs the next turn for `session_id` (or the default session)
    /// and returns the assistant's reply.
    ///
    /// The session lock is held for the whole turn so turns on the
    /// same session never interleave. On failure the user's message
    /// stays in the transcript and no reply is recorded.
    pub async fn respond(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<String, ChatError> {
        let session_id = session_id.unwrap_or(DEFAULT_SESSION_ID);
        let handle = self.store.session(session_id);
        let mut transcript = handle.lock().await;

        self.store.record(&mut transcript, Turn::user(message));

        let prompt =
            Prompt::new(&self.system_message, self.temperature).with_transcript(&transcript);
        tracing::debug!(session_id, turns = prompt.turns().len(), "Sending chat turn");

        let reply = self.model.complete(&prompt).await.inspect_err(|e| {
            tracing::error!(session_id, kind = e.kind.as_str(), "Chat turn failed: {}", e)
        })?;

        self.store.record(&mut transcript, Turn::assistant(&reply));

        Ok(reply)
    }

    /// Snapshot of a session's transcript
    pub async fn transcript(&self, session_id: &str) -> Transcript {
        self.store.get_or_create(session_id).await
    }
}

pub struct ChatBuilder {
    model: SharedModel,
    store: Option<Arc<SessionStore>>,
    system_message: String,
    temperature: f32,
}

impl ChatBuilder {
    pub fn new(model: SharedModel) -> Self {
        Self {
            model,
            store: None,
            system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn build(self) -> Chat {
        Chat {
            model: self.model,
            store: self.store.unwrap_or_default(),
            system_message: self.system_message,
            temperature: self.temperature,
        }
    }

    /// Share an existing store instead of starting with an empty one
    pub fn store(mut self, store: Arc<SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn system_message(mut self, system_message: &str) -> Self {
        self.system_message = system_message.to_string();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::ai::chat::models::Role;
    use crate::ai::chat::store::RetentionPolicy;
    use crate::ai::model::{CompletionModel, ModelErrorKind};

    /// Replies with queued results in order and remembers every
    /// prompt it was sent.
    #[derive(Default)]
    struct MockModel {
        replies: Mutex<VecDeque<Result<String, ModelError>>>,
        prompts: Mutex<Vec<Prompt>>,
    }

    impl MockModel {
        fn replying(replies: Vec<Result<String, ModelError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<Prompt> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionModel for MockModel {
        async fn complete(&self, prompt: &Prompt) -> Result<String, ModelError> {
            self.prompts.lock().unwrap().push(prompt.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("ok".to_string()))
        }

        fn model_id(&self) -> &str {
            "mock-model"
        }
    }

    fn quota_error() -> ModelError {
        ModelError::new(ModelErrorKind::RateLimit, "quota exceeded")
    }

    #[test]
    fn test_builder_defaults() {
        let chat = Chat::builder(MockModel::replying(vec![])).build();

        assert_eq!(chat.system_message, DEFAULT_SYSTEM_MESSAGE);
        assert_eq!(chat.temperature, DEFAULT_TEMPERATURE);
        assert!(chat.store().is_empty());
        assert_eq!(chat.model_id(), "mock-model");
    }

    #[test]
    fn test_builder_chaining() {
        let store = Arc::new(SessionStore::with_retention(RetentionPolicy::MaxTurns(4)));
        let chat = Chat::builder(MockModel::replying(vec![]))
            .store(Arc::clone(&store))
            .system_message("Be brief.")
            .temperature(0.0)
            .build();

        assert_eq!(chat.system_message, "Be brief.");
        assert_eq!(chat.temperature, 0.0);
        assert!(Arc::ptr_eq(chat.store(), &store));
    }

    #[tokio::test]
    async fn test_respond_appends_user_and_assistant_turns() {
        let model = MockModel::replying(vec![Ok("Hi there".to_string())]);
        let chat = Chat::builder(model.clone()).build();

        let reply = chat.respond("Hello", Some("s1")).await.unwrap();
        assert_eq!(reply, "Hi there");

        let transcript = chat.transcript("s1").await;
        assert_eq!(
            transcript.turns(),
            &[Turn::user("Hello"), Turn::assistant("Hi there")]
        );
    }

    #[tokio::test]
    async fn test_respond_sends_system_message_and_history() {
        let model = MockModel::replying(vec![
            Ok("Hi there".to_string()),
            Ok("You said Hello".to_string()),
        ]);
        let chat = Chat::builder(model.clone())
            .system_message("Be brief.")
            .temperature(0.1)
            .build();

        chat.respond("Hello", Some("s1")).await.unwrap();
        chat.respond("What did I just say?", Some("s1")).await.unwrap();

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 2);

        let second = &prompts[1];
        assert_eq!(second.system(), "Be brief.");
        assert_eq!(second.temperature(), 0.1);
        assert_eq!(
            second.turns(),
            &[
                Turn::user("Hello"),
                Turn::assistant("Hi there"),
                Turn::user("What did I just say?"),
            ]
        );
    }

    #[tokio::test]
    async fn test_retention_keeps_prompts_starting_on_user_turn() {
        let model = MockModel::replying(vec![]);
        let store = Arc::new(SessionStore::with_retention(RetentionPolicy::MaxTurns(2)));
        let chat = Chat::builder(model.clone()).store(store).build();

        for message in ["a", "b", "c"] {
            chat.respond(message, Some("s1")).await.unwrap();
        }

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 3);
        for prompt in &prompts {
            assert_eq!(prompt.turns()[0].role(), Role::User);
        }
        assert_eq!(prompts[2].turns(), &[Turn::user("c")]);
        assert_eq!(
            chat.transcript("s1").await.turns(),
            &[Turn::user("c"), Turn::assistant("ok")]
        );
    }

    #[tokio::test]
    async fn test_respond_failure_keeps_user_turn() {
        let model = MockModel::replying(vec![Ok("first".to_string()), Err(quota_error())]);
        let chat = Chat::builder(model).build();

        chat.respond("one", Some("s1")).await.unwrap();
        let before = chat.transcript("s1").await.len();

        let err = chat.respond("two", Some("s1")).await.unwrap_err();
        assert_eq!(err.kind(), "rate_limit");
        assert_eq!(err.to_string(), "quota exceeded");

        let transcript = chat.transcript("s1").await;
        assert_eq!(transcript.len(), before + 1);
        assert_eq!(transcript.last(), Some(&Turn::user("two")));
    }

    #[tokio::test]
    async fn test_respond_without_session_uses_default() {
        let chat = Chat::builder(MockModel::replying(vec![])).build();

        chat.respond("first", None).await.unwrap();
        chat.respond("second", None).await.unwrap();

        let transcript = chat.transcript(DEFAULT_SESSION_ID).await;
        assert_eq!(transcript.len(), 4);
        assert_eq!(chat.store().session_ids(), vec![DEFAULT_SESSION_ID]);
    }

    #[tokio::test]
    async fn test_respond_accepts_empty_message() {
        let chat = Chat::builder(MockModel::replying(vec![])).build();

        chat.respond("", Some("s1")).await.unwrap();
        let transcript = chat.transcript("s1").await;
        assert_eq!(transcript.turns()[0], Turn::user(""));
    }

    #[tokio::test]
    async fn test_concurrent_turns_on_one_session_stay_paired() {
        let chat = Arc::new(Chat::builder(MockModel::replying(vec![])).build());

        let mut handles = Vec::new();
        for i in 0..8 {
            let chat = Arc::clone(&chat);
            handles.push(tokio::spawn(async move {
                chat.respond(&format!("msg {i}"), Some("shared")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let transcript = chat.transcript("shared").await;
        assert_eq!(transcript.len(), 16);
        for pair in transcript.turns().chunks(2) {
            assert_eq!(pair[0].role(), Role::User);
            assert_eq!(pair[1].role(), Role::Assistant);
        }
    }
}
