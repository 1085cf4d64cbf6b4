mod core;

pub use self::core::{DEFAULT_API_HOSTNAME, DEFAULT_MODEL, Message, OpenAiClient, prompt_messages};
