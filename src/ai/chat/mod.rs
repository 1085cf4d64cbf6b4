mod core;
pub mod models;
pub mod store;

pub use self::core::{Chat, ChatBuilder, ChatError, DEFAULT_SESSION_ID};
pub use models::{Role, Transcript, Turn};
pub use store::{RetentionPolicy, SessionHandle, SessionStore};
