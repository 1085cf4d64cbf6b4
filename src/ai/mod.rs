pub mod chat;
pub mod model;
pub mod prompt;

pub use model::{CompletionModel, LoggingModel, ModelError, ModelErrorKind, SharedModel};
