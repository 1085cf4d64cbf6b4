mod config;
mod provider;

pub use config::{AppConfig, ErrorMode};
pub use provider::{Provider, build_model};
