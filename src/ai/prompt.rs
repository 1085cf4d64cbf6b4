//! Assembles the request sent to the model on every turn: a fixed
//! system instruction followed by the session's full transcript.

use super::chat::models::{Transcript, Turn};

pub const DEFAULT_SYSTEM_MESSAGE: &str = r"
You are a helpful, intelligent AI assistant.
Answer clearly and concisely.
Maintain conversational context.
";

pub const DEFAULT_TEMPERATURE: f32 = 0.4;

#[derive(Clone, Debug, PartialEq)]
pub struct Prompt {
    system: String,
    turns: Vec<Turn>,
    temperature: f32,
}

impl Prompt {
    pub fn new(system: &str, temperature: f32) -> Self {
        Self {
            system: system.trim().to_string(),
            turns: Vec::new(),
            temperature,
        }
    }

    pub fn with_turns(mut self, turns: Vec<Turn>) -> Self {
        self.turns = turns;
        self
    }

    pub fn with_transcript(self, transcript: &Transcript) -> Self {
        self.with_turns(transcript.turns().to_vec())
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_MESSAGE, DEFAULT_TEMPERATURE)
    }
}
