use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use uuid::Uuid;

use crate::api::AppState;
use crate::core::AppConfig;

pub async fn run(session: Option<String>, config: AppConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let state = AppState::from_config(config)?;
    let session_id = session.unwrap_or_else(|| Uuid::new_v4().to_string());
    println!("Session {} ({})", session_id, state.chat.model_id());

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                // A failed turn is reported and the session carries on
                match state.chat.respond(&line, Some(&session_id)).await {
                    Ok(reply) => println!("{}", reply),
                    Err(e) => println!("⚠️ Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
