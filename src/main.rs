use anyhow::Result;
use agentchat::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
