use agent_chain::adapter::OllamaAdapter;
use agent_chain::{worker, Agent, AgentOptions};
use futures::StreamExt;
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let agent = Agent::new(vec![
        worker()
            .model(|| Arc::new(OllamaAdapter::new("llama3.2:3b")))
            .context("Identify the topic of the input in one short sentence.")?,
        worker()
            .model(|| Arc::new(OllamaAdapter::new("llama3.2:3b")))
            .context("Write a short paragraph about the topic.")?,
    ])?;

    println!("Streaming final output...\n");
    let mut tokens = agent
        .run_streaming("the borrow checker in Rust", AgentOptions::default())
        .await?;

    while let Some(fragment) = tokens.next().await {
        print!("{}", fragment?);
        std::io::stdout().flush()?;
    }
    println!();

    Ok(())
}
