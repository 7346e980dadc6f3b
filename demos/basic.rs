use agent_chain::adapter::OllamaAdapter;
use agent_chain::{worker, Agent, AgentOptions};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Two-worker chain: one extracts the problem, one solves it.
    let agent = Agent::new(vec![
        worker()
            .model(|| Arc::new(OllamaAdapter::new("llama3.2:3b")))
            .context(
                "Extract the math problem from the input. Return a JSON object \
                 with 'numbers' (array) and 'operation' (string).",
            )?,
        worker()
            .model(|| Arc::new(OllamaAdapter::new("llama3.2:3b")))
            .context("Solve the math problem. Reply with the answer only.")?,
    ])?;

    println!("Running agent...");
    let answer = agent
        .run("2 and 2 added together", AgentOptions::default())
        .await?;

    println!("\nAnswer: {}", answer);

    Ok(())
}
