//! # Agent Chain
//!
//! Sequential worker chains over LLM backends.
//!
//! This crate composes **workers** — units pairing a model adapter with a
//! task description — into an **agent** that runs them in order, feeding
//! each worker's output to the next as its prompt. Every worker receives an
//! enriched context: an ASCII diagram of the whole chain, the outputs of the
//! workers before it, the tasks of the workers after it, and its own task.
//!
//! ## Core Concepts
//!
//! - **[`Worker`]** — one chain position: a [`ModelAdapter`] factory plus a
//!   task context, built fluently with [`worker()`].
//! - **[`Agent`]** — an ordered, validated roster of workers. Stateless
//!   between invocations.
//! - **[`ModelAdapter`]** — object-safe boundary to a model backend.
//!   [`OllamaAdapter`] and [`OpenAiAdapter`] ship with the crate;
//!   [`MockAdapter`] serves tests.
//! - **[`TokenStream`]** — the final worker's output as an incremental
//!   stream of text fragments.
//!
//! ## Quick Start
//!
//! ```no_run
//! use agent_chain::{worker, Agent, AgentOptions};
//! use agent_chain::adapter::OllamaAdapter;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let agent = Agent::new(vec![
//!         worker()
//!             .model(|| Arc::new(OllamaAdapter::new("llama3.2")))
//!             .context("Extract the math problem from the input as JSON.")?,
//!         worker()
//!             .model(|| Arc::new(OllamaAdapter::new("llama3.2")))
//!             .context("Solve the math problem. Reply with the answer only.")?,
//!     ])?;
//!
//!     let answer = agent.run("2 and 2 added together", AgentOptions::default()).await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! [`Agent::run_streaming`] runs every worker except the last to completion,
//! then streams the final worker's output:
//!
//! ```no_run
//! # use agent_chain::{worker, Agent, AgentOptions};
//! # use agent_chain::adapter::OllamaAdapter;
//! # use std::sync::Arc;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let agent = Agent::new(vec![worker()
//! #     .model(|| Arc::new(OllamaAdapter::new("llama3.2")))
//! #     .context("Answer briefly.")?])?;
//! let mut tokens = agent.run_streaming("2 and 2 added together", AgentOptions::default()).await?;
//! while let Some(fragment) = tokens.next().await {
//!     print!("{}", fragment?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod agent;
pub mod context;
pub mod diagram;
pub mod error;
pub mod events;
pub mod stream;
pub mod types;
pub mod worker;

pub use adapter::{GenerateOptions, GenerateOutcome, ModelAdapter};
pub use adapter::{MockAdapter, OllamaAdapter, OpenAiAdapter};
pub use agent::Agent;
pub use context::build_enriched_context;
pub use diagram::render_diagram;
pub use error::{AgentError, Result};
pub use events::{AgentEvent, EventHandler};
pub use stream::TokenStream;
pub use types::{AgentOptions, PreviousOutput, WorkerContext};
pub use worker::{worker, Worker};
