//! The agent: a strictly sequential chain of workers.
//!
//! [`Agent`] threads input through its workers in order — each worker's
//! coerced output becomes the next worker's prompt — and gives every worker
//! an enriched context describing the whole chain. The final worker's result
//! is returned as a plain string ([`run`](Agent::run)) or streamed
//! incrementally ([`run_streaming`](Agent::run_streaming)).

use crate::adapter::{GenerateOptions, GenerateOutcome};
use crate::context::build_enriched_context;
use crate::error::{AgentError, Result};
use crate::events::{emit, AgentEvent, EventHandler};
use crate::stream::{self, TokenStream};
use crate::types::{AgentOptions, PreviousOutput, WorkerContext, WorkerInfo};
use crate::worker::Worker;
use serde_json::Value;
use std::sync::Arc;

/// The value flowing between stages: a plain string or parsed JSON.
///
/// Structured values are re-serialized (pretty-printed) when fed to the next
/// stage as a prompt.
#[derive(Debug, Clone)]
enum StageValue {
    Text(String),
    Structured(Value),
}

impl StageValue {
    fn to_prompt(&self) -> Result<String> {
        match self {
            StageValue::Text(s) => Ok(s.clone()),
            StageValue::Structured(v) => Ok(serde_json::to_string_pretty(v)?),
        }
    }
}

/// Attempt a structured parse of a stage output.
///
/// Only JSON objects and arrays count as structured. Bare scalars ("4",
/// "true") stay plain text so a worker answering with a number is not
/// coerced through a JSON round trip.
fn parse_structured(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(v @ (Value::Object(_) | Value::Array(_))) => Some(v),
        _ => None,
    }
}

/// An ordered, frozen chain of workers.
///
/// Construction validates the whole roster up front: an empty roster or a
/// worker without a bound adapter fails here, never mid-chain. The agent
/// itself is stateless between invocations — each call owns its own history —
/// so one agent can serve concurrent invocations.
///
/// # Example
///
/// ```ignore
/// use agent_chain::{worker, Agent, AgentOptions, adapter::OpenAiAdapter};
/// use std::sync::Arc;
///
/// let agent = Agent::new(vec![
///     worker()
///         .model(|| Arc::new(OpenAiAdapter::new("gpt-4o-mini")))
///         .context("Extract the math problem from the input.")?,
///     worker()
///         .model(|| Arc::new(OpenAiAdapter::new("gpt-4o-mini")))
///         .context("Solve the math problem. Reply with the answer only.")?,
/// ])?;
///
/// let answer = agent.run("2 and 2 added together", AgentOptions::default()).await?;
/// ```
pub struct Agent {
    workers: Vec<WorkerInfo>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl Agent {
    /// Build an agent from an ordered roster of workers.
    ///
    /// Fails with a configuration error if the roster is empty or any worker
    /// has no adapter bound; the error names the offending worker's index.
    pub fn new(workers: Vec<Worker>) -> Result<Self> {
        if workers.is_empty() {
            return Err(AgentError::InvalidConfig(
                "Agent must have at least one worker. Provide one or more Worker instances."
                    .to_string(),
            ));
        }

        let workers = workers
            .into_iter()
            .enumerate()
            .map(|(index, worker)| {
                let (adapter, context) = worker.into_parts();
                let adapter = adapter.ok_or_else(|| {
                    AgentError::InvalidConfig(format!(
                        "Worker at index {} has no model adapter bound",
                        index
                    ))
                })?;
                Ok(WorkerInfo {
                    index,
                    context,
                    adapter,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            workers,
            event_handler: None,
        })
    }

    /// Attach an event handler observing stage starts and ends.
    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Number of workers in the chain.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether the chain is empty. Always false for a constructed agent.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Run the chain to completion and return the final worker's output as a
    /// string.
    ///
    /// Structured final outputs (JSON objects or arrays) are returned
    /// serialized; everything else is returned verbatim.
    pub async fn run(&self, input: &str, options: AgentOptions) -> Result<String> {
        validate_input(input)?;

        let contexts = self.worker_contexts();
        let mut history: Vec<PreviousOutput> = Vec::new();
        let mut current = StageValue::Text(input.to_string());

        for info in &self.workers[..self.workers.len() - 1] {
            current = self
                .run_intermediate_stage(info, &contexts, &mut history, current, &options)
                .await?;
        }

        let last = &self.workers[self.workers.len() - 1];
        let raw = self
            .generate_text(last, &contexts, &history, &current, &options)
            .await?;

        // Collapse the final value: structured payloads serialize, plain
        // text passes through.
        Ok(match parse_structured(&raw) {
            Some(v) => v.to_string(),
            None => raw,
        })
    }

    /// Run the chain, streaming the final worker's output.
    ///
    /// All preceding workers run to full completion first; only the final
    /// worker streams. If the adapter returns a complete string despite the
    /// streaming request, it is wrapped in a one-fragment stream.
    pub async fn run_streaming(&self, input: &str, options: AgentOptions) -> Result<TokenStream> {
        validate_input(input)?;

        let contexts = self.worker_contexts();
        let mut history: Vec<PreviousOutput> = Vec::new();
        let mut current = StageValue::Text(input.to_string());

        for info in &self.workers[..self.workers.len() - 1] {
            current = self
                .run_intermediate_stage(info, &contexts, &mut history, current, &options)
                .await?;
        }

        let last = &self.workers[self.workers.len() - 1];
        let enriched = build_enriched_context(
            last.index,
            &contexts,
            &history,
            last.context.as_deref().unwrap_or(""),
        );
        let prompt = current.to_prompt()?;

        emit(&self.event_handler, AgentEvent::StageStart { index: last.index });

        let outcome = last
            .adapter
            .generate(
                &prompt,
                Some(&enriched),
                &GenerateOptions {
                    max_tokens: options.max_tokens,
                    stream: true,
                },
            )
            .await;

        match outcome {
            Ok(GenerateOutcome::Stream(s)) => {
                emit(
                    &self.event_handler,
                    AgentEvent::StageEnd { index: last.index, ok: true },
                );
                Ok(s)
            }
            Ok(GenerateOutcome::Text(t)) => {
                emit(
                    &self.event_handler,
                    AgentEvent::StageEnd { index: last.index, ok: true },
                );
                Ok(stream::once(t))
            }
            Err(e) => {
                emit(
                    &self.event_handler,
                    AgentEvent::StageEnd { index: last.index, ok: false },
                );
                Err(e)
            }
        }
    }

    fn worker_contexts(&self) -> Vec<WorkerContext> {
        self.workers
            .iter()
            .map(|info| WorkerContext {
                index: info.index,
                context: info.context.clone(),
            })
            .collect()
    }

    /// Run one non-final stage: generate, record history, coerce the output.
    async fn run_intermediate_stage(
        &self,
        info: &WorkerInfo,
        contexts: &[WorkerContext],
        history: &mut Vec<PreviousOutput>,
        current: StageValue,
        options: &AgentOptions,
    ) -> Result<StageValue> {
        let raw = self
            .generate_text(info, contexts, history, &current, options)
            .await?;

        history.push(PreviousOutput {
            index: info.index,
            context: info.context.clone(),
            output: raw.clone(),
        });

        Ok(match parse_structured(&raw) {
            Some(v) => StageValue::Structured(v),
            None => StageValue::Text(raw),
        })
    }

    /// Invoke one worker's adapter in non-streaming mode and require a text
    /// outcome.
    async fn generate_text(
        &self,
        info: &WorkerInfo,
        contexts: &[WorkerContext],
        history: &[PreviousOutput],
        current: &StageValue,
        options: &AgentOptions,
    ) -> Result<String> {
        let enriched = build_enriched_context(
            info.index,
            contexts,
            history,
            info.context.as_deref().unwrap_or(""),
        );
        let prompt = current.to_prompt()?;

        emit(&self.event_handler, AgentEvent::StageStart { index: info.index });

        let outcome = info
            .adapter
            .generate(
                &prompt,
                Some(&enriched),
                &GenerateOptions {
                    max_tokens: options.max_tokens,
                    stream: false,
                },
            )
            .await;

        let result = match outcome {
            Ok(GenerateOutcome::Text(text)) => Ok(text),
            Ok(GenerateOutcome::Stream(_)) => Err(AgentError::AdapterContract(format!(
                "Worker at index {} returned a stream but streaming was not requested",
                info.index
            ))),
            Err(e) => Err(e),
        };

        emit(
            &self.event_handler,
            AgentEvent::StageEnd {
                index: info.index,
                ok: result.is_ok(),
            },
        );

        result
    }
}

fn validate_input(input: &str) -> Result<()> {
    if input.trim().is_empty() {
        return Err(AgentError::Validation(
            "Agent input must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}
