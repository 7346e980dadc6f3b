//! Shared data model for agent execution.
//!
//! These are the immutable snapshots the agent derives from its workers at
//! construction time, plus the append-only execution history threaded through
//! one invocation.

use crate::adapter::ModelAdapter;
use std::sync::Arc;

/// Frozen snapshot of one worker, taken when the agent is built.
///
/// The agent reads from these instead of re-querying the mutable
/// [`Worker`](crate::Worker) mid-execution.
pub(crate) struct WorkerInfo {
    /// 0-based position in the chain.
    pub index: usize,
    /// The worker's base instructions, if any.
    pub context: Option<String>,
    /// The bound model adapter.
    pub adapter: Arc<dyn ModelAdapter>,
}

/// The subset of worker information needed for diagram and history rendering.
#[derive(Debug, Clone)]
pub struct WorkerContext {
    /// 0-based position in the chain.
    pub index: usize,
    /// The worker's base instructions, if any.
    pub context: Option<String>,
}

/// One completed non-final worker's output, recorded for the history section.
///
/// Records accumulate in completion order, which equals chain order since
/// execution is strictly sequential.
#[derive(Debug, Clone)]
pub struct PreviousOutput {
    /// 0-based position of the worker that produced this output.
    pub index: usize,
    /// That worker's base instructions, if any.
    pub context: Option<String>,
    /// The raw string output, before structured-parse coercion.
    pub output: String,
}

/// Options for one agent invocation.
#[derive(Debug, Clone, Default)]
pub struct AgentOptions {
    /// Maximum number of tokens each worker may generate.
    pub max_tokens: Option<u32>,
}

impl AgentOptions {
    /// Set the per-worker token cap.
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}
