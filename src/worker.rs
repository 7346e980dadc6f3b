//! Worker configuration unit.
//!
//! A [`Worker`] pairs one model adapter with one base-context string. It is a
//! pure configuration holder: built fluently, then frozen when handed to an
//! [`Agent`](crate::Agent), which snapshots it and never mutates it again.

use crate::adapter::ModelAdapter;
use crate::error::{AgentError, Result};
use std::sync::Arc;

/// One stage of an agent chain: a model adapter plus base instructions.
///
/// # Example
///
/// ```
/// use agent_chain::{worker, adapter::OpenAiAdapter};
/// use std::sync::Arc;
///
/// # fn main() -> agent_chain::Result<()> {
/// let extractor = worker()
///     .model(|| Arc::new(OpenAiAdapter::new("gpt-4o-mini")))
///     .context("Extract the numbers from the input.")?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Worker {
    adapter: Option<Arc<dyn ModelAdapter>>,
    context: Option<String>,
}

impl Worker {
    /// Create an empty worker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a model adapter, invoking the factory immediately.
    ///
    /// The adapter capability is enforced by the trait bound; there is
    /// nothing left to check at runtime.
    pub fn model<F>(mut self, factory: F) -> Self
    where
        F: FnOnce() -> Arc<dyn ModelAdapter>,
    {
        self.adapter = Some(factory());
        self
    }

    /// Bind the worker's base context (its instructions).
    ///
    /// Fails with a validation error if the text is empty or whitespace-only.
    pub fn context(mut self, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AgentError::Validation(
                "Worker context must be a non-empty string".to_string(),
            ));
        }
        self.context = Some(text);
        Ok(self)
    }

    /// The bound adapter, or a configuration error if none is bound.
    pub fn adapter(&self) -> Result<&Arc<dyn ModelAdapter>> {
        self.adapter.as_ref().ok_or_else(|| {
            AgentError::InvalidConfig("Worker has no model adapter bound".to_string())
        })
    }

    /// The bound base context. Absence is legal: a worker may have no
    /// special instructions.
    pub fn base_context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Split the worker into its parts for freezing into an agent roster.
    pub(crate) fn into_parts(self) -> (Option<Arc<dyn ModelAdapter>>, Option<String>) {
        (self.adapter, self.context)
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("adapter", &self.adapter.as_ref().map(|a| a.name()))
            .field("context", &self.context)
            .finish()
    }
}

/// Create a new empty worker.
pub fn worker() -> Worker {
    Worker::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MockAdapter;

    #[test]
    fn test_fluent_configuration() {
        let w = worker()
            .model(|| Arc::new(MockAdapter::fixed("x")))
            .context("Do the thing.")
            .unwrap();
        assert!(w.adapter().is_ok());
        assert_eq!(w.base_context(), Some("Do the thing."));
    }

    #[test]
    fn test_empty_context_rejected() {
        assert!(matches!(
            worker().context(""),
            Err(AgentError::Validation(_))
        ));
        assert!(matches!(
            worker().context("   \n\t "),
            Err(AgentError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_adapter_is_config_error() {
        let w = worker();
        assert!(matches!(w.adapter(), Err(AgentError::InvalidConfig(_))));
    }

    #[test]
    fn test_context_optional() {
        let w = worker().model(|| Arc::new(MockAdapter::fixed("x")));
        assert!(w.base_context().is_none());
        assert!(w.adapter().is_ok());
    }
}
