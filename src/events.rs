//! Event hooks for observing agent execution.
//!
//! An optional, non-intrusive way to watch a chain run: the agent emits an
//! event when each worker starts and finishes. Implement [`EventHandler`]
//! for logging or progress tracking; everything works without one.

use std::sync::Arc;

/// Events emitted while an agent invocation runs.
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// A worker is about to execute.
    StageStart {
        /// 0-based worker index.
        index: usize,
    },
    /// A worker finished executing.
    StageEnd {
        /// 0-based worker index.
        index: usize,
        /// Whether the stage succeeded.
        ok: bool,
    },
}

/// Handler for agent lifecycle events.
///
/// # Example
///
/// ```
/// use agent_chain::events::{AgentEvent, EventHandler};
///
/// struct PrintHandler;
///
/// impl EventHandler for PrintHandler {
///     fn on_event(&self, event: AgentEvent) {
///         match event {
///             AgentEvent::StageStart { index } => println!("[start] worker {}", index + 1),
///             AgentEvent::StageEnd { index, ok } => println!("[end] worker {} ok={}", index + 1, ok),
///         }
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    /// Called when the agent emits an event.
    fn on_event(&self, event: AgentEvent);
}

/// Emit an event if a handler is present. No-op otherwise.
pub(crate) fn emit(handler: &Option<Arc<dyn EventHandler>>, event: AgentEvent) {
    if let Some(ref h) = handler {
        h.on_event(event);
    }
}

/// An [`EventHandler`] backed by a closure.
pub struct FnEventHandler<F: Fn(AgentEvent) + Send + Sync>(pub F);

impl<F: Fn(AgentEvent) + Send + Sync> EventHandler for FnEventHandler<F> {
    fn on_event(&self, event: AgentEvent) {
        (self.0)(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_without_handler_is_noop() {
        emit(&None, AgentEvent::StageStart { index: 0 });
    }

    #[test]
    fn test_fn_handler_receives_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let count2 = count.clone();
        let handler: Arc<dyn EventHandler> = Arc::new(FnEventHandler(move |_| {
            count2.fetch_add(1, Ordering::Relaxed);
        }));
        let handler = Some(handler);
        emit(&handler, AgentEvent::StageStart { index: 0 });
        emit(&handler, AgentEvent::StageEnd { index: 0, ok: true });
        assert_eq!(count.load(Ordering::Relaxed), 2);
    }
}
