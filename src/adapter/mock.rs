//! Mock adapter for testing without a live model.
//!
//! [`MockAdapter`] returns canned responses in order and records every call
//! it receives, so chains can be tested deterministically.

use super::{GenerateOptions, GenerateOutcome, ModelAdapter};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One recorded generate call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The prompt the adapter received.
    pub prompt: String,
    /// The context the adapter received, if any.
    pub context: Option<String>,
    /// Whether streaming was requested.
    pub stream: bool,
    /// The forwarded token cap.
    pub max_tokens: Option<u32>,
}

/// A test adapter that returns canned responses in order.
///
/// Cycles back to the beginning when all responses have been consumed. In
/// streaming mode the response is split into fragments of
/// [`fragment_size`](Self::with_fragment_size) characters (default 4), so
/// concatenation tests see a genuinely multi-fragment stream.
#[derive(Debug)]
pub struct MockAdapter {
    responses: Vec<String>,
    index: AtomicUsize,
    fragment_size: usize,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockAdapter {
    /// Create a mock with the given canned responses.
    pub fn new(responses: Vec<String>) -> Self {
        assert!(
            !responses.is_empty(),
            "MockAdapter requires at least one response"
        );
        Self {
            responses,
            index: AtomicUsize::new(0),
            fragment_size: 4,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }

    /// Set the streaming fragment size in characters.
    pub fn with_fragment_size(mut self, size: usize) -> Self {
        assert!(size > 0, "fragment size must be positive");
        self.fragment_size = size;
        self
    }

    /// Every call this adapter has received, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    /// How many times the adapter has been invoked.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock call log poisoned").len()
    }

    fn next_response(&self) -> String {
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.responses.len();
        self.responses[idx].clone()
    }

    fn record(&self, prompt: &str, context: Option<&str>, options: &GenerateOptions) {
        self.calls
            .lock()
            .expect("mock call log poisoned")
            .push(RecordedCall {
                prompt: prompt.to_string(),
                context: context.map(|c| c.to_string()),
                stream: options.stream,
                max_tokens: options.max_tokens,
            });
    }

    fn fragments(text: &str, size: usize) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        chars
            .chunks(size)
            .map(|chunk| chunk.iter().collect())
            .collect()
    }
}

#[async_trait]
impl ModelAdapter for MockAdapter {
    async fn generate(
        &self,
        prompt: &str,
        context: Option<&str>,
        options: &GenerateOptions,
    ) -> Result<GenerateOutcome> {
        self.record(prompt, context, options);
        let text = self.next_response();

        if options.stream {
            let fragments = Self::fragments(&text, self.fragment_size);
            return Ok(GenerateOutcome::Stream(Box::pin(futures::stream::iter(
                fragments.into_iter().map(Ok),
            ))));
        }

        Ok(GenerateOutcome::Text(text))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream;

    #[tokio::test]
    async fn test_fixed_response() {
        let mock = MockAdapter::fixed("Hello!");
        let outcome = mock
            .generate("prompt", None, &GenerateOptions::default())
            .await
            .unwrap();
        match outcome {
            GenerateOutcome::Text(t) => assert_eq!(t, "Hello!"),
            GenerateOutcome::Stream(_) => panic!("expected text outcome"),
        }
    }

    #[tokio::test]
    async fn test_cycles_responses() {
        let mock = MockAdapter::new(vec!["first".into(), "second".into()]);
        for expected in ["first", "second", "first"] {
            let outcome = mock
                .generate("p", None, &GenerateOptions::default())
                .await
                .unwrap();
            match outcome {
                GenerateOutcome::Text(t) => assert_eq!(t, expected),
                GenerateOutcome::Stream(_) => panic!("expected text outcome"),
            }
        }
    }

    #[tokio::test]
    async fn test_streaming_splits_into_fragments() {
        let mock = MockAdapter::fixed("Hello, world!").with_fragment_size(5);
        let options = GenerateOptions {
            stream: true,
            ..Default::default()
        };
        let outcome = mock.generate("p", None, &options).await.unwrap();
        let s = match outcome {
            GenerateOutcome::Stream(s) => s,
            GenerateOutcome::Text(_) => panic!("expected stream outcome"),
        };
        assert_eq!(stream::collect(s).await.unwrap(), "Hello, world!");
    }

    #[tokio::test]
    async fn test_records_calls() {
        let mock = MockAdapter::fixed("out");
        let options = GenerateOptions {
            max_tokens: Some(99),
            stream: false,
        };
        mock.generate("the prompt", Some("the context"), &options)
            .await
            .unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, "the prompt");
        assert_eq!(calls[0].context.as_deref(), Some("the context"));
        assert_eq!(calls[0].max_tokens, Some(99));
        assert!(!calls[0].stream);
    }
}
