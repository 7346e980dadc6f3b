//! Model adapter trait and shared plumbing.
//!
//! [`ModelAdapter`] is the sole boundary the chain depends on: something that
//! turns a prompt plus optional context into either a complete string or a
//! lazy stream of fragments. Built-in implementations: [`OpenAiAdapter`],
//! [`OllamaAdapter`], and [`MockAdapter`] for tests.
//!
//! ```text
//! Agent ──► ModelAdapter::generate(prompt, context, options)
//!                            │
//!               ┌────────────┴────────────┐
//!         OpenAiAdapter             OllamaAdapter
//!         /responses (SSE)          /api/generate (NDJSON)
//! ```

pub mod mock;
pub mod ndjson;
pub mod ollama;
pub mod openai;
pub mod sse;

pub use mock::MockAdapter;
pub use ollama::OllamaAdapter;
pub use openai::OpenAiAdapter;

use crate::error::Result;
use crate::stream::TokenStream;
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use std::collections::VecDeque;

/// Options forwarded to a single generate call.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,
    /// Whether the caller wants an incremental fragment stream.
    pub stream: bool,
}

/// The result of a generate call.
///
/// Non-streaming calls must produce [`Text`](GenerateOutcome::Text).
/// Streaming calls should produce [`Stream`](GenerateOutcome::Stream), but
/// callers tolerate `Text` there too.
pub enum GenerateOutcome {
    /// A complete response string.
    Text(String),
    /// A lazy, single-pass fragment stream.
    Stream(TokenStream),
}

impl std::fmt::Debug for GenerateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateOutcome::Text(t) => f.debug_tuple("Text").field(t).finish(),
            GenerateOutcome::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Abstraction over text-generation backends.
///
/// Implementors translate a prompt, optional context, and generation options
/// into a provider call. The trait is object-safe and designed to be used as
/// `Arc<dyn ModelAdapter>`.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Generate a response.
    ///
    /// When `options.stream` is false the implementation MUST return
    /// [`GenerateOutcome::Text`]. When it is true the implementation SHOULD
    /// return [`GenerateOutcome::Stream`].
    async fn generate(
        &self,
        prompt: &str,
        context: Option<&str>,
        options: &GenerateOptions,
    ) -> Result<GenerateOutcome>;

    /// Human-readable name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Buffered decoder turning raw byte chunks into framed JSON values.
///
/// Implemented by [`sse::SseDecoder`] and [`ndjson::NdjsonDecoder`]; lets one
/// stream builder serve both wire formats.
pub(crate) trait FrameDecoder: Send {
    /// Feed a raw chunk, returning any complete frames.
    fn decode(&mut self, chunk: &[u8]) -> Vec<Value>;
    /// Drain whatever remains after the stream ends.
    fn flush(&mut self) -> Vec<Value>;
}

/// Build a [`TokenStream`] over an HTTP response body.
///
/// `extract` pulls the fragment text out of one decoded frame (`None` for
/// frames that carry no text). The response body lives inside the stream, so
/// dropping the stream — early stop included — releases the connection.
pub(crate) fn token_stream<D, F>(response: reqwest::Response, decoder: D, extract: F) -> TokenStream
where
    D: FrameDecoder + 'static,
    F: Fn(&Value) -> Option<String> + Send + 'static,
{
    struct State<D, F> {
        body: futures::stream::BoxStream<'static, reqwest::Result<Vec<u8>>>,
        decoder: D,
        extract: F,
        pending: VecDeque<String>,
        finished: bool,
    }

    let state = State {
        body: response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed(),
        decoder,
        extract,
        pending: VecDeque::new(),
        finished: false,
    };

    Box::pin(futures::stream::unfold(state, |mut st| async move {
        loop {
            if let Some(fragment) = st.pending.pop_front() {
                return Some((Ok(fragment), st));
            }
            if st.finished {
                return None;
            }
            match st.body.next().await {
                Some(Ok(chunk)) => {
                    for frame in st.decoder.decode(&chunk) {
                        if let Some(text) = (st.extract)(&frame) {
                            if !text.is_empty() {
                                st.pending.push_back(text);
                            }
                        }
                    }
                }
                Some(Err(e)) => {
                    st.finished = true;
                    return Some((Err(crate::AgentError::Request(e)), st));
                }
                None => {
                    st.finished = true;
                    for frame in st.decoder.flush() {
                        if let Some(text) = (st.extract)(&frame) {
                            if !text.is_empty() {
                                st.pending.push_back(text);
                            }
                        }
                    }
                }
            }
        }
    }))
}
