//! Lazy fragment sequences for streamed model output.
//!
//! A [`TokenStream`] is a forward-only, single-pass sequence of text
//! fragments. It holds the underlying HTTP response body, so dropping it —
//! whether the consumer finished, stopped early, or hit an error — releases
//! the connection.

use crate::error::Result;
use futures::{Stream, StreamExt};
use std::pin::Pin;

/// A boxed stream of text fragments from a model adapter.
///
/// Single-pass and forward-only: once a fragment has been observed it cannot
/// be replayed.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Collect every fragment of a stream into one string.
///
/// Consumes the stream. Stops at the first fragment error and propagates it.
///
/// # Example
///
/// ```ignore
/// let stream = agent.run_streaming("input", AgentOptions::default()).await?;
/// let full = agent_chain::stream::collect(stream).await?;
/// ```
pub async fn collect(mut stream: TokenStream) -> Result<String> {
    let mut result = String::new();
    while let Some(fragment) = stream.next().await {
        result.push_str(&fragment?);
    }
    Ok(result)
}

/// Wrap an already-complete text into a one-fragment stream.
///
/// Used when streaming was requested but the adapter returned a full string,
/// which callers must tolerate.
pub fn once(text: String) -> TokenStream {
    Box::pin(futures::stream::once(async move { Ok(text) }))
}
