//! Buffered decoder for newline-delimited JSON streams.
//!
//! Ollama streams one JSON object per line, and a single object is routinely
//! split across TCP chunk boundaries. The decoder accumulates raw bytes and
//! yields only complete lines.

use super::FrameDecoder;
use serde_json::Value;

/// Buffered NDJSON decoder.
///
/// # Example
///
/// ```
/// use agent_chain::adapter::ndjson::NdjsonDecoder;
///
/// let mut decoder = NdjsonDecoder::new();
/// assert!(decoder.frames(b"{\"response\":").is_empty());
/// let frames = decoder.frames(b"\"hi\"}\n");
/// assert_eq!(frames[0]["response"], "hi");
/// ```
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: String,
}

impl NdjsonDecoder {
    /// Create a new empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw chunk and return any complete JSON lines.
    ///
    /// Incomplete lines stay buffered until the next chunk; lines that fail
    /// to parse are skipped.
    pub fn frames(&mut self, chunk: &[u8]) -> Vec<Value> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut values = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Ok(val) = serde_json::from_str::<Value>(line) {
                values.push(val);
            }
        }
        values
    }

    /// Parse whatever remains after the stream ends (a trailing line with no
    /// terminating newline).
    pub fn drain(&mut self) -> Vec<Value> {
        let remaining = self.buffer.trim().to_string();
        self.buffer.clear();
        if remaining.is_empty() {
            return Vec::new();
        }
        serde_json::from_str::<Value>(&remaining)
            .map(|v| vec![v])
            .unwrap_or_default()
    }
}

impl FrameDecoder for NdjsonDecoder {
    fn decode(&mut self, chunk: &[u8]) -> Vec<Value> {
        self.frames(chunk)
    }

    fn flush(&mut self) -> Vec<Value> {
        self.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_lines() {
        let mut decoder = NdjsonDecoder::new();
        let frames = decoder.frames(b"{\"response\":\"hello\"}\n{\"response\":\"world\"}\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0]["response"], "hello");
        assert_eq!(frames[1]["response"], "world");
    }

    #[test]
    fn test_split_mid_value() {
        let mut decoder = NdjsonDecoder::new();
        assert!(decoder.frames(b"{\"response\":\"hel").is_empty());
        assert!(decoder.frames(b"lo wor").is_empty());
        let frames = decoder.frames(b"ld\"}\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["response"], "hello world");
    }

    #[test]
    fn test_chunk_spanning_two_lines() {
        let mut decoder = NdjsonDecoder::new();
        let frames = decoder.frames(b"{\"a\":1}\n{\"b\":");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["a"], 1);
        let frames = decoder.frames(b"2}\n");
        assert_eq!(frames[0]["b"], 2);
    }

    #[test]
    fn test_empty_and_garbage_lines_skipped() {
        let mut decoder = NdjsonDecoder::new();
        let frames = decoder.frames(b"\n\nnot json\n{\"ok\":true}\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["ok"], true);
    }

    #[test]
    fn test_drain_trailing_line() {
        let mut decoder = NdjsonDecoder::new();
        assert!(decoder.frames(b"{\"done\":true}").is_empty());
        let frames = decoder.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["done"], true);
    }

    #[test]
    fn test_drain_empty() {
        let mut decoder = NdjsonDecoder::new();
        assert!(decoder.drain().is_empty());
    }
}
