//! Server-Sent Events decoder for the OpenAI streaming wire format.
//!
//! Handles the `data: ` prefix, the `[DONE]` terminator, line buffering
//! across TCP chunk boundaries, and empty keep-alive lines.

use super::FrameDecoder;
use serde_json::Value;

/// Buffered SSE decoder.
///
/// # Example
///
/// ```
/// use agent_chain::adapter::sse::SseDecoder;
///
/// let mut decoder = SseDecoder::new();
/// let frames = decoder.frames(b"data: {\"type\":\"response.output_text.delta\",\"delta\":\"Hi\"}\n\ndata: [DONE]\n\n");
/// assert_eq!(frames.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
}

impl SseDecoder {
    /// Create a new empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    fn parse_data_line(line: &str) -> Option<Value> {
        let data = line
            .strip_prefix("data: ")
            .or_else(|| line.strip_prefix("data:"))?
            .trim();
        if data == "[DONE]" {
            return None;
        }
        serde_json::from_str::<Value>(data).ok()
    }

    /// Feed raw bytes and return any complete event payloads.
    ///
    /// `event:` lines and empty keep-alive lines are ignored; the `[DONE]`
    /// terminator produces no frame.
    pub fn frames(&mut self, chunk: &[u8]) -> Vec<Value> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut values = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim();
            if line.is_empty() || line.starts_with("event:") {
                continue;
            }
            if let Some(val) = Self::parse_data_line(line) {
                values.push(val);
            }
        }
        values
    }

    /// Parse any remaining buffered lines after the stream ends.
    pub fn drain(&mut self) -> Vec<Value> {
        let remaining = std::mem::take(&mut self.buffer);
        remaining
            .lines()
            .filter_map(|line| Self::parse_data_line(line.trim()))
            .collect()
    }
}

impl FrameDecoder for SseDecoder {
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
    fn test_basic_event() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.frames(b"data: {\"delta\":\"Hello\"}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["delta"], "Hello");
    }

    #[test]
    fn test_done_terminator_ignored() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.frames(b"data: {\"delta\":\"Hi\"}\n\ndata: [DONE]\n\n");
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_keep_alive_and_event_lines_ignored() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.frames(b"\n\nevent: message\ndata: {\"x\":1}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["x"], 1);
    }

    #[test]
    fn test_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.frames(b"data: {\"del").is_empty());
        let frames = decoder.frames(b"ta\":\"Hi\"}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["delta"], "Hi");
    }

    #[test]
    fn test_multiple_events_one_chunk() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.frames(b"data: {\"a\":1}\n\ndata: {\"a\":2}\n\ndata: {\"a\":3}\n\n");
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn test_drain_unterminated_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.frames(b"data: {\"a\":1}").is_empty());
        let frames = decoder.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["a"], 1);
    }
}
