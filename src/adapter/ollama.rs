//! Adapter for Ollama's native API.
//!
//! Endpoint: `POST {base}/api/generate`. The enriched context travels in the
//! `system` field. Streaming is NDJSON with `{"response": "token"}` per line.

use super::ndjson::NdjsonDecoder;
use super::{token_stream, GenerateOptions, GenerateOutcome, ModelAdapter};
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Adapter for a local or remote Ollama server.
///
/// # Example
///
/// ```
/// use agent_chain::adapter::OllamaAdapter;
///
/// let adapter = OllamaAdapter::new("llama3.2:3b");
/// let remote = OllamaAdapter::new("llama3.2:3b").with_base_url("http://gpu-box:11434");
/// ```
#[derive(Debug, Clone)]
pub struct OllamaAdapter {
    model: String,
    base_url: String,
    client: Client,
}

impl OllamaAdapter {
    /// Create an adapter for the given model against `http://localhost:11434`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Point the adapter at a different Ollama server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the `/api/generate` request body.
    fn build_body(
        &self,
        prompt: &str,
        context: Option<&str>,
        options: &GenerateOptions,
        stream: bool,
    ) -> Value {
        let mut body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": stream,
        });
        if let Some(ctx) = context {
            if !ctx.is_empty() {
                body["system"] = json!(ctx);
            }
        }
        if let Some(max_tokens) = options.max_tokens {
            body["options"] = json!({ "num_predict": max_tokens });
        }
        body
    }

    async fn send(&self, body: &Value) -> Result<reqwest::Response> {
        let url = format!("{}/api/generate", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AgentError::Other(format!("Failed to connect to {}: {}", url, e)))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(AgentError::HttpError { status, body: text });
        }
        Ok(resp)
    }

    fn extract_stream_fragment(frame: &Value) -> Option<String> {
        frame
            .get("response")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}

#[async_trait]
impl ModelAdapter for OllamaAdapter {
    async fn generate(
        &self,
        prompt: &str,
        context: Option<&str>,
        options: &GenerateOptions,
    ) -> Result<GenerateOutcome> {
        if prompt.trim().is_empty() {
            return Err(AgentError::Validation(
                "Prompt must be a non-empty string".to_string(),
            ));
        }

        if options.stream {
            let body = self.build_body(prompt, context, options, true);
            let resp = self.send(&body).await?;
            return Ok(GenerateOutcome::Stream(token_stream(
                resp,
                NdjsonDecoder::new(),
                Self::extract_stream_fragment,
            )));
        }

        let body = self.build_body(prompt, context, options, false);
        let resp = self.send(&body).await?;
        let json_resp: Value = resp.json().await?;

        let text = json_resp
            .get("response")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        Ok(GenerateOutcome::Text(text))
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}
