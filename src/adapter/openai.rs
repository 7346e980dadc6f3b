//! Adapter for the OpenAI Responses API.
//!
//! Endpoint: `POST {base}/responses`. The enriched context travels in the
//! `instructions` field. Streaming uses SSE events; text arrives as
//! `response.output_text.delta` fragments.

use super::sse::SseDecoder;
use super::{token_stream, GenerateOptions, GenerateOutcome, ModelAdapter};
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Adapter for OpenAI's Responses API.
///
/// The API key comes from [`with_api_key`](Self::with_api_key) or the
/// `OPENAI_API_KEY` environment variable; a missing key is a configuration
/// error at generate time.
///
/// # Example
///
/// ```
/// use agent_chain::adapter::OpenAiAdapter;
///
/// let adapter = OpenAiAdapter::new("gpt-4o-mini").with_api_key("sk-...");
/// ```
#[derive(Clone)]
pub struct OpenAiAdapter {
    model: String,
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for OpenAiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAdapter")
            .field("model", &self.model)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|k| {
                    if k.chars().count() > 6 {
                        let prefix: String = k.chars().take(6).collect();
                        format!("{}***", prefix)
                    } else {
                        "***".to_string()
                    }
                }),
            )
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiAdapter {
    /// Create an adapter for the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Set the API key explicitly instead of reading `OPENAI_API_KEY`.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Point the adapter at a compatible non-default endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn resolve_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                AgentError::InvalidConfig(
                    "OpenAI API key is required. Set OPENAI_API_KEY or pass it via with_api_key."
                        .to_string(),
                )
            })
    }

    /// Build the Responses API request body.
    fn build_body(
        &self,
        prompt: &str,
        context: Option<&str>,
        options: &GenerateOptions,
        stream: bool,
    ) -> Value {
        let mut body = json!({
            "model": self.model,
            "input": prompt,
            "temperature": DEFAULT_TEMPERATURE,
        });
        if let Some(ctx) = context {
            if !ctx.is_empty() {
                body["instructions"] = json!(ctx);
            }
        }
        if let Some(max_tokens) = options.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if stream {
            body["stream"] = json!(true);
        }
        body
    }

    async fn send(&self, body: &Value) -> Result<reqwest::Response> {
        let api_key = self.resolve_api_key()?;
        let url = format!("{}/responses", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
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

    /// Pull the response text out of a non-streaming Responses API payload.
    ///
    /// Prefers the `output_text` convenience field, falling back to walking
    /// the `output` array for message items.
    fn extract_text(json_resp: &Value) -> Option<String> {
        if let Some(text) = json_resp.get("output_text").and_then(|v| v.as_str()) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
        for item in json_resp.get("output")?.as_array()? {
            if item.get("type").and_then(|v| v.as_str()) != Some("message") {
                continue;
            }
            for part in item.get("content")?.as_array()? {
                if part.get("type").and_then(|v| v.as_str()) == Some("output_text") {
                    if let Some(text) = part.get("text").and_then(|v| v.as_str()) {
                        return Some(text.to_string());
                    }
                }
            }
        }
        None
    }

    /// Pull fragment text out of one SSE event frame.
    fn extract_stream_fragment(event: &Value) -> Option<String> {
        match event.get("type").and_then(|v| v.as_str()) {
            Some("response.output_text.delta") => event
                .get("delta")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            // A freshly added content part may carry initial text; everything
            // else (done / completed events) duplicates the deltas.
            Some("response.content_part.added") => event
                .get("part")
                .and_then(|p| p.get("text"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            _ => None,
        }
    }
}

#[async_trait]
impl ModelAdapter for OpenAiAdapter {
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
                SseDecoder::new(),
                Self::extract_stream_fragment,
            )));
        }

        let body = self.build_body(prompt, context, options, false);
        let resp = self.send(&body).await?;
        let json_resp: Value = resp.json().await?;

        let text = Self::extract_text(&json_resp).ok_or_else(|| {
            AgentError::Other(
                "OpenAI returned a response with no output text; it may be malformed or empty"
                    .to_string(),
            )
        })?;

        Ok(GenerateOutcome::Text(text))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
