use thiserror::Error;

/// Errors produced by the agent and its adapters.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Invalid configuration detected when building a worker or agent:
    /// an empty roster, a worker with no bound adapter, a missing API key.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An input failed validation: empty agent input, empty worker context,
    /// empty stage prompt.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The adapter returned a shape inconsistent with the requested mode
    /// (e.g. a stream when non-streaming output was required).
    #[error("Adapter contract violation: {0}")]
    AdapterContract(String),

    /// Low-level HTTP transport failure (connection refused, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpError {
        /// HTTP status code (e.g. 401, 429, 500).
        status: u16,
        /// Response body text.
        body: String,
    },

    /// JSON handling failed at the serde level.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other adapter errors.
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
