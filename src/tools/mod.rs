mod search;
mod serper;

pub use search::{SearchProvider, SearchResult, WebSearchTool};
pub use serper::SerperProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0} is not set")]
    MissingApiKey(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid tool input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Failed(String),
}

impl ToolError {
    /// Errors the agent cannot work around by rephrasing its request
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingApiKey(_))
    }
}

/// Tool attached to an agent descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolSpec {
    /// Web search returning `result_count` organic results per query
    WebSearch { result_count: usize },
}

impl ToolSpec {
    pub fn web_search(result_count: usize) -> Self {
        Self::WebSearch { result_count }
    }
}

/// A capability an agent can invoke by name during execution
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON shape of the expected `Action Input`, shown to the model
    fn input_schema(&self) -> &str;

    async fn run(&self, input: &str) -> Result<String, ToolError>;
}

/// Pull a string argument out of a tool input.
///
/// Accepts a JSON object carrying `key`, a JSON string, or bare text.
pub fn string_arg(input: &str, key: &str) -> Result<String, ToolError> {
    let trimmed = input.trim();
    let value = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => match map.get(key) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => return Err(ToolError::InvalidInput(format!("missing \"{}\"", key))),
        },
        Ok(serde_json::Value::String(s)) => s,
        _ => trimmed.to_string(),
    };

    if value.trim().is_empty() {
        return Err(ToolError::InvalidInput(format!("empty \"{}\"", key)));
    }
    Ok(value)
}
