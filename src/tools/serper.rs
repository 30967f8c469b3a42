use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{SearchProvider, SearchResult, ToolError};
use crate::config::{SearchSettings, SERPER_API_KEY};

#[derive(Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<SearchResult>,
}

/// Google search through serper.dev
pub struct SerperProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl SerperProvider {
    pub fn from_settings(settings: &SearchSettings) -> Result<Self, ToolError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SearchProvider for SerperProvider {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, ToolError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ToolError::MissingApiKey(SERPER_API_KEY))?;

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", api_key)
            .json(&SearchRequest { q: query, num: count })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(ToolError::Api { status, body });
        }

        let parsed: SearchResponse = response.json().await?;
        let mut results = parsed.organic;
        results.truncate(count);
        Ok(results)
    }
}
