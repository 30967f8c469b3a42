use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{string_arg, Tool, ToolError};

pub const WEB_SEARCH_TOOL: &str = "web_search";

/// One organic search hit. Missing fields deserialize as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title
    #[serde(default)]
    pub title: String,
    /// Result URL
    #[serde(default)]
    pub link: String,
    /// Text excerpt shown under the result
    #[serde(default)]
    pub snippet: String,
    /// Publication date as the search engine reports it, e.g. "Jan 2025"
    #[serde(default)]
    pub date: Option<String>,
}

/// Web search capability
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, ToolError>;
}

/// Agent-facing wrapper around a [`SearchProvider`]
pub struct WebSearchTool {
    provider: Arc<dyn SearchProvider>,
    result_count: usize,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>, result_count: usize) -> Self {
        Self {
            provider,
            result_count: result_count.max(1),
        }
    }
}

fn format_results(results: &[SearchResult]) -> String {
    let mut out = String::from("Search results:\n");
    for r in results {
        let _ = writeln!(out, "Title: {}", r.title);
        let _ = writeln!(out, "Link: {}", r.link);
        if let Some(date) = &r.date {
            let _ = writeln!(out, "Date: {}", date);
        }
        let _ = writeln!(out, "Snippet: {}", r.snippet);
        out.push_str("---\n");
    }
    out
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        WEB_SEARCH_TOOL
    }

    fn description(&self) -> &str {
        "Search the internet with a query and return the top results (title, link, date, snippet)."
    }

    fn input_schema(&self) -> &str {
        r#"{"search_query": "mandatory query you want to use to search the internet"}"#
    }

    async fn run(&self, input: &str) -> Result<String, ToolError> {
        let query = string_arg(input, "search_query")?;
        tracing::debug!(%query, count = self.result_count, "web search");

        let results = self.provider.search(&query, self.result_count).await?;
        if results.is_empty() {
            return Ok(format!("No results found for \"{}\".", query));
        }
        Ok(format_results(&results))
    }
}
