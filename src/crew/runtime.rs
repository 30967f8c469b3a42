use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Settings;
use crate::llm::{LlmProvider, OpenAiProvider};
use crate::tools::{SearchProvider, SerperProvider, Tool, ToolSpec, WebSearchTool};

/// Providers and limits a crew runs against
#[derive(Clone)]
pub struct Runtime {
    pub llm: Arc<dyn LlmProvider>,
    pub search: Arc<dyn SearchProvider>,
    pub max_iterations: usize,
    /// Log every agent step at info level
    pub verbose: bool,
}

impl Runtime {
    /// OpenAI + Serper, built from explicit settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let llm = OpenAiProvider::from_settings(&settings.llm).context("Failed to build LLM client")?;
        let search =
            SerperProvider::from_settings(&settings.search).context("Failed to build search client")?;
        Ok(Self {
            llm: Arc::new(llm),
            search: Arc::new(search),
            max_iterations: settings.max_iterations,
            verbose: false,
        })
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Turn a tool descriptor into a live tool
    pub fn resolve_tool(&self, spec: &ToolSpec) -> Arc<dyn Tool> {
        match *spec {
            ToolSpec::WebSearch { result_count } => {
                Arc::new(WebSearchTool::new(self.search.clone(), result_count))
            }
        }
    }

    pub fn resolve_tools(&self, specs: &[ToolSpec]) -> Vec<Arc<dyn Tool>> {
        specs.iter().map(|s| self.resolve_tool(s)).collect()
    }
}
