//! Stub providers shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::Settings;
use crate::crew::Runtime;
use crate::llm::{LlmError, LlmProvider, Message};
use crate::tools::{SearchProvider, SearchResult, ToolError};

/// Replays canned responses and records every conversation it was sent
pub(crate) struct ScriptedLlm {
    responses: Mutex<VecDeque<String>>,
    pub(crate) seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedLlm {
    pub(crate) fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(&self, messages: &[Message], _stop: &[&str]) -> crate::llm::Result<String> {
        self.seen.lock().unwrap().push(messages.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(LlmError::EmptyResponse)
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Answers every call with its whole conversation, marked final
pub(crate) struct EchoLlm;

#[async_trait]
impl LlmProvider for EchoLlm {
    async fn complete(&self, messages: &[Message], _stop: &[&str]) -> crate::llm::Result<String> {
        let all: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        Ok(format!("Final Answer: {}", all.join("\n")))
    }

    fn model(&self) -> &str {
        "echo"
    }
}

/// Returns up to two results derived from the query
pub(crate) struct StaticSearch;

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, ToolError> {
        Ok((1..=count.min(2))
            .map(|n| SearchResult {
                title: format!("{} #{}", query, n),
                link: format!("https://example.com/{}", n),
                snippet: "What is a window function?".into(),
                date: None,
            })
            .collect())
    }
}

pub(crate) fn runtime(llm: Arc<dyn LlmProvider>) -> Runtime {
    Runtime {
        llm,
        search: Arc::new(StaticSearch),
        max_iterations: Settings::default().max_iterations,
        verbose: false,
    }
}
