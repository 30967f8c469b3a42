use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{prompt, Agent, AgentError, AgentExecutor};
use crate::llm::{LlmError, LlmProvider};
use crate::tools::{Tool, ToolError};

pub const DELEGATE_TOOL: &str = "delegate_work";

#[derive(Deserialize)]
struct DelegateInput {
    coworker: String,
    task: String,
    #[serde(default)]
    context: String,
}

/// A crew member reachable through delegation, with its own tools
pub struct Coworker {
    pub agent: Agent,
    pub tools: Vec<Arc<dyn Tool>>,
}

/// Hands a sub-task to another agent in the crew.
///
/// Coworkers run without this tool, so delegation is one level deep.
pub struct DelegateTool {
    llm: Arc<dyn LlmProvider>,
    coworkers: Vec<Coworker>,
    max_iterations: usize,
    description: String,
}

impl DelegateTool {
    pub fn new(llm: Arc<dyn LlmProvider>, coworkers: Vec<Coworker>, max_iterations: usize) -> Self {
        let roles: Vec<&str> = coworkers.iter().map(|c| c.agent.role.as_str()).collect();
        let description = format!(
            "Delegate a specific task to one of the following coworkers: {}. \
             Provide everything they need to know in `task` and `context`; they know nothing else.",
            roles.join(", ")
        );
        Self {
            llm,
            coworkers,
            max_iterations,
            description,
        }
    }

    fn find(&self, role: &str) -> Option<&Coworker> {
        let role = role.trim();
        self.coworkers
            .iter()
            .find(|c| c.agent.role.eq_ignore_ascii_case(role))
    }
}

#[async_trait]
impl Tool for DelegateTool {
    fn name(&self) -> &str {
        DELEGATE_TOOL
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> &str {
        r#"{"coworker": "role of the coworker", "task": "what they should do", "context": "everything they need to know"}"#
    }

    async fn run(&self, input: &str) -> Result<String, ToolError> {
        let input: DelegateInput = serde_json::from_str(input.trim())
            .map_err(|e| ToolError::InvalidInput(e.to_string()))?;

        let Some(coworker) = self.find(&input.coworker) else {
            let roles: Vec<&str> = self.coworkers.iter().map(|c| c.agent.role.as_str()).collect();
            return Err(ToolError::InvalidInput(format!(
                "coworker '{}' not found, choose one of: {}",
                input.coworker,
                roles.join(", ")
            )));
        };

        tracing::info!(coworker = %coworker.agent.role, "delegating work");
        let task_prompt = prompt::task_prompt(
            &input.task,
            "Your best answer to your coworker asking you this, accounting for the context shared.",
            Some(&input.context),
        );

        let executor = AgentExecutor::new(self.llm.clone(), coworker.tools.clone(), self.max_iterations)
            .verbose(coworker.agent.verbose);
        executor
            .execute(&coworker.agent, task_prompt)
            .await
            .map_err(|e| match e {
                AgentError::Llm(LlmError::MissingApiKey(key)) => ToolError::MissingApiKey(key),
                AgentError::Tool { source, .. } if source.is_fatal() => source,
                other => ToolError::Failed(other.to_string()),
            })
    }
}
