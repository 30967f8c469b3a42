use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::prompt;
use super::Agent;
use crate::llm::{LlmError, LlmProvider, Message};
use crate::tools::{Tool, ToolError};

#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("tool '{tool}' failed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolError,
    },
}

/// One parsed model turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Final(String),
    Action { tool: String, input: String },
    Unparsed,
}

const FINAL_ANSWER: &str = "Final Answer:";
const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";

fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").or_else(|| text.strip_prefix("```")).unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

fn parse_action(text: &str) -> Option<(String, String)> {
    let action_at = text.find(ACTION)?;
    let after_action = &text[action_at + ACTION.len()..];
    let tool = after_action.lines().next()?.trim();
    let tool = tool.trim_matches(|c| c == '`' || c == '"' || c == '\'').trim();
    if tool.is_empty() {
        return None;
    }

    let input_at = after_action.find(ACTION_INPUT)?;
    let input = &after_action[input_at + ACTION_INPUT.len()..];
    let end = ["\nObservation", "\nThought", "\nFinal Answer"]
        .iter()
        .filter_map(|marker| input.find(marker))
        .min()
        .unwrap_or(input.len());
    let input = &input[..end];
    Some((tool.to_string(), strip_fences(input).to_string()))
}

/// Read a ReAct-formatted response.
///
/// An action that precedes a final answer wins, since anything after the
/// action was written without having seen the tool's result.
pub fn parse_step(text: &str) -> Step {
    let final_at = text.find(FINAL_ANSWER);
    let action_at = text.find(ACTION);

    if let Some(action_at) = action_at {
        if final_at.map_or(true, |f| action_at < f) {
            if let Some((tool, input)) = parse_action(text) {
                return Step::Action { tool, input };
            }
        }
    }

    match final_at {
        Some(at) => Step::Final(text[at + FINAL_ANSWER.len()..].trim().to_string()),
        None => Step::Unparsed,
    }
}

fn log_step(verbose: bool, role: &str, what: &str, detail: &str) {
    if verbose {
        info!(agent = %role, "{}: {}", what, detail);
    } else {
        debug!(agent = %role, "{}: {}", what, detail);
    }
}

/// Drives one agent through a task until it gives a final answer
pub struct AgentExecutor {
    llm: Arc<dyn LlmProvider>,
    tools: Vec<Arc<dyn Tool>>,
    max_iterations: usize,
    verbose: bool,
}

impl AgentExecutor {
    pub fn new(llm: Arc<dyn LlmProvider>, tools: Vec<Arc<dyn Tool>>, max_iterations: usize) -> Self {
        Self {
            llm,
            tools,
            max_iterations,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn find_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name().eq_ignore_ascii_case(name))
    }

    async fn observe(&self, role: &str, tool_name: &str, input: &str) -> Result<String, AgentError> {
        let Some(tool) = self.find_tool(tool_name) else {
            let names: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
            warn!(agent = %role, tool = %tool_name, "model asked for an unknown tool");
            return Ok(format!(
                "Tool '{}' does not exist. Available tools: [{}]",
                tool_name,
                names.join(", ")
            ));
        };

        log_step(self.verbose, role, "Using tool", &format!("{} {}", tool.name(), input));
        match tool.run(input).await {
            Ok(result) => Ok(result),
            Err(e) if e.is_fatal() => Err(AgentError::Tool {
                tool: tool.name().to_string(),
                source: e,
            }),
            Err(e) => {
                warn!(agent = %role, tool = %tool.name(), "tool error: {}", e);
                Ok(format!(
                    "Error running tool {}: {}. Try again with a different input.",
                    tool.name(),
                    e
                ))
            }
        }
    }

    /// Run the agent on a rendered task prompt and return its final answer
    pub async fn execute(&self, agent: &Agent, task_prompt: String) -> Result<String, AgentError> {
        let role = agent.role.as_str();
        let mut messages = vec![
            Message::system(prompt::system_prompt(agent, &self.tools)),
            Message::user(task_prompt),
        ];
        let mut iterations = 0;

        loop {
            let forced = iterations >= self.max_iterations;
            if forced {
                debug!(agent = %role, iterations, "iteration limit reached, requesting final answer");
                messages.push(Message::user(prompt::force_final_answer()));
            }

            let text = self.llm.complete(&messages, prompt::STOP_SEQUENCES).await?;

            match parse_step(&text) {
                Step::Final(answer) => {
                    log_step(self.verbose, role, "Final Answer", &answer);
                    return Ok(answer);
                }
                _ if forced => {
                    let answer = text.trim().to_string();
                    log_step(self.verbose, role, "Final Answer", &answer);
                    return Ok(answer);
                }
                Step::Action { tool, input } => {
                    let result = self.observe(role, &tool, &input).await?;
                    messages.push(Message::assistant(text));
                    messages.push(Message::user(prompt::observation(&result)));
                }
                Step::Unparsed if self.tools.is_empty() => {
                    let answer = text.trim().to_string();
                    log_step(self.verbose, role, "Final Answer", &answer);
                    return Ok(answer);
                }
                Step::Unparsed => {
                    debug!(agent = %role, "response did not follow the protocol");
                    messages.push(Message::assistant(text));
                    messages.push(Message::user(prompt::format_reminder(&self.tools)));
                }
            }
            iterations += 1;
        }
    }
}
