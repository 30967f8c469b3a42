use std::fmt::Write as _;
use std::sync::Arc;

use super::Agent;
use crate::tools::Tool;

/// Generation halts here so the executor, not the model, supplies observations
pub const STOP_SEQUENCES: &[&str] = &["\nObservation:"];

/// Separator between outputs of earlier tasks handed on as context
pub const CONTEXT_SEPARATOR: &str = "\n\n----------\n\n";

/// Persona plus the response protocol the executor parses
pub fn system_prompt(agent: &Agent, tools: &[Arc<dyn Tool>]) -> String {
    let mut prompt = format!(
        "You are {}. {}\nYour personal goal is: {}",
        agent.role, agent.backstory, agent.goal
    );

    if tools.is_empty() {
        prompt.push_str(
            r#"

To give your best complete final answer to the task, respond using exactly this format:

Thought: I now can give a great answer
Final Answer: your complete final answer, as described by the expected criteria.

You MUST use this format."#,
        );
        return prompt;
    }

    prompt.push_str(
        "\n\nYou ONLY have access to the following tools, and must never make up tools that are not listed here:\n\n",
    );
    for tool in tools {
        let _ = writeln!(
            prompt,
            "Tool Name: {}\nTool Arguments: {}\nTool Description: {}\n",
            tool.name(),
            tool.input_schema(),
            tool.description()
        );
    }

    let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
    let _ = write!(
        prompt,
        r#"Use the following format:

Thought: think about what to do next
Action: the action to take, exactly one of [{}]
Action Input: the input to the action, a JSON object using " to wrap keys and values
Observation: the result of the action

Repeat Thought/Action/Action Input/Observation as needed. Once you know the answer, respond with:

Thought: I now know the final answer
Final Answer: your complete final answer, as described by the expected criteria."#,
        names.join(", ")
    );
    prompt
}

/// The task itself, its expected output, and any context from earlier tasks
pub fn task_prompt(description: &str, expected_output: &str, context: Option<&str>) -> String {
    let mut prompt = format!(
        "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\nYou MUST return the actual complete content as the final answer, not a summary.",
        description.trim(),
        expected_output.trim()
    );

    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        let _ = write!(prompt, "\n\nThis is the context you're working with:\n{}", context);
    }

    prompt.push_str("\n\nBegin! Use the tools available if you need them and give your best Final Answer.\n\nThought:");
    prompt
}

pub fn observation(result: &str) -> String {
    format!("Observation: {}", result.trim_end())
}

pub fn format_reminder(tools: &[Arc<dyn Tool>]) -> String {
    let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
    format!(
        "Invalid format. Either use a tool with `Action:` (one of [{}]) and `Action Input:`, or give your answer after `Final Answer:`.",
        names.join(", ")
    )
}

pub fn force_final_answer() -> String {
    "You have used the tools enough. Now you MUST give your absolute best final answer using everything gathered so far.\n\nFinal Answer:".to_string()
}
