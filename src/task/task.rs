use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::template::{interpolate, PipelineInputs, TemplateError};

/// Unit of work assigned to one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique within a crew; other tasks name it in `context`
    pub name: String,
    /// Instructions, may contain `{placeholders}`
    pub description: String,
    /// Shape of the answer, given to the model as a hint only
    pub expected_output: String,
    /// Role of the assigned agent
    pub agent: String,
    /// Earlier tasks whose output this task reads
    #[serde(default)]
    pub context: Vec<String>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent: agent.into(),
            context: Vec::new(),
        }
    }

    /// Declare a dependency on an earlier task's output
    pub fn with_context(mut self, task_name: impl Into<String>) -> Self {
        self.context.push(task_name.into());
        self
    }

    /// Render description and expected output against `inputs`
    pub fn interpolate(&self, inputs: &PipelineInputs) -> Result<(String, String), TemplateError> {
        Ok((
            interpolate(&self.description, inputs)?,
            interpolate(&self.expected_output, inputs)?,
        ))
    }
}

/// Result of one executed task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    pub task: String,
    pub agent: String,
    /// Rendered description the agent worked on
    pub description: String,
    /// Final answer text, unmodified
    pub raw: String,
    /// When the agent was handed the task
    pub started_at: DateTime<Utc>,
    /// When the agent returned its final answer
    pub completed_at: DateTime<Utc>,
}
