use serde::{Deserialize, Serialize};

use crate::template::{interpolate, PipelineInputs, TemplateError};
use crate::tools::ToolSpec;

/// Role-playing LLM configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique within a crew; tasks refer to agents by role
    pub role: String,
    /// May contain `{placeholders}`
    pub goal: String,
    pub backstory: String,
    #[serde(default)]
    pub tools: Vec<ToolSpec>,
    #[serde(default)]
    pub allow_delegation: bool,
    #[serde(default)]
    pub verbose: bool,
    /// Overrides the crew-wide iteration limit
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            tools: Vec::new(),
            allow_delegation: false,
            verbose: false,
            max_iterations: None,
        }
    }

    /// Attach a tool the agent may call while working
    pub fn with_tool(mut self, tool: ToolSpec) -> Self {
        self.tools.push(tool);
        self
    }

    /// Let the agent hand work to the other agents in its crew
    pub fn allow_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    /// Log the agent's steps at info level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Cap tool round-trips before a final answer is forced
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    /// Copy with every text field rendered against `inputs`
    pub fn interpolate(&self, inputs: &PipelineInputs) -> Result<Self, TemplateError> {
        Ok(Self {
            role: interpolate(&self.role, inputs)?,
            goal: interpolate(&self.goal, inputs)?,
            backstory: interpolate(&self.backstory, inputs)?,
            ..self.clone()
        })
    }
}
