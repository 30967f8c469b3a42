mod runtime;

pub use runtime::Runtime;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::agent::{task_prompt, Agent, AgentError, AgentExecutor, Coworker, DelegateTool, CONTEXT_SEPARATOR};
use crate::task::{Task, TaskOutput};
use crate::template::{PipelineInputs, TemplateError};
use crate::tools::Tool;

#[derive(Error, Debug)]
pub enum CrewError {
    #[error("crew has no tasks")]
    NoTasks,

    #[error("agent role '{0}' is defined more than once")]
    DuplicateAgent(String),

    #[error("task name '{0}' is defined more than once")]
    DuplicateTask(String),

    #[error("task '{task}' is assigned to unknown agent '{agent}'")]
    UnknownAgent { task: String, agent: String },

    #[error("task '{task}' reads context from '{context}', which is not an earlier task")]
    InvalidContext { task: String, context: String },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("task '{task}' ({agent}) failed: {source}")]
    Agent {
        task: String,
        agent: String,
        #[source]
        source: AgentError,
    },
}

/// Agents and the tasks they run, in order
#[derive(Debug, Clone, Serialize)]
pub struct Crew {
    agents: Vec<Agent>,
    tasks: Vec<Task>,
    verbose: bool,
}

impl Crew {
    /// Validate and assemble a crew
    pub fn new(agents: Vec<Agent>, tasks: Vec<Task>) -> Result<Self, CrewError> {
        if tasks.is_empty() {
            return Err(CrewError::NoTasks);
        }

        let mut roles = HashSet::new();
        for agent in &agents {
            if !roles.insert(agent.role.as_str()) {
                return Err(CrewError::DuplicateAgent(agent.role.clone()));
            }
        }

        let mut earlier: HashSet<&str> = HashSet::new();
        for task in &tasks {
            if !roles.contains(task.agent.as_str()) {
                return Err(CrewError::UnknownAgent {
                    task: task.name.clone(),
                    agent: task.agent.clone(),
                });
            }
            if let Some(bad) = task.context.iter().find(|c| !earlier.contains(c.as_str())) {
                return Err(CrewError::InvalidContext {
                    task: task.name.clone(),
                    context: bad.clone(),
                });
            }
            if !earlier.insert(task.name.as_str()) {
                return Err(CrewError::DuplicateTask(task.name.clone()));
            }
        }

        Ok(Self {
            agents,
            tasks,
            verbose: false,
        })
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Agent a task is assigned to
    pub fn agent_for(&self, task: &Task) -> Option<&Agent> {
        self.agents.iter().find(|a| a.role == task.agent)
    }

    fn tools_for(&self, agent: &Agent, all: &[Agent], runtime: &Runtime) -> Vec<Arc<dyn Tool>> {
        let mut tools = runtime.resolve_tools(&agent.tools);

        if agent.allow_delegation {
            let coworkers: Vec<Coworker> = all
                .iter()
                .filter(|a| a.role != agent.role)
                .map(|a| Coworker {
                    agent: a.clone(),
                    tools: runtime.resolve_tools(&a.tools),
                })
                .collect();
            if !coworkers.is_empty() {
                tools.push(Arc::new(DelegateTool::new(
                    runtime.llm.clone(),
                    coworkers,
                    runtime.max_iterations,
                )));
            }
        }
        tools
    }

    /// Run every task in order and return the last task's output.
    ///
    /// All templates are rendered before the first model call, so a missing
    /// input fails without touching any provider.
    pub async fn kickoff(&self, runtime: &Runtime, inputs: &PipelineInputs) -> Result<CrewOutput, CrewError> {
        let agents = self
            .agents
            .iter()
            .map(|a| a.interpolate(inputs))
            .collect::<Result<Vec<_>, _>>()?;
        let rendered = self
            .tasks
            .iter()
            .map(|t| t.interpolate(inputs))
            .collect::<Result<Vec<_>, _>>()?;

        let run_id = format!("crew-{}", &Uuid::new_v4().simple().to_string()[..8]);
        info!(
            %run_id,
            model = %runtime.llm.model(),
            tasks = self.tasks.len(),
            %inputs,
            "crew kickoff"
        );

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());

        for (task, (description, expected_output)) in self.tasks.iter().zip(rendered) {
            // Tasks name agents by their unrendered role
            let agent = self
                .agent_for(task)
                .ok_or_else(|| CrewError::UnknownAgent {
                    task: task.name.clone(),
                    agent: task.agent.clone(),
                })?
                .interpolate(inputs)?;
            let agent = &agent;

            let context = context_for(task, &outputs);
            let verbose = self.verbose || runtime.verbose || agent.verbose;
            if verbose {
                info!(task = %task.name, agent = %agent.role, "task started");
            } else {
                debug!(task = %task.name, agent = %agent.role, "task started");
            }

            let executor = AgentExecutor::new(
                runtime.llm.clone(),
                self.tools_for(agent, &agents, runtime),
                agent.max_iterations.unwrap_or(runtime.max_iterations),
            )
            .verbose(verbose);

            let started_at = chrono::Utc::now();
            let raw = executor
                .execute(agent, task_prompt(&description, &expected_output, context.as_deref()))
                .await
                .map_err(|source| CrewError::Agent {
                    task: task.name.clone(),
                    agent: agent.role.clone(),
                    source,
                })?;

            outputs.push(TaskOutput {
                task: task.name.clone(),
                agent: agent.role.clone(),
                description,
                raw,
                started_at,
                completed_at: chrono::Utc::now(),
            });
        }

        let raw = outputs.last().map(|o| o.raw.clone()).unwrap_or_default();
        info!(%run_id, "crew finished");
        Ok(CrewOutput {
            run_id,
            raw,
            tasks_output: outputs,
        })
    }
}

/// Outputs of the tasks `task` reads, or of every earlier task if it names none
fn context_for(task: &Task, outputs: &[TaskOutput]) -> Option<String> {
    let selected: Vec<&str> = if task.context.is_empty() {
        outputs.iter().map(|o| o.raw.as_str()).collect()
    } else {
        task.context
            .iter()
            .filter_map(|name| outputs.iter().find(|o| &o.task == name))
            .map(|o| o.raw.as_str())
            .collect()
    };

    if selected.is_empty() {
        None
    } else {
        Some(selected.join(CONTEXT_SEPARATOR))
    }
}

/// What a kickoff returns; displays as the final task's raw text
#[derive(Debug, Clone, Serialize)]
pub struct CrewOutput {
    pub run_id: String,
    pub raw: String,
    pub tasks_output: Vec<TaskOutput>,
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
