mod agent;
mod delegate;
mod executor;
mod prompt;

pub use agent::Agent;
pub use delegate::{Coworker, DelegateTool};
pub use executor::{AgentError, AgentExecutor};
pub use prompt::{task_prompt, CONTEXT_SEPARATOR};
