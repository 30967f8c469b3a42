//! Role-based LLM agent crews: agents with a persona, tasks with an expected
//! output, and a sequential orchestrator that runs them against an LLM and a
//! web search provider.

pub mod agent;
pub mod config;
pub mod crew;
pub mod llm;
pub mod output;
pub mod pipelines;
pub mod task;
pub mod template;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;
