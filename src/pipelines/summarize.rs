//! Topic summarizer: one agent condenses a block of text into interview notes.

use crate::agent::Agent;
use crate::crew::{Crew, CrewError};
use crate::task::Task;
use crate::template::PipelineInputs;

pub const ROLE: &str = "AI Topic Summarizer";

pub const GOAL: &str = "Create clear, structured summaries of complex data science {topic} for interview \
     preparation";

pub const BACKSTORY: &str = "You are an expert at breaking down technical topics into concise, easy-to-understand \
     summaries. You highlight key concepts, use bullet points, and maintain interview \
     relevance.";

pub const TASK_NAME: &str = "summarize";

pub const DESCRIPTION: &str = "
        Your task is to read and understand the following topic content:
        {topic_content}

        Then, generate a concise summary that includes:
        1. One-paragraph overview of the topic
        2. Key points (3-7 bullets)
        3. Real-world example or analogy (if applicable)
        4. A final 1-line takeaway
        ";

pub const EXPECTED_OUTPUT: &str = "
        A markdown-formatted summary including:
        - **Overview**
        - **Key Points**
        - **Example**
        - **Final Takeaway**
        ";

pub const DEFAULT_TOPIC: &str = "Basics of SQL";

pub const DEFAULT_TOPIC_CONTENT: &str = "\nStructured Query Language (SQL) is the standard language used to communicate with and \
     manipulate relational databases. It allows users to retrieve, insert, update, delete, \
     and manage data with high precision and efficiency. SQL is declarative, meaning users \
     specify what they want, and the database engine figures out how to execute it. It’s the \
     backbone of data analysis, data engineering, and backend development in systems like \
     MySQL, PostgreSQL, Oracle, MS SQL Server, and SQLite. SQL is composed of several \
     sub-languages: DDL (Data Definition Language) for creating or altering tables (CREATE, \
     ALTER, DROP), DML (Data Manipulation Language) for changing data (INSERT, UPDATE, \
     DELETE), DQL (Data Query Language) for querying (SELECT), DCL (Data Control Language) \
     for permissions (GRANT, REVOKE), and TCL (Transaction Control Language) for managing \
     transactions (COMMIT, ROLLBACK). At its core, SQL uses tables, rows, and columns to \
     organize data in a structured, normalized way—often leveraging primary keys, foreign \
     keys, and indexes to optimize relational integrity and performance. Common operations \
     include filtering (WHERE), sorting (ORDER BY), grouping (GROUP BY), joining tables \
     (JOIN, LEFT JOIN, RIGHT JOIN, FULL OUTER JOIN, CROSS JOIN), and aggregations (COUNT, \
     SUM, AVG, MIN, MAX). Advanced queries may use subqueries, window functions \
     (ROW_NUMBER(), RANK(), LEAD(), LAG()), Common Table Expressions (CTEs), recursive \
     queries, and views for abstraction and readability. In analytics and interviews, SQL is \
     a core skill tested for roles like data analyst, data scientist, and business \
     intelligence engineer, especially in scenarios involving customer segmentation, funnel \
     analysis, A/B testing, and cohort tracking. Optimization techniques, such as using \
     appropriate indexes, avoiding N+1 queries, and using EXPLAIN plans, are vital for \
     scaling large datasets. Despite being around since the 1970s, SQL continues to thrive \
     due to its combination of simplicity and power, its ANSI standardization, and its tight \
     integration with modern ecosystems like Python (via libraries like pandasql or \
     SQLAlchemy), data visualization tools (e.g., Tableau, Power BI), and cloud platforms \
     (BigQuery, Snowflake, Redshift). While NoSQL alternatives like MongoDB or Cassandra \
     exist, relational databases and SQL remain dominant in business applications where data \
     consistency, complex querying, and structured schemas are crucial. In interview \
     settings, candidates are often tested on real-world SQL problems involving joins, nested \
     queries, filtering conditions, date manipulation (DATE_TRUNC, DATE_ADD, DATEDIFF), and \
     even writing queries from scratch based on vague business scenarios. Therefore, \
     mastering SQL not only demonstrates data literacy but also the ability to think \
     analytically, debug logically, and optimize performance. Whether you're diagnosing churn \
     patterns, evaluating ad campaign success, or building dashboards, SQL is the fundamental \
     language of structured data and will remain a non-negotiable skill in the data world for \
     years to come.\n";

pub fn summarizer_agent() -> Agent {
    Agent::new(ROLE, GOAL, BACKSTORY)
        .allow_delegation(false)
        .verbose(true)
}

pub fn summarize_task() -> Task {
    Task::new(TASK_NAME, DESCRIPTION, EXPECTED_OUTPUT, ROLE)
}

pub fn build() -> Result<Crew, CrewError> {
    Ok(Crew::new(vec![summarizer_agent()], vec![summarize_task()])?.verbose(true))
}

pub fn inputs(topic: impl Into<String>, topic_content: impl Into<String>) -> PipelineInputs {
    PipelineInputs::new()
        .with("topic", topic)
        .with("topic_content", topic_content)
}

pub fn default_inputs() -> PipelineInputs {
    inputs(DEFAULT_TOPIC, DEFAULT_TOPIC_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{runtime, EchoLlm, ScriptedLlm};
    use std::sync::Arc;

    #[test]
    fn test_summarizer_agent_fields() {
        let agent = summarizer_agent();
        assert_eq!(agent.role, "AI Topic Summarizer");
        assert_eq!(
            agent.goal,
            concat!(
                "Create clear, structured summaries of complex data science {topic} ",
                "for interview preparation",
            )
        );
        assert_eq!(
            agent.backstory,
            concat!(
                "You are an expert at breaking down technical topics into concise, ",
                "easy-to-understand summaries. You highlight key concepts, use bullet ",
                "points, and maintain interview relevance.",
            )
        );
        assert!(!agent.allow_delegation);
        assert!(agent.verbose);
        assert!(agent.tools.is_empty());
    }

    #[test]
    fn test_summarize_task_fields() {
        let task = summarize_task();
        assert_eq!(task.name, "summarize");
        assert_eq!(task.agent, "AI Topic Summarizer");
        assert_eq!(
            task.description,
            concat!(
                "\n",
                "        Your task is to read and understand the following topic content:\n",
                "        {topic_content}\n",
                "\n",
                "        Then, generate a concise summary that includes:\n",
                "        1. One-paragraph overview of the topic\n",
                "        2. Key points (3-7 bullets)\n",
                "        3. Real-world example or analogy (if applicable)\n",
                "        4. A final 1-line takeaway\n",
                "        ",
            )
        );
        assert_eq!(
            task.expected_output,
            concat!(
                "\n",
                "        A markdown-formatted summary including:\n",
                "        - **Overview**\n",
                "        - **Key Points**\n",
                "        - **Example**\n",
                "        - **Final Takeaway**\n",
                "        ",
            )
        );
        assert!(task.context.is_empty());
    }

    #[test]
    fn test_task_agent_resolves() {
        let crew = build().unwrap();
        let task = &crew.tasks()[0];
        assert_eq!(crew.agent_for(task).map(|a| a.role.as_str()), Some(ROLE));
    }

    #[tokio::test]
    async fn test_default_inputs_render_every_placeholder() {
        let inputs = default_inputs();
        assert_eq!(inputs.get("topic"), Some("Basics of SQL"));
        assert!(inputs.get("topic_content").unwrap().contains("Structured Query Language (SQL)"));

        let llm = Arc::new(ScriptedLlm::new(&["Final Answer: summary"]));
        let output = build().unwrap().kickoff(&runtime(llm.clone()), &inputs).await.unwrap();
        assert_eq!(output.raw, "summary");

        let seen = llm.seen.lock().unwrap();
        assert!(seen[0][0].content.contains("data science Basics of SQL for interview"));
        assert!(seen[0][1].content.contains("SQL is declarative"));
        assert!(!seen[0][1].content.contains("{topic_content}"));
    }

    #[tokio::test]
    async fn test_echo_run_contains_both_inputs() {
        let crew = build().unwrap();
        let output = crew
            .kickoff(&runtime(Arc::new(EchoLlm)), &inputs("X-topic", "Y-content"))
            .await
            .unwrap();
        assert!(output.raw.contains("X-topic"));
        assert!(output.raw.contains("Y-content"));
    }
}
