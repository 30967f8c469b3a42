//! Interview question scraper: search the web, then tabulate what was found.

use crate::agent::Agent;
use crate::crew::{Crew, CrewError};
use crate::task::Task;
use crate::template::PipelineInputs;
use crate::tools::ToolSpec;

/// Organic results requested per search
pub const SEARCH_RESULT_COUNT: usize = 10;

pub const COLLECTOR_ROLE: &str = "Interview Question Scraper";

pub const COLLECTOR_GOAL: &str = "Search and collect latest real interview questions for Data Science roles from credible \
     platforms";

pub const COLLECTOR_BACKSTORY: &str = "You're an expert at scouring the internet for actual interview experiences shared on \
     platforms like LeetCode Discussion, AmbitionBox, LinkedIn, Glassdoor, and similar. You \
     can extract relevant questions, the company, position, and timeframe, ensuring the \
     source is trustworthy and recent.";

pub const FORMATTER_ROLE: &str = "Interview Question Formatter";

pub const FORMATTER_GOAL: &str = "Format scraped interview questions into a clean structured table with columns like \
     question, company, position, timeframe, and source.";

pub const FORMATTER_BACKSTORY: &str = "You're excellent at converting unstructured data into clean, structured Excel-style \
     tables. You ensure each row contains a complete and accurate question entry with all \
     relevant metadata.";

pub const SEARCH_TASK: &str = "search";

pub const SEARCH_DESCRIPTION: &str = "
        Search for real and recent Data Science interview questions shared by candidates online.
        Focus on well-known platforms like:
        - LeetCode Discussion
        - AmbitionBox
        - LinkedIn posts
        - Glassdoor reviews
        - Medium blogs

        For each question, try to collect:
        - The exact interview question
        - Company name
        - Role/Position (e.g., Data Scientist, ML Engineer)
        - Timeframe or post date (at least month/year)
        - Source platform (with link if possible)

        Ensure only recent posts from the past 6–12 months are included.
        Collect at least 10 relevant examples.
        ";

pub const SEARCH_EXPECTED_OUTPUT: &str = "
        A raw list of 10+ real interview questions with:
        - Question
        - Company
        - Position
        - TimeFrame
        - Source (preferably include URL)
        ";

pub const FORMAT_TASK: &str = "format";

pub const FORMAT_DESCRIPTION: &str = "
        Take the collected interview questions and format them into a markdown table or CSV-style layout
        with the following columns:
        - Question
        - Company
        - Position
        - TimeFrame
        - Source

        Ensure consistency in formatting and make sure each field is complete.
        Prefer tabular formatting for easy export to Excel later.
        ";

pub const FORMAT_EXPECTED_OUTPUT: &str = "
        A clean markdown-style or CSV-style table with headers:
        Question | Company | Position | TimeFrame | Source
        ";

pub const DEFAULT_TOPIC: &str = "Data Science Interview Questions";

pub fn question_collector() -> Agent {
    Agent::new(COLLECTOR_ROLE, COLLECTOR_GOAL, COLLECTOR_BACKSTORY)
        .with_tool(ToolSpec::web_search(SEARCH_RESULT_COUNT))
        .verbose(true)
        .allow_delegation(false)
}

pub fn question_formatter() -> Agent {
    Agent::new(FORMATTER_ROLE, FORMATTER_GOAL, FORMATTER_BACKSTORY)
        .verbose(true)
        .allow_delegation(false)
}

pub fn search_task() -> Task {
    Task::new(SEARCH_TASK, SEARCH_DESCRIPTION, SEARCH_EXPECTED_OUTPUT, COLLECTOR_ROLE)
}

pub fn formatting_task() -> Task {
    Task::new(FORMAT_TASK, FORMAT_DESCRIPTION, FORMAT_EXPECTED_OUTPUT, FORMATTER_ROLE)
        .with_context(SEARCH_TASK)
}

pub fn build() -> Result<Crew, CrewError> {
    Ok(Crew::new(
        vec![question_collector(), question_formatter()],
        vec![search_task(), formatting_task()],
    )?
    .verbose(true))
}

pub fn inputs(topic: impl Into<String>) -> PipelineInputs {
    PipelineInputs::new().with("topic", topic)
}

pub fn default_inputs() -> PipelineInputs {
    inputs(DEFAULT_TOPIC)
}
