pub mod interview;
pub mod summarize;
