mod task;

pub use task::{Task, TaskOutput};
