//! Command handlers for the Recall CLI.

mod answer;
mod search;

pub use answer::AnswerCommand;
pub use search::SearchCommand;
