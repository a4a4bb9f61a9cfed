pub mod content;
pub mod education;
pub mod grading;
pub mod handlers;
pub mod objective;
pub mod prompts;
pub mod scorer;
pub mod technical;
