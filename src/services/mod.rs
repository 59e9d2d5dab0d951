pub mod grading;
pub mod llm_provider;
pub mod persistence;
pub mod prompt;
