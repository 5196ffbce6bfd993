//! Completion service adapters

mod openai;

pub use openai::OpenAiCompletionService;
