//! Prompt domain
//!
//! Templates for every completion call a deliberation makes.

mod template;

pub use template::{ExpertBrief, PromptTemplate};
