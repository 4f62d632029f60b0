//! Prompt domain
//!
//! Templates for the prompts built at each stage of a MOA run.

mod template;

pub use template::{PromptTemplate, RESPONSE_SEPARATOR};
