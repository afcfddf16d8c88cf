// Admissions features: chance estimates, question fields, plans, essay feedback, chat.
// All model calls go through llm_client; reply parsing lives in crate::parsing.

pub mod handlers;
pub mod prompts;
