// Advisor: résumé diagnosis and rewriting.
// All LLM calls go through llm_client; no direct HTTP calls here.

pub mod diagnosis;
pub mod handlers;
pub mod models;
pub mod optimizer;
pub mod preview;
pub mod prompts;
