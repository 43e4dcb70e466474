// Resume tailoring: job classification, prompt composition, and the
// request pipeline. All model calls go through llm_client.

pub mod classifier;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
