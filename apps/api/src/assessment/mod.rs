// Assessment generation and scoring.
// All completion calls go through llm_client; nothing here talks to the provider directly.

pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod scoring;
pub mod stats;
pub mod store;
pub mod validator;
