// Tailoring and cover-letter generation.
// Model calls go through `llm_client::CompletionClient`; rendering and compilation
// are delegated to `render` and `compile`.

pub mod generator;
pub mod handlers;
pub mod prompts;
