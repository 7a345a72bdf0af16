//! LLM provider implementations.

pub mod gemini;
pub mod mock;
pub mod ollama;

#[cfg(test)]
pub(crate) mod test_server;

pub use gemini::GeminiClient;
pub use mock::MockClient;
pub use ollama::OllamaClient;
