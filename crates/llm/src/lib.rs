//! LLM integration crate for Pravah.
//!
//! Provider-agnostic access to the hosted model that executes prompt flows.
//!
//! # Providers
//! - **Ollama**: local LLM runtime (default)
//! - **Gemini**: Google's hosted `generateContent` API
//! - **Mock**: scripted in-process client
//!
//! # Example
//! ```no_run
//! use pravah_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GeminiClient, MockClient, OllamaClient};
pub use types::ProviderType;
