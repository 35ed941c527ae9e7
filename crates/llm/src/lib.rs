//! LLM integration crate for Recall.
//!
//! This crate provides a provider-agnostic abstraction for interacting with
//! Large Language Models through a unified trait-based interface, plus the
//! [`ModelCaller`] adapter that folds streaming and non-streaming delivery
//! into one call shape.
//!
//! # Providers
//! - **OpenAI**: chat-completions API (and compatible backends)
//!
//! # Example
//! ```no_run
//! use recall_llm::{ChatMessage, ModelCaller, providers::OpenAiClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> recall_core::AppResult<()> {
//! let client = Arc::new(OpenAiClient::new("sk-...")?);
//! let caller = ModelCaller::new(client, "gpt-4.1");
//!
//! let messages = vec![ChatMessage::user("Hello, world!")];
//! let text = caller.call(&messages, false, None).await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod caller;
pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use caller::{ModelCaller, OnText};
pub use client::{
    ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmStream, LlmStreamChunk, LlmUsage, Role,
};
pub use factory::create_client;
pub use providers::OpenAiClient;
