//! Question-answering crate for Recall.
//!
//! Owns the answer-generation pipeline: validate and normalize a question
//! request, retrieve relevant episodes and facts, assemble them into a
//! context blob, ask the model for a delimited structured answer, and
//! extract it with safe textual fallbacks.
//!
//! # Example
//! ```no_run
//! use recall_llm::{ModelCaller, create_client};
//! use recall_qa::{AnswerGenerator, QaRequest};
//! use recall_retrieval::SearchClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> recall_core::AppResult<()> {
//! let retriever = Arc::new(SearchClient::new("http://localhost:8000", None)?);
//! let model = ModelCaller::new(create_client("openai", None, Some("sk-..."))?, "gpt-4.1");
//!
//! let generator = AnswerGenerator::new(retriever, model);
//! let response = generator.answer(&QaRequest::new("What color is the car?")).await?;
//! println!("{}", response.generated_answer);
//! # Ok(())
//! # }
//! ```

pub mod answer;
pub mod context;
pub mod extract;
pub mod prompt;
pub mod types;

// Re-export main types
pub use answer::AnswerGenerator;
pub use context::assemble;
pub use extract::{extract_answer, Extraction, NO_ANSWER_PROVIDED};
pub use types::{QaRequest, QaResponse, GENERATION_FAILED_ANSWER, NO_INFORMATION_ANSWER};
