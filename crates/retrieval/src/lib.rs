//! Retrieval crate for Recall.
//!
//! Wraps the remote knowledge-search service behind the [`Retriever`] trait.
//! The HTTP [`SearchClient`] owns its connection configuration for the
//! process lifetime and, by default, absorbs every operational fault into an
//! empty [`SearchResult`] — retrieval failure is deliberately
//! indistinguishable from "no relevant information found".
//!
//! # Example
//! ```no_run
//! use recall_retrieval::{Retriever, SearchClient, SearchOptions};
//!
//! # async fn example() -> recall_core::AppResult<()> {
//! let client = SearchClient::new("http://localhost:8000", None)?;
//! let result = client.search("what color is the car?", &SearchOptions::new()).await?;
//! println!("{} episodes", result.episodes.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod types;

// Re-export main types
pub use client::{Retriever, SearchClient};
pub use types::{Fact, SearchOptions, SearchResult, DEFAULT_LIMIT};
