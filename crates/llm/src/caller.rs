//! Unified call shape over streaming and non-streaming completion.

use crate::client::{ChatMessage, LlmClient, LlmRequest};
use futures::StreamExt;
use recall_core::AppResult;
use std::sync::Arc;

/// Callback receiving progressive full-text snapshots.
pub type OnText<'a> = &'a mut (dyn FnMut(&str) + Send);

/// One call shape over both delivery modes of a model backend.
///
/// In streaming mode fragments are accumulated in arrival order and the
/// callback observes the full accumulated text after each one — strictly
/// growing snapshots, not deltas. In non-streaming mode the callback
/// observes the complete text exactly once. Both modes return the same
/// final string for a deterministic backend.
#[derive(Clone)]
pub struct ModelCaller {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl ModelCaller {
    /// Create a caller bound to one client and model.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Get the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Issue one generation request.
    ///
    /// Faults propagate; this adapter absorbs nothing.
    pub async fn call(
        &self,
        messages: &[ChatMessage],
        streaming: bool,
        mut on_text: Option<OnText<'_>>,
    ) -> AppResult<String> {
        let request = LlmRequest::new(messages.to_vec(), &self.model);

        if streaming {
            let request = request.with_streaming();
            let mut stream = self.client.stream(&request).await?;
            let mut full_text = String::new();

            while let Some(result) = stream.next().await {
                let chunk = result?;

                if !chunk.content.is_empty() {
                    full_text.push_str(&chunk.content);
                    if let Some(cb) = on_text.as_mut() {
                        cb(&full_text);
                    }
                }

                if chunk.done {
                    break;
                }
            }

            Ok(full_text)
        } else {
            let response = self.client.complete(&request).await?;

            if let Some(cb) = on_text.as_mut() {
                cb(&response.content);
            }

            Ok(response.content)
        }
    }
}
