//! Answer-generation orchestration.
//!
//! Drives one request through validation, retrieval, context assembly,
//! generation, and extraction. Only request validation faults propagate;
//! every operational fault in the generation phase degrades to a canned
//! answer unless strict mode is enabled.

use crate::context::assemble;
use crate::extract::{extract_answer, Extraction};
use crate::prompt::build_messages;
use crate::types::{QaRequest, QaResponse};
use recall_core::AppResult;
use recall_llm::ModelCaller;
use recall_retrieval::Retriever;
use std::sync::Arc;

/// The answering pipeline.
///
/// Holds one retriever and one model caller for its lifetime; each
/// [`answer`](AnswerGenerator::answer) call is an independent unit of work
/// with no state shared between invocations.
pub struct AnswerGenerator {
    retriever: Arc<dyn Retriever>,
    model: ModelCaller,
    degrade_on_fault: bool,
}

impl AnswerGenerator {
    /// Create a generator with fault absorption enabled.
    pub fn new(retriever: Arc<dyn Retriever>, model: ModelCaller) -> Self {
        Self {
            retriever,
            model,
            degrade_on_fault: true,
        }
    }

    /// Disable fault absorption: generation faults propagate as errors
    /// instead of degrading to the canned answer.
    pub fn strict(mut self) -> Self {
        self.degrade_on_fault = false;
        self
    }

    /// Answer one question.
    ///
    /// Retrieval strictly precedes generation since the prompt depends on
    /// the retrieved context. Returns a populated response for every
    /// operational outcome; only an invalid request is an error.
    pub async fn answer(&self, request: &QaRequest) -> AppResult<QaResponse> {
        request.validate()?;
        let options = request.to_search_options()?;

        tracing::info!("Answering question: {}", request.question);

        let result = self.retriever.search(&request.question, &options).await?;

        let context = assemble(&result);
        if context.trim().is_empty() {
            // Never ask the model to answer from nothing
            tracing::info!("No usable context retrieved; skipping generation");
            return Ok(QaResponse::no_information(&request.question));
        }

        tracing::debug!("Assembled {} bytes of context", context.len());

        let generated_answer = match self.generate(&context, &request.question).await {
            Ok(answer) => answer,
            Err(e) if self.degrade_on_fault => {
                tracing::error!("Error generating answer: {}", e);
                return Ok(QaResponse::generation_failed(&request.question));
            }
            Err(e) => return Err(e),
        };

        Ok(QaResponse::new(&request.question, generated_answer))
    }

    /// Run the generation phase: prompt, model call, extraction.
    async fn generate(&self, context: &str, question: &str) -> AppResult<String> {
        let messages = build_messages(context, question);

        let response_text = self.model.call(&messages, false, None).await?;

        Ok(match extract_answer(&response_text) {
            Extraction::Parsed(answer) => answer,
            Extraction::RawFallback(text) => text,
            // An undelimited response is still the model's best effort
            Extraction::NotFound => response_text.trim().to_string(),
        })
    }
}
