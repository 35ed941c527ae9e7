//! Answer command handler.
//!
//! Builds the answering pipeline from configuration, runs one request
//! through it, and prints the response JSON on stdout.

use clap::Args;
use recall_core::{config::AppConfig, AppResult};
use recall_llm::{create_client, ModelCaller};
use recall_qa::{AnswerGenerator, QaRequest};
use recall_retrieval::SearchClient;
use std::sync::Arc;

/// Answer a question against the memory service
#[derive(Args, Debug)]
pub struct AnswerCommand {
    /// The question to answer
    pub question: String,

    /// Only consider items valid after this time (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub start_time: Option<String>,

    /// Only consider items valid before this time
    #[arg(long)]
    pub end_time: Option<String>,

    /// Memory space to search
    #[arg(long)]
    pub space_id: Option<String>,

    /// Maximum number of retrieved items (default: 20)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Graph traversal depth cap
    #[arg(long)]
    pub max_bfs_depth: Option<u32>,

    /// Include facts that have since been invalidated
    #[arg(long)]
    pub include_invalidated: bool,

    /// Restrict matches to an entity type (repeatable)
    #[arg(long = "entity-type")]
    pub entity_types: Vec<String>,

    /// Minimum relevance score
    #[arg(long)]
    pub score_threshold: Option<f64>,

    /// Lower bound on the result count
    #[arg(long)]
    pub min_results: Option<u32>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pub pretty: bool,
}

impl AnswerCommand {
    /// Execute the answer command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing answer command");
        config.validate()?;

        let retriever = Arc::new(SearchClient::new(
            &config.search_endpoint,
            config.search_api_key.clone(),
        )?);

        let client = create_client(
            &config.provider,
            config.model_endpoint.as_deref(),
            config.model_api_key.as_deref(),
        )?;
        let model = ModelCaller::new(client, &config.model);

        let generator = AnswerGenerator::new(retriever, model);
        let response = generator.answer(&self.to_request()).await?;

        let json = if self.pretty {
            serde_json::to_string_pretty(&response)?
        } else {
            serde_json::to_string(&response)?
        };
        println!("{}", json);

        Ok(())
    }

    /// Map CLI flags onto a pipeline request.
    fn to_request(&self) -> QaRequest {
        QaRequest {
            question: self.question.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            space_id: self.space_id.clone(),
            limit: self.limit,
            max_bfs_depth: self.max_bfs_depth,
            include_invalidated: self.include_invalidated.then_some(true),
            entity_types: (!self.entity_types.is_empty()).then(|| self.entity_types.clone()),
            score_threshold: self.score_threshold,
            min_results: self.min_results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(question: &str) -> AnswerCommand {
        AnswerCommand {
            question: question.to_string(),
            start_time: None,
            end_time: None,
            space_id: None,
            limit: None,
            max_bfs_depth: None,
            include_invalidated: false,
            entity_types: Vec::new(),
            score_threshold: None,
            min_results: None,
            pretty: false,
        }
    }

    #[test]
    fn test_to_request_minimal() {
        let request = command("What color is the car?").to_request();
        assert_eq!(request.question, "What color is the car?");
        assert!(request.start_time.is_none());
        assert!(request.include_invalidated.is_none());
        assert!(request.entity_types.is_none());
    }

    #[test]
    fn test_to_request_full() {
        let mut cmd = command("what happened?");
        cmd.start_time = Some("2024-01-01".to_string());
        cmd.limit = Some(5);
        cmd.include_invalidated = true;
        cmd.entity_types = vec!["Person".to_string()];

        let request = cmd.to_request();
        assert_eq!(request.start_time.as_deref(), Some("2024-01-01"));
        assert_eq!(request.limit, Some(5));
        assert_eq!(request.include_invalidated, Some(true));
        assert_eq!(request.entity_types.as_deref(), Some(&["Person".to_string()][..]));
    }
}
