//! Search command handler.
//!
//! Exposes the retrieval collaborator directly: one query in, the shaped
//! result JSON out. Useful for inspecting what the answering pipeline
//! would see as context.

use clap::Args;
use recall_core::{config::AppConfig, AppResult};
use recall_retrieval::{Retriever, SearchClient, SearchOptions};

/// Query the search backend directly
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// The search query
    pub query: String,

    /// Maximum number of results (default: 20)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Memory space to search
    #[arg(long)]
    pub space_id: Option<String>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}

impl SearchCommand {
    /// Execute the search command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let client = SearchClient::new(
            &config.search_endpoint,
            config.search_api_key.clone(),
        )?;

        let mut options = SearchOptions::new();
        if let Some(limit) = self.limit {
            options = options.with_limit(limit);
        }
        if let Some(ref space_id) = self.space_id {
            options = options.with_space(space_id);
        }

        let result = client.search(&self.query, &options).await?;

        let json = if self.pretty {
            serde_json::to_string_pretty(&result)?
        } else {
            serde_json::to_string(&result)?
        };
        println!("{}", json);

        Ok(())
    }
}
