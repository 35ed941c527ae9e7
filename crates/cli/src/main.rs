//! Recall CLI
//!
//! Main entry point for the recall command-line tool. Provides commands
//! for retrieval-augmented question answering over a remote memory
//! service.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AnswerCommand, SearchCommand};
use recall_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Recall CLI - retrieval-augmented question answering
#[derive(Parser, Debug)]
#[command(name = "recall")]
#[command(about = "Retrieval-augmented question answering", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "RECALL_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Model provider (openai)
    #[arg(short, long, global = true, env = "RECALL_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "RECALL_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a question against the memory service
    Answer(AnswerCommand),

    /// Query the search backend directly
    Search(SearchCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration, then apply CLI overrides
    let config = AppConfig::load_from(cli.config)?;
    let config = config.with_overrides(
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Recall CLI starting");
    tracing::debug!("Search endpoint: {}", config.search_endpoint);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Answer(_) => "answer",
        Commands::Search(_) => "search",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Answer(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
