//! docchat CLI
//!
//! Main entry point for the docchat command-line tool: ask questions about
//! a folder of documents, grounded in retrieved context or as open chat.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand};
use docchat_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// docchat - question answering over your documents
#[derive(Parser, Debug)]
#[command(name = "docchat")]
#[command(about = "Question answering over a folder of documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: docchat.yaml)
    #[arg(short, long, global = true, env = "DOCCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Answer-generation provider (ollama, openai)
    #[arg(short, long, global = true, env = "DOCCHAT_PROVIDER")]
    provider: Option<String>,

    /// Generation model identifier
    #[arg(short, long, global = true, env = "DOCCHAT_MODEL")]
    model: Option<String>,

    /// Embedding provider (trigram, ollama, openai)
    #[arg(long, global = true, env = "DOCCHAT_EMBEDDING_PROVIDER")]
    embedding_provider: Option<String>,

    /// Embedding model identifier
    #[arg(long, global = true, env = "DOCCHAT_EMBEDDING_MODEL")]
    embedding_model: Option<String>,

    /// Custom endpoint URL for local providers
    #[arg(long, global = true, env = "DOCCHAT_ENDPOINT")]
    endpoint: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive chat over a folder of documents
    Chat(ChatCommand),

    /// Ask a single question and exit
    Ask(AskCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // Load base configuration from the config file and environment
    let config = AppConfig::load_from(cli.config.clone())?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.provider,
        cli.model,
        cli.embedding_provider,
        cli.embedding_model,
        cli.endpoint,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("Provider: {} ({})", config.provider, config.model);
    tracing::debug!(
        "Embedding provider: {} ({})",
        config.embedding_provider,
        config.embedding_model
    );

    let result = match cli.command {
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
    };

    if let Err(ref e) = result {
        tracing::error!("Command failed: {}", e);
    }

    result
}
