mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use semantix::config::SemantixConfig;
use semantix::selection::{EntryId, MarkerType};

#[derive(Parser)]
#[command(name = "semantix", version, about = "Semantic world info for SillyTavern lore books")]
struct Cli {
    /// Config file (defaults to ~/.semantix/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply markers to a lore book and show the resulting selection
    Select {
        /// Lore book JSON export
        book: PathBuf,
        /// Marker to apply, in order, as `start:<uid>` or `end:<uid>`
        #[arg(long = "mark", value_parser = cli::parse_mark)]
        marks: Vec<(MarkerType, EntryId)>,
    },
    /// Apply markers and send the selected range to the backend
    Vectorize {
        /// Lore book JSON export
        book: PathBuf,
        /// Marker to apply, in order, as `start:<uid>` or `end:<uid>`
        #[arg(long = "mark", value_parser = cli::parse_mark)]
        marks: Vec<(MarkerType, EntryId)>,
    },
    /// Search a lore book's collection on the backend
    Search {
        query: String,
        /// Lore book name (collection is `<prefix><name>`)
        #[arg(long)]
        lorebook: String,
        /// Maximum number of results (defaults to interceptor.limit)
        #[arg(long)]
        limit: Option<usize>,
        /// Disable reranking
        #[arg(long)]
        no_rerank: bool,
    },
    /// Run the generation interceptor over a chat file and print the result
    Inject {
        /// Active lore book name
        #[arg(long)]
        lorebook: Option<String>,
        /// Chat history as a JSON array of messages
        #[arg(long)]
        chat: PathBuf,
        /// Prompt text (prompt convention only)
        #[arg(long, default_value = "")]
        prompt: String,
        /// Context size reported to the interceptor (chat convention only)
        #[arg(long, default_value_t = 4096)]
        context_size: usize,
    },
    /// Print the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SemantixConfig::load_from(path)?,
        None => SemantixConfig::load()?,
    };

    // Log to stderr so stdout carries command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Select { book, marks } => cli::select::select(&book, &marks)?,
        Command::Vectorize { book, marks } => {
            cli::vectorize::vectorize(&config, &book, &marks).await?
        }
        Command::Search {
            query,
            lorebook,
            limit,
            no_rerank,
        } => cli::search::search(&config, &query, &lorebook, limit, !no_rerank).await?,
        Command::Inject {
            lorebook,
            chat,
            prompt,
            context_size,
        } => {
            cli::inject::inject(&config, lorebook.as_deref(), &chat, prompt, context_size).await?
        }
        Command::Config => cli::show_config::show_config(&config)?,
    }

    Ok(())
}
