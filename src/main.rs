use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use memorunia::{cli, config, server};

#[derive(Parser)]
#[command(name = "memorunia", version, about = "Agentic personal note workspace")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST server
    Serve,
    /// Create a note
    Add {
        title: String,
        content: String,
    },
    /// Import .md/.txt files (or directories of them) as notes
    Import {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Semantic search over all notes
    Search { query: String },
    /// Show one note in full
    Show { id: String },
    /// List notes related to one note
    Related { id: String },
    /// Delete a note
    Delete { id: String },
    /// Re-cluster all notes with the chat model
    Organize,
    /// Print the similarity graph as JSON
    Graph,
    /// Interactive agent session
    Chat,
    /// Synthesize a note's content to a WAV file
    Speak {
        id: String,
        /// Output path (defaults to <id>.wav)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Export all notes and clusters as JSON to stdout
    Export,
    /// Workspace statistics
    Stats,
    /// Delete all notes after confirmation
    Reset,
    /// Regenerate all embeddings with the current model
    ReEmbed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::MemoruniaConfig::load()?;

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for JSON output (export, graph).
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => server::serve(config).await?,
        Command::Add { title, content } => cli::add::add(&config, &title, &content).await?,
        Command::Import { paths } => cli::import::import(&config, &paths).await?,
        Command::Search { query } => cli::search::search(&config, &query).await?,
        Command::Show { id } => cli::show::show(&config, &id)?,
        Command::Related { id } => cli::related::related(&config, &id)?,
        Command::Delete { id } => cli::delete::delete(&config, &id)?,
        Command::Organize => cli::organize::organize(&config).await?,
        Command::Graph => cli::graph::graph(&config)?,
        Command::Chat => cli::chat::chat(&config).await?,
        Command::Speak { id, out } => cli::speak::speak(&config, &id, out.as_deref()).await?,
        Command::Export => cli::export::export(&config)?,
        Command::Stats => cli::stats::stats(&config)?,
        Command::Reset => cli::reset::reset(&config)?,
        Command::ReEmbed => cli::re_embed::re_embed(&config).await?,
    }

    Ok(())
}
