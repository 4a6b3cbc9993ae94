//! LeafWise CLI - identify plants from photos and get care tips from a vision LLM.
//!
//! # Usage
//!
//! ```bash
//! # Identify a single photo
//! leafwise identify fern.jpg
//!
//! # Identify a folder, streaming JSON lines to a file
//! leafwise identify ./garden/ --format jsonl --output plants.jsonl
//!
//! # Description and care tips for a plant you already know
//! leafwise lookup "Monstera" --scientific-name "Monstera deliciosa"
//!
//! # Store an API key
//! leafwise config set-key anthropic --default
//! ```
//!
//! Running `leafwise` with no subcommand on a terminal starts the guided mode.

use clap::{CommandFactory, Parser, Subcommand};

mod cli;
mod logging;

/// LeafWise - identify plants from photos and get care tips.
#[derive(Parser, Debug)]
#[command(name = "leafwise")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Identify the plant in a photo, or every photo in a folder
    Identify(cli::identify::IdentifyArgs),

    /// Describe a plant by name and suggest care tips
    Lookup(cli::lookup::LookupArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),

    /// Manage the model response cache
    Cache(cli::cache::CacheArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't up yet, so config problems go straight to stderr
    let config = match leafwise_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `leafwise config path`."
            );
            leafwise_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("LeafWise v{}", leafwise_core::VERSION);

    match cli.command {
        Some(Commands::Identify(args)) => cli::identify::execute(args).await,
        Some(Commands::Lookup(args)) => cli::lookup::execute(args).await,
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        Some(Commands::Cache(args)) => cli::cache::execute(args).await,
        None => {
            if console::Term::stderr().is_term() && console::user_attended() {
                cli::interactive::run(&config).await
            } else {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}
