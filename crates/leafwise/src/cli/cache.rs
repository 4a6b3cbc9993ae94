//! The `leafwise cache` command.

use clap::{Args, Subcommand};
use leafwise_core::ResponseCache;

use super::identify::setup::load_config;

/// Arguments for the `cache` command.
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

/// Subcommands for the response cache.
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Show the cache directory
    Path,

    /// Delete every cached model response
    Clear,
}

/// Execute the cache command.
pub async fn execute(args: CacheArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    let cache = ResponseCache::new(config.cache_dir());

    match args.command {
        CacheCommand::Path => {
            println!("{}", cache.dir().display());
        }
        CacheCommand::Clear => {
            let removed = cache.clear()?;
            tracing::info!("Removed {removed} cached response(s) from {:?}", cache.dir());
            println!("Cleared {removed} cached response(s)");
        }
    }

    Ok(())
}
