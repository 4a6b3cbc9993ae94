//! The `leafwise config` command for configuration management.

use clap::{Args, Subcommand};
use dialoguer::Password;
use leafwise_core::Config;
use std::path::Path;

use super::identify::setup::load_config;
use super::identify::LlmProvider;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Save an API key for a provider to the config file
    SetKey {
        /// Provider the key belongs to
        #[arg(value_enum)]
        provider: LlmProvider,

        /// The key (prompted for when omitted)
        key: Option<String>,

        /// Also make this provider the default
        #[arg(long)]
        default: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = load_config()?;
            let toml = config.to_toml()?;
            println!("{}", toml);
        }

        ConfigCommand::Path => {
            let path = Config::default_path();
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let config = Config::default();
            let toml = config.to_toml()?;
            std::fs::write(&path, toml)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::SetKey {
            provider,
            key,
            default,
        } => {
            if provider == LlmProvider::Ollama {
                anyhow::bail!("Ollama runs locally and does not use an API key.");
            }
            let key = match key {
                Some(key) => key,
                None => Password::new()
                    .with_prompt(format!("{} API key", provider.label()))
                    .interact()?,
            };
            if key.trim().is_empty() {
                anyhow::bail!("API key must not be empty");
            }

            let path = Config::default_path();
            save_api_key(&path, provider, key.trim(), default)?;
            println!("{} key saved to {}", provider.label(), path.display());
        }
    }

    Ok(())
}

/// Write an API key into the config file at `path`, preserving existing comments.
///
/// With `make_default`, `llm.provider` is switched to `provider` too.
pub fn save_api_key(
    path: &Path,
    provider: LlmProvider,
    key: &str,
    make_default: bool,
) -> anyhow::Result<()> {
    if provider == LlmProvider::Ollama {
        return Ok(());
    }
    edit_config(path, |doc| {
        provider_table(doc, provider)["api_key"] = toml_edit::value(key);
        if make_default {
            set_default_provider(doc, provider);
        }
    })?;
    tracing::debug!("Saved {provider} API key to {:?}", path);
    Ok(())
}

/// Make `provider` the default, optionally pinning its model.
pub fn save_default_provider(
    path: &Path,
    provider: LlmProvider,
    model: Option<&str>,
) -> anyhow::Result<()> {
    edit_config(path, |doc| {
        set_default_provider(doc, provider);
        if let Some(model) = model {
            provider_table(doc, provider)["model"] = toml_edit::value(model);
        }
    })
}

/// Apply `edit` to the TOML document at `path` and write it back.
///
/// The file is only replaced if the edited document still loads as a config.
fn edit_config(path: &Path, edit: impl FnOnce(&mut toml_edit::DocumentMut)) -> anyhow::Result<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };
    let mut doc: toml_edit::DocumentMut = content
        .parse()
        .map_err(|e| anyhow::anyhow!("Cannot edit {}: {e}", path.display()))?;

    if !doc.contains_key("llm") {
        doc["llm"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    edit(&mut doc);

    let updated = doc.to_string();
    Config::from_toml(&updated)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, updated)?;
    Ok(())
}

/// The `[llm.<provider>]` table, created if missing.
fn provider_table(doc: &mut toml_edit::DocumentMut, provider: LlmProvider) -> &mut toml_edit::Item {
    let name = provider.to_string();
    if !doc["llm"].as_table().is_some_and(|t| t.contains_key(&name)) {
        doc["llm"][name.as_str()] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    &mut doc["llm"][name.as_str()]
}

fn set_default_provider(doc: &mut toml_edit::DocumentMut, provider: LlmProvider) {
    if let Some(llm) = doc["llm"].as_table_mut() {
        llm.set_implicit(false);
    }
    doc["llm"]["provider"] = toml_edit::value(provider.to_string());
}
