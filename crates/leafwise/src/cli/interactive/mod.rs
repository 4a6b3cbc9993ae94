//! Interactive mode: the menu shown for a bare `leafwise` on a terminal.
//!
//! Every menu entry delegates to the same code as the flag-based commands.

pub mod identify;
pub mod setup;
pub mod theme;

use console::Style;
use dialoguer::Select;
use leafwise_core::Config;

use crate::cli::identify::LlmProvider;

/// Map a dialoguer result to `Ok(None)` on interrupt (Ctrl+C or a closed
/// terminal) so the current flow exits instead of bubbling an error.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

const MENU_ITEMS: &[&str] = &[
    "Identify a plant photo",
    "Look up a plant by name",
    "Configure LLM provider",
    "Show configuration",
    "Exit",
];

/// Entry point for interactive mode.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    theme::print_banner();

    let theme = theme::leafwise_theme();
    let mut config = config.clone();

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => identify::guided_identify(&config).await?,
            Some(1) => identify::guided_lookup(&config).await?,
            Some(2) => {
                if setup::guided_configure(&config)? {
                    match Config::load() {
                        Ok(updated) => config = updated,
                        Err(e) => tracing::warn!("Could not reload config: {e}"),
                    }
                }
            }
            Some(3) => show_config(&config)?,
            _ => break, // Exit, Esc or Ctrl+C
        }
    }

    Ok(())
}

/// Summary of current settings, with the full TOML on request.
fn show_config(config: &Config) -> anyhow::Result<()> {
    let theme = theme::leafwise_theme();
    let dim = Style::new().for_stderr().dim();

    loop {
        eprintln!();
        for line in config_summary(config) {
            eprintln!("{line}");
        }
        eprintln!();

        let items = &["View full config (TOML)", "Show config file path", "Back"];
        let selection = Select::with_theme(&theme)
            .with_prompt("Configuration")
            .items(items)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => match config.to_toml() {
                Ok(toml) => {
                    eprintln!();
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                    eprintln!("{toml}");
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                }
                Err(e) => {
                    let err = Style::new().for_stderr().red();
                    eprintln!("  {} Failed to serialize config: {e}", err.apply_to("✗"));
                }
            },
            Some(1) => {
                eprintln!();
                eprintln!("  {}", Config::default_path().display());
            }
            _ => break,
        }
    }

    Ok(())
}

fn config_summary(config: &Config) -> Vec<String> {
    let label = Style::new().for_stderr().bold();
    let dim = Style::new().for_stderr().dim();
    let green = Style::new().for_stderr().green();

    let config_path = Config::default_path();
    let path_note = if config_path.exists() {
        "(exists)"
    } else {
        "(using defaults)"
    };
    let cache = if config.cache.enabled {
        config.cache_dir().display().to_string()
    } else {
        "disabled".to_string()
    };

    let row = |name: &str, value: String| format!("    {:<20} {value}", label.apply_to(name));
    vec![
        format!("  {}", green.apply_to("Current configuration:")),
        String::new(),
        row(
            "Config file:",
            format!("{} {}", config_path.display(), dim.apply_to(path_note)),
        ),
        row("Provider:", provider_summary(config)),
        row(
            "Parallel:",
            format!("{} image(s) at a time", config.processing.parallel_workers),
        ),
        row(
            "Output:",
            format!(
                "{}{}",
                config.output.format,
                if config.output.pretty { " (pretty)" } else { "" }
            ),
        ),
        row("Cache:", cache),
        row("Log level:", config.logging.level.clone()),
    ]
}

/// The default provider, its model and whether a key is available.
fn provider_summary(config: &Config) -> String {
    let Some(provider) = LlmProvider::from_name(&config.llm.provider) else {
        return format!("{} (unknown)", config.llm.provider);
    };
    let model = match provider {
        LlmProvider::Anthropic => config.llm.anthropic.as_ref().map(|c| c.model.clone()),
        LlmProvider::Openai => config.llm.openai.as_ref().map(|c| c.model.clone()),
        LlmProvider::Ollama => config.llm.ollama.as_ref().map(|c| c.model.clone()),
        LlmProvider::Hyperbolic => config.llm.hyperbolic.as_ref().map(|c| c.model.clone()),
    }
    .unwrap_or_else(|| "default model".to_string());
    let key = if setup::has_api_key(config, provider) {
        ""
    } else {
        ", no API key"
    };
    format!("{} ({model}{key})", provider.label())
}
