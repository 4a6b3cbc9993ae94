//! LLM provider setup: provider choice, API key entry and persistence, model choice.

use console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};
use leafwise_core::llm::{api_key_env_var, resolve_env_var};
use leafwise_core::Config;

use super::theme::leafwise_theme;
use crate::cli::config::{save_api_key, save_default_provider};
use crate::cli::identify::LlmProvider;

const PROVIDERS: [LlmProvider; 4] = [
    LlmProvider::Anthropic,
    LlmProvider::Openai,
    LlmProvider::Ollama,
    LlmProvider::Hyperbolic,
];

/// Result of the provider selection flow.
pub struct LlmSelection {
    pub provider: LlmProvider,
    /// `None` keeps the model from config.
    pub model: Option<String>,
    /// API key entered during this session (not from env/config).
    pub api_key: Option<String>,
}

/// Where the provider's API key comes from.
enum KeySource {
    Existing,
    Entered { key: String, saved: bool },
}

/// Pick the provider for one identify or lookup run.
///
/// The first entry keeps the configured default. Returns `None` on cancel.
pub fn select_llm_provider(config: &Config) -> anyhow::Result<Option<LlmSelection>> {
    let theme = leafwise_theme();
    let default = LlmProvider::from_name(&config.llm.provider);

    let mut items = vec![match default {
        Some(p) => format!("Use configured default ({})", p.label()),
        None => format!("Use configured default ({}, unknown)", config.llm.provider),
    }];
    items.extend(PROVIDERS.iter().map(|p| provider_item(*p)));

    let selection = Select::with_theme(&theme)
        .with_prompt("Vision model provider")
        .items(&items)
        .default(0)
        .interact_opt()?;

    let (provider, pick_model) = match selection {
        Some(0) => match default {
            Some(p) => (p, false),
            None => anyhow::bail!("Unknown LLM provider in config: {}", config.llm.provider),
        },
        Some(i) => (PROVIDERS[i - 1], true),
        None => return Ok(None),
    };

    let Some(key) = ensure_api_key(config, provider, &theme)? else {
        return Ok(None);
    };

    let model = if pick_model {
        let Some(model) = select_model(provider, &theme)? else {
            return Ok(None);
        };
        Some(model)
    } else {
        None
    };

    Ok(Some(LlmSelection {
        provider,
        model,
        api_key: match key {
            KeySource::Existing => None,
            KeySource::Entered { key, .. } => Some(key),
        },
    }))
}

/// Choose a default provider and model and write them to the config file.
///
/// Returns `true` when the config file changed.
pub fn guided_configure(config: &Config) -> anyhow::Result<bool> {
    let theme = leafwise_theme();
    let items: Vec<String> = PROVIDERS.iter().map(|p| provider_item(*p)).collect();
    let current = LlmProvider::from_name(&config.llm.provider)
        .and_then(|p| PROVIDERS.iter().position(|&q| q == p))
        .unwrap_or(0);

    let Some(index) = Select::with_theme(&theme)
        .with_prompt("Default provider")
        .items(&items)
        .default(current)
        .interact_opt()?
    else {
        return Ok(false);
    };
    let provider = PROVIDERS[index];

    let Some(key) = ensure_api_key(config, provider, &theme)? else {
        return Ok(false);
    };
    if let KeySource::Entered { saved: false, .. } = key {
        let warn = Style::new().for_stderr().yellow();
        eprintln!(
            "  {}",
            warn.apply_to("The key was not saved; later runs will need it again.")
        );
    }

    let Some(model) = select_model(provider, &theme)? else {
        return Ok(false);
    };

    let path = Config::default_path();
    save_default_provider(&path, provider, Some(&model))?;

    let green = Style::new().for_stderr().green();
    eprintln!(
        "  {} Default set to {} ({model}) in {}",
        green.apply_to("✓"),
        provider.label(),
        path.display()
    );
    eprintln!();
    Ok(true)
}

fn provider_item(provider: LlmProvider) -> String {
    match provider {
        LlmProvider::Anthropic => "Anthropic (Claude)".to_string(),
        LlmProvider::Ollama => "Ollama (local)".to_string(),
        p => p.label().to_string(),
    }
}

/// Make sure an API key is available, prompting (and offering to save) if not.
///
/// Returns `None` if the user skips or cancels.
fn ensure_api_key(
    config: &Config,
    provider: LlmProvider,
    theme: &ColorfulTheme,
) -> anyhow::Result<Option<KeySource>> {
    let Some(env_var) = api_key_env_var(&provider.to_string()) else {
        return Ok(Some(KeySource::Existing));
    };

    let dim = Style::new().for_stderr().dim();
    let warn = Style::new().for_stderr().yellow();

    if has_api_key(config, provider) {
        eprintln!(
            "  {}",
            dim.apply_to(format!("Using existing API key from {env_var} / config"))
        );
        return Ok(Some(KeySource::Existing));
    }

    eprintln!("  {}", warn.apply_to(format!("{env_var} not set.")));

    let key = match Password::with_theme(theme)
        .with_prompt(format!(
            "Enter your {} API key (empty to cancel)",
            provider.label()
        ))
        .allow_empty_password(true)
        .interact()
    {
        Ok(k) if !k.trim().is_empty() => k.trim().to_string(),
        _ => return Ok(None),
    };

    let save_options = &["Yes, save to config file", "No, use for this session only"];
    let save_choice = Select::with_theme(theme)
        .with_prompt("Save this key for future sessions?")
        .items(save_options)
        .default(0)
        .interact_opt()?;

    match save_choice {
        Some(0) => {
            let path = Config::default_path();
            let saved = match save_api_key(&path, provider, &key, false) {
                Ok(()) => {
                    eprintln!(
                        "  {}",
                        dim.apply_to(format!("Key saved to {}", path.display()))
                    );
                    true
                }
                Err(e) => {
                    eprintln!(
                        "  {}",
                        warn.apply_to(format!("Could not save to config: {e}"))
                    );
                    eprintln!("  Using key for this session only.");
                    false
                }
            };
            Ok(Some(KeySource::Entered { key, saved }))
        }
        Some(1) => Ok(Some(KeySource::Entered { key, saved: false })),
        _ => Ok(None),
    }
}

/// Prompt for a model name, offering known vision models first.
fn select_model(provider: LlmProvider, theme: &ColorfulTheme) -> anyhow::Result<Option<String>> {
    let presets: &[(&str, &str)] = match provider {
        LlmProvider::Anthropic => &[
            ("claude-sonnet-4-20250514", "recommended"),
            ("claude-haiku-4-5-20251001", "faster, cheaper"),
        ],
        LlmProvider::Openai => &[
            ("gpt-4o-mini", "recommended"),
            ("gpt-4o", "more accurate"),
        ],
        LlmProvider::Ollama => &[("llama3.2-vision", "recommended"), ("llava", "smaller")],
        LlmProvider::Hyperbolic => &[
            ("Qwen/Qwen2.5-VL-7B-Instruct", "recommended"),
            ("Qwen/Qwen2.5-VL-72B-Instruct", "larger"),
        ],
    };

    let mut items: Vec<String> = presets
        .iter()
        .map(|(model, note)| format!("{model} ({note})"))
        .collect();
    items.push("Custom model name...".to_string());

    let choice = Select::with_theme(theme)
        .with_prompt(format!("{} model", provider.label()))
        .items(&items)
        .default(0)
        .interact_opt()?;

    match choice {
        Some(i) if i < presets.len() => Ok(Some(presets[i].0.to_string())),
        Some(_) => prompt_custom_model(theme),
        None => Ok(None),
    }
}

fn prompt_custom_model(theme: &ColorfulTheme) -> anyhow::Result<Option<String>> {
    let Some(model) = super::handle_interrupt(
        Input::<String>::with_theme(theme)
            .with_prompt("Model name")
            .interact_text(),
    )?
    else {
        return Ok(None);
    };
    let model = model.trim();
    Ok((!model.is_empty()).then(|| model.to_string()))
}

/// Whether a usable API key exists in the environment or config.
pub(crate) fn has_api_key(config: &Config, provider: LlmProvider) -> bool {
    let configured = match provider {
        LlmProvider::Anthropic => config.llm.anthropic.as_ref().map(|c| c.api_key.as_str()),
        LlmProvider::Openai => config.llm.openai.as_ref().map(|c| c.api_key.as_str()),
        LlmProvider::Hyperbolic => config.llm.hyperbolic.as_ref().map(|c| c.api_key.as_str()),
        LlmProvider::Ollama => return true,
    };
    if configured.and_then(resolve_env_var).is_some() {
        return true;
    }
    api_key_env_var(&provider.to_string())
        .and_then(|var| std::env::var(var).ok())
        .is_some_and(|v| !v.is_empty())
}
