//! Guided identify and lookup flows.
//!
//! Each flow collects the same choices the flag-based commands take, builds
//! their argument structs and hands off to `execute()`.

use console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use leafwise_core::{Config, FileDiscovery};
use std::path::PathBuf;

use super::setup::select_llm_provider;
use super::theme::leafwise_theme;
use crate::cli::identify::{IdentifyArgs, LlmArgs, OutputArgs, OutputFormat};
use crate::cli::lookup::LookupArgs;

/// Walk the user through identifying one photo or a folder of photos.
pub async fn guided_identify(config: &Config) -> anyhow::Result<()> {
    let theme = leafwise_theme();
    let warn = Style::new().for_stderr().yellow();

    // Re-prompt on both "path not found" and "no images found"
    let (input, count) = loop {
        let Some(raw_path) = super::handle_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Path to plant photo or folder")
                .interact_text(),
        )?
        else {
            return Ok(());
        };

        let path = PathBuf::from(shellexpand::tilde(raw_path.trim()).into_owned());
        if !path.exists() {
            eprintln!(
                "  {}",
                warn.apply_to(format!("Path not found: {}", path.display()))
            );
            continue;
        }

        let found = FileDiscovery::new(config.processing.clone()).discover(&path);
        if found.is_empty() {
            eprintln!(
                "  {}",
                warn.apply_to("No supported images found at that path.")
            );
            continue;
        }

        let dim = Style::new().for_stderr().dim();
        eprintln!(
            "  {}",
            dim.apply_to(format!(
                "Found {} image(s) ({:.1} MB)",
                found.len(),
                FileDiscovery::total_size(&found) as f64 / 1_000_000.0
            ))
        );
        break (path, found.len());
    };

    let Some(llm) = choose_llm(config)? else {
        return Ok(());
    };
    let Some(output) = choose_output(&theme, count > 1)? else {
        return Ok(());
    };

    if !confirm(
        &theme,
        &format!("Ready to identify {count} image(s)"),
        &llm,
        &output,
    )? {
        return Ok(());
    }

    let args = IdentifyArgs {
        input,
        output,
        llm,
        ..IdentifyArgs::default()
    };
    report_failure(crate::cli::identify::execute(args).await);

    if again(&theme, "Identify another photo")? {
        Box::pin(guided_identify(config)).await?;
    }
    Ok(())
}

/// Walk the user through looking up a plant by name.
pub async fn guided_lookup(config: &Config) -> anyhow::Result<()> {
    let theme = leafwise_theme();

    let Some(name) = prompt_text(&theme, "Plant name", false)? else {
        return Ok(());
    };
    let scientific_name = prompt_text(&theme, "Scientific name (optional)", true)?;
    let family = prompt_text(&theme, "Family (optional)", true)?;

    let Some(llm) = choose_llm(config)? else {
        return Ok(());
    };

    let args = LookupArgs {
        name,
        scientific_name,
        family,
        output: OutputArgs::default(),
        llm,
    };
    report_failure(crate::cli::lookup::execute(args).await);

    if again(&theme, "Look up another plant")? {
        Box::pin(guided_lookup(config)).await?;
    }
    Ok(())
}

fn choose_llm(config: &Config) -> anyhow::Result<Option<LlmArgs>> {
    Ok(select_llm_provider(config)?.map(|selection| LlmArgs {
        llm: Some(selection.provider),
        llm_model: selection.model,
        no_cache: false,
        api_key: selection.api_key,
    }))
}

/// Output target and format. Text to the terminal is the default for one photo.
fn choose_output(theme: &ColorfulTheme, is_batch: bool) -> anyhow::Result<Option<OutputArgs>> {
    let items: &[&str] = if is_batch {
        &[
            "Plant cards in the terminal",
            "JSONL file (recommended for folders)",
            "JSON array file",
        ]
    } else {
        &["Plant card in the terminal", "JSON to stdout", "JSON file"]
    };

    let Some(choice) = Select::with_theme(theme)
        .with_prompt("Output")
        .items(items)
        .default(0)
        .interact_opt()?
    else {
        return Ok(None);
    };

    let (format, default_file) = match (is_batch, choice) {
        (_, 0) => (OutputFormat::Text, None),
        (true, 1) => (OutputFormat::Jsonl, Some("plants.jsonl")),
        (true, _) => (OutputFormat::Json, Some("plants.json")),
        (false, 1) => (OutputFormat::Json, None),
        (false, _) => (OutputFormat::Json, Some("plant.json")),
    };

    let output = match default_file {
        Some(default) => {
            let Some(path) = prompt_output_path(theme, default)? else {
                return Ok(None);
            };
            Some(path)
        }
        None => None,
    };

    Ok(Some(OutputArgs {
        output,
        format: Some(format),
    }))
}

fn confirm(
    theme: &ColorfulTheme,
    headline: &str,
    llm: &LlmArgs,
    output: &OutputArgs,
) -> anyhow::Result<bool> {
    let bold = Style::new().for_stderr().bold();
    let dim = Style::new().for_stderr().dim();

    let provider = llm
        .llm
        .map(|p| p.label().to_string())
        .unwrap_or_else(|| "default".to_string());
    let model = llm.llm_model.as_deref().unwrap_or("configured model");
    let target = output
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());
    let format = output.format.unwrap_or(OutputFormat::Text);

    eprintln!();
    eprintln!("  {}", bold.apply_to(headline));
    eprintln!(
        "  {}",
        dim.apply_to(format!(
            "Provider: {provider} ({model}) | Output: {target} ({format})"
        ))
    );
    eprintln!();

    let answer = Confirm::with_theme(theme)
        .with_prompt("Start?")
        .default(true)
        .interact_opt()?;
    Ok(matches!(answer, Some(true)))
}

/// Keep the menu alive after a failed run; the notice has already been shown.
fn report_failure(result: anyhow::Result<()>) {
    if let Err(e) = result {
        let err = Style::new().for_stderr().red();
        eprintln!("  {} {e:#}", err.apply_to("✗"));
    }
}

fn again(theme: &ColorfulTheme, prompt: &str) -> anyhow::Result<bool> {
    eprintln!();
    let items = [prompt, "Back to main menu"];
    let choice = Select::with_theme(theme)
        .with_prompt("What next?")
        .items(&items)
        .default(0)
        .interact_opt()?;
    Ok(matches!(choice, Some(0)))
}

/// Prompt for free text. Optional prompts map an empty answer to `None`.
fn prompt_text(
    theme: &ColorfulTheme,
    prompt: &str,
    optional: bool,
) -> anyhow::Result<Option<String>> {
    let Some(value) = super::handle_interrupt(
        Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .allow_empty(optional)
            .interact_text(),
    )?
    else {
        return Ok(None);
    };
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn prompt_output_path(theme: &ColorfulTheme, default: &str) -> anyhow::Result<Option<PathBuf>> {
    let Some(path) = super::handle_interrupt(
        Input::<String>::with_theme(theme)
            .with_prompt("Output file path")
            .default(format!("./{default}"))
            .interact_text(),
    )?
    else {
        return Ok(None);
    };
    Ok(Some(PathBuf::from(
        shellexpand::tilde(path.trim()).into_owned(),
    )))
}
