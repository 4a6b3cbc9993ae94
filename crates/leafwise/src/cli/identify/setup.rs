//! Identifier setup: config overrides, provider creation, output target.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use leafwise_core::config::LlmConfig;
use leafwise_core::{ClientOverrides, Config, Leafwise};

use super::types::{LlmProvider, OutputFormat};
use super::{LlmArgs, OutputArgs};

/// Everything a command needs to identify plants and write results.
pub(crate) struct IdentifyContext {
    pub leafwise: Leafwise,
    pub format: OutputFormat,
    pub pretty: bool,
}

/// Load the config file, naming the file in the error.
pub fn load_config() -> anyhow::Result<Config> {
    Config::load().map_err(|e| {
        anyhow::anyhow!(
            "{e}\n\n  Hint: Check {} or run `leafwise config init --force`.",
            Config::default_path().display()
        )
    })
}

/// Build the identifier from config plus CLI overrides.
pub fn setup_identifier(
    mut config: Config,
    llm: &LlmArgs,
    output: &OutputArgs,
) -> anyhow::Result<IdentifyContext> {
    let provider = match llm.llm {
        Some(p) => p,
        None => LlmProvider::from_name(&config.llm.provider).ok_or_else(|| {
            anyhow::anyhow!("Unknown LLM provider in config: {}", config.llm.provider)
        })?,
    };

    // A key entered in interactive mode wins over env vars and the config file
    if let Some(ref key) = llm.api_key {
        inject_api_key(&mut config.llm, provider, key);
    }

    let format = resolve_format(output.format, &config);
    let pretty = config.output.pretty;

    let overrides = ClientOverrides {
        provider: Some(provider.to_string()),
        model: llm.llm_model.clone(),
        no_cache: llm.no_cache,
    };
    let leafwise = Leafwise::with_overrides(config, &overrides)?;

    let client = leafwise.identifier().client();
    tracing::info!("Using {}/{}", client.provider_name(), client.model());

    Ok(IdentifyContext {
        leafwise,
        format,
        pretty,
    })
}

/// Warn early when the provider is clearly unusable (local server down).
pub async fn check_provider(ctx: &IdentifyContext) {
    let client = ctx.leafwise.identifier().client();
    if !client.is_available().await {
        tracing::warn!(
            "{}/{} does not look reachable; requests will probably fail",
            client.provider_name(),
            client.model()
        );
    }
}

/// CLI flag first, then `output.format` from config, then text.
pub fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.or_else(|| OutputFormat::from_config(&config.output.format))
        .unwrap_or(OutputFormat::Text)
}

/// Inject a session API key into the LLM config for the specified provider.
pub fn inject_api_key(llm_config: &mut LlmConfig, provider: LlmProvider, key: &str) {
    match provider {
        LlmProvider::Anthropic => {
            let cfg = llm_config.anthropic.get_or_insert_with(Default::default);
            cfg.api_key = key.to_string();
        }
        LlmProvider::Openai => {
            let cfg = llm_config.openai.get_or_insert_with(Default::default);
            cfg.api_key = key.to_string();
        }
        LlmProvider::Hyperbolic => {
            let cfg = llm_config.hyperbolic.get_or_insert_with(Default::default);
            cfg.api_key = key.to_string();
        }
        LlmProvider::Ollama => {}
    }
}

/// Open the output file, or stdout when no path is given.
pub fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write + Send>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
            anyhow::anyhow!("Cannot create output file {}: {e}", path.display())
        })?)),
        None => Box::new(std::io::stdout()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_config_format() {
        let mut config = Config::default();
        config.output.format = "jsonl".to_string();
        assert_eq!(resolve_format(None, &config), OutputFormat::Jsonl);
        assert_eq!(
            resolve_format(Some(OutputFormat::Json), &config),
            OutputFormat::Json
        );
    }

    #[test]
    fn unknown_config_format_falls_back_to_text() {
        let mut config = Config::default();
        config.output.format = "yaml".to_string();
        assert_eq!(resolve_format(None, &config), OutputFormat::Text);
    }

    #[test]
    fn inject_api_key_creates_section() {
        let mut llm = LlmConfig::default();
        inject_api_key(&mut llm, LlmProvider::Openai, "sk-session");
        assert_eq!(llm.openai.unwrap().api_key, "sk-session");
        assert!(llm.anthropic.is_none());
    }

    #[test]
    fn inject_api_key_ignores_ollama() {
        let mut llm = LlmConfig::default();
        inject_api_key(&mut llm, LlmProvider::Ollama, "unused");
        assert!(llm.ollama.is_none());
    }

    #[test]
    fn setup_with_session_key() {
        let llm = LlmArgs {
            llm: Some(LlmProvider::Anthropic),
            llm_model: Some("claude-test".to_string()),
            no_cache: true,
            api_key: Some("sk-ant-session".to_string()),
        };
        let ctx = setup_identifier(Config::default(), &llm, &OutputArgs::default()).unwrap();
        assert_eq!(ctx.leafwise.identifier().client().provider_name(), "anthropic");
        assert_eq!(ctx.leafwise.identifier().client().model(), "claude-test");
        assert_eq!(ctx.format, OutputFormat::Text);
    }
}
