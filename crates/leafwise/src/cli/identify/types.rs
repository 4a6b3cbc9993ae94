//! CLI enum types shared by `identify` and `lookup`: output format, LLM provider.

use clap::ValueEnum;
use leafwise_core::OutputFormat as CoreOutputFormat;

/// Supported output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plant card
    Text,
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl OutputFormat {
    /// Parse the `output.format` config value.
    pub fn from_config(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("text") {
            return Some(Self::Text);
        }
        CoreOutputFormat::parse(value).map(|f| match f {
            CoreOutputFormat::Json => Self::Json,
            CoreOutputFormat::JsonLines => Self::Jsonl,
        })
    }

    /// The library writer format, or `None` for text.
    pub fn core(self) -> Option<CoreOutputFormat> {
        match self {
            OutputFormat::Text => None,
            OutputFormat::Json => Some(CoreOutputFormat::Json),
            OutputFormat::Jsonl => Some(CoreOutputFormat::JsonLines),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Supported LLM providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LlmProvider {
    /// Anthropic API
    Anthropic,
    /// OpenAI API
    Openai,
    /// Local Ollama instance
    Ollama,
    /// Hyperbolic API
    Hyperbolic,
}

impl LlmProvider {
    /// Parse a provider name as written in config.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "anthropic" => Some(Self::Anthropic),
            "openai" => Some(Self::Openai),
            "ollama" => Some(Self::Ollama),
            "hyperbolic" => Some(Self::Hyperbolic),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "Anthropic",
            LlmProvider::Openai => "OpenAI",
            LlmProvider::Ollama => "Ollama",
            LlmProvider::Hyperbolic => "Hyperbolic",
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::Anthropic => write!(f, "anthropic"),
            LlmProvider::Openai => write!(f, "openai"),
            LlmProvider::Ollama => write!(f, "ollama"),
            LlmProvider::Hyperbolic => write!(f, "hyperbolic"),
        }
    }
}
