//! LeafWise Core - plant identification backed by a vision-capable LLM.
//!
//! A photo (or just a plant name) goes in; a plant report comes out: common
//! name, scientific name, family, a short description and care tips.
//!
//! # Architecture
//!
//! ```text
//! Image → identifyPlantFromImage → generatePlantDescription → generatePlantCareTips → Report
//! ```
//!
//! Each arrow is a *flow*: a prompt template with a typed input and a
//! schema-checked JSON output, sent through an [`LlmClient`] that applies
//! timeout, retry and an optional on-disk response cache.
//!
//! # Usage
//!
//! ```rust,ignore
//! use leafwise_core::{Config, Leafwise, Notice};
//!
//! #[tokio::main]
//! async fn main() -> leafwise_core::Result<()> {
//!     let leafwise = Leafwise::new(Config::load()?)?;
//!     let result = leafwise
//!         .identifier()
//!         .identify_file("./monstera.jpg".as_ref(), |n: &Notice| println!("{}", n.title))
//!         .await?;
//!     println!("{:?}", result.outcome.report());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod discovery;
pub mod error;
pub mod flows;
pub mod identifier;
pub mod llm;
pub mod media;
pub mod output;
pub mod types;

pub use cache::ResponseCache;
pub use config::Config;
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use error::{ConfigError, FlowError, FlowResult, InputError, LeafwiseError, Result};
pub use identifier::{BatchResult, Identification, PlantIdentifier};
pub use llm::{ClientOptions, LlmClient, LlmProvider, LlmProviderFactory};
pub use media::ImageInput;
pub use output::{OutputFormat, OutputWriter};
pub use types::{
    CareTipsOutput, DescriptionOutput, Notice, Outcome, PlantIdentification, PlantReport,
    Severity,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overrides applied on top of the configuration when building a client.
#[derive(Debug, Clone, Default)]
pub struct ClientOverrides {
    /// Provider name instead of `llm.provider`
    pub provider: Option<String>,
    /// Model instead of the provider's configured one
    pub model: Option<String>,
    /// Skip the response cache even if enabled in config
    pub no_cache: bool,
}

/// Main entry point: configuration plus a ready identifier.
pub struct Leafwise {
    config: Config,
    identifier: PlantIdentifier,
}

impl Leafwise {
    /// Build from configuration using the configured provider.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_overrides(config, &ClientOverrides::default())
    }

    /// Build from configuration with CLI-style overrides.
    pub fn with_overrides(config: Config, overrides: &ClientOverrides) -> Result<Self> {
        let provider_name = overrides
            .provider
            .as_deref()
            .unwrap_or(&config.llm.provider);
        let provider =
            LlmProviderFactory::create(provider_name, &config.llm, overrides.model.as_deref())?;
        tracing::debug!(
            "Initializing LeafWise v{VERSION} with {}/{}",
            provider.name(),
            provider.model()
        );
        Ok(Self::with_provider(config, provider, overrides.no_cache))
    }

    /// Build around an already-constructed provider.
    pub fn with_provider(config: Config, provider: Box<dyn LlmProvider>, no_cache: bool) -> Self {
        let mut client = LlmClient::new(provider, ClientOptions::from_config(&config));
        if config.cache.enabled && !no_cache {
            let dir = config.cache_dir();
            tracing::debug!("Response cache at {:?}", dir);
            client = client.with_cache(ResponseCache::new(dir));
        }
        let identifier = PlantIdentifier::from_config(client, &config);
        Self { config, identifier }
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn identifier(&self) -> &PlantIdentifier {
        &self.identifier
    }
}
