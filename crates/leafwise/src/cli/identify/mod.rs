//! The `leafwise identify` command: identify the plant in a photo (or a folder of photos).

mod batch;
pub(crate) mod setup;
pub mod types;

pub use types::{LlmProvider, OutputFormat};

use clap::Args;
use leafwise_core::{FileDiscovery, Identification, Notice, OutputWriter};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::render;
use batch::identify_batch;
use setup::{check_provider, load_config, open_output, setup_identifier, IdentifyContext};

/// LLM selection flags shared by `identify` and `lookup`.
#[derive(Args, Debug, Clone, Default)]
pub struct LlmArgs {
    /// LLM provider (defaults to `llm.provider` in config)
    #[arg(long, value_enum)]
    pub llm: Option<LlmProvider>,

    /// LLM model name (provider-specific)
    #[arg(long)]
    pub llm_model: Option<String>,

    /// Bypass the response cache
    #[arg(long)]
    pub no_cache: bool,

    /// API key for the selected provider (session-only, set by interactive mode).
    #[arg(skip)]
    pub api_key: Option<String>,
}

/// Output flags shared by `identify` and `lookup`.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to `output.format` in config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Arguments for the `identify` command.
#[derive(Args, Debug, Default)]
pub struct IdentifyArgs {
    /// Image file or directory of images
    #[arg(required = true)]
    pub input: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    /// Number of images identified concurrently (max 8)
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Embed the submitted image as a data URI in JSON output
    #[arg(long)]
    pub include_image: bool,
}

/// Execute the identify command.
pub async fn execute(args: IdentifyArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.input
        );
    }

    let mut config = load_config()?;
    if let Some(parallel) = args.parallel {
        config.processing.parallel_workers = parallel;
    }
    if args.include_image {
        config.output.include_image = true;
    }

    let discovery = FileDiscovery::new(config.processing.clone());
    let files = discovery.discover(&args.input);
    if files.is_empty() {
        tracing::warn!("No supported image files found at {:?}", args.input);
        return Ok(());
    }

    let ctx = setup_identifier(config, &args.llm, &args.output)?;
    check_provider(&ctx).await;

    if args.input.is_file() {
        identify_single(&ctx, &args.input, args.output.output.as_deref()).await
    } else {
        tracing::info!("Found {} image(s) to identify", files.len());
        identify_batch(ctx, args.output.output.as_deref(), files).await
    }
}

/// Identify one image, printing notices as they arrive.
async fn identify_single(
    ctx: &IdentifyContext,
    input: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let result = ctx
        .leafwise
        .identifier()
        .identify_file(input, |notice: &Notice| render::print_notice(notice))
        .await;

    match result {
        Ok(identification) => write_identification(ctx, &identification, output),
        Err(e) => {
            render::print_notice(&render::failure_notice());
            Err(e.into())
        }
    }
}

/// Write a single identification in the context's format.
pub(crate) fn write_identification(
    ctx: &IdentifyContext,
    identification: &Identification,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let mut target = open_output(output)?;

    match ctx.format.core() {
        None => {
            let styled = output.is_none() && console::Term::stdout().is_term();
            let text = render::render_outcome(&identification.outcome, styled);
            target.write_all(text.as_bytes())?;
            target.flush()?;
        }
        Some(format) => {
            let mut writer = OutputWriter::new(target, format, ctx.pretty);
            writer.write(identification)?;
            writer.finish()?;
        }
    }

    if let Some(path) = output {
        tracing::info!("Output written to {:?}", path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafwise_core::{
        CareTipsOutput, ClientOverrides, Config, DescriptionOutput, Leafwise, Outcome,
        PlantReport,
    };

    fn context(format: OutputFormat) -> IdentifyContext {
        let overrides = ClientOverrides {
            provider: Some("ollama".to_string()),
            no_cache: true,
            ..ClientOverrides::default()
        };
        IdentifyContext {
            leafwise: Leafwise::with_overrides(Config::default(), &overrides).unwrap(),
            format,
            pretty: false,
        }
    }

    fn identification() -> Identification {
        Identification {
            outcome: Outcome::Report(PlantReport {
                plant_name: "Swiss Cheese Plant".to_string(),
                scientific_name: "Monstera deliciosa".to_string(),
                family: "Araceae".to_string(),
                description: Some(DescriptionOutput {
                    description: "A climbing aroid with split leaves.".to_string(),
                }),
                care_tips: Some(CareTipsOutput {
                    watering_frequency: "Weekly".to_string(),
                    sunlight_requirements: "Bright, indirect light".to_string(),
                    additional_care_tips: String::new(),
                }),
                image_url: None,
                source: None,
            }),
            notices: vec![
                Notice::info("Identifying Plant...", "Analyzing the image."),
                Notice::info("Plant Info Ready!", "Details for Swiss Cheese Plant."),
            ],
        }
    }

    #[test]
    fn json_output_carries_notices_beside_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plant.json");

        write_identification(&context(OutputFormat::Json), &identification(), Some(&path))
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["outcome"], "report");
        assert_eq!(value["plantName"], "Swiss Cheese Plant");
        assert_eq!(value["careTips"]["wateringFrequency"], "Weekly");
        let notices = value["notices"].as_array().unwrap();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[1]["title"], "Plant Info Ready!");
    }

    #[test]
    fn jsonl_output_is_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plant.jsonl");

        write_identification(&context(OutputFormat::Jsonl), &identification(), Some(&path))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn text_output_writes_card() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plant.txt");

        write_identification(&context(OutputFormat::Text), &identification(), Some(&path))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(
            "Swiss Cheese Plant\nScientific Name: Monstera deliciosa | Family: Araceae\n"
        ));
        assert!(content.contains("Description\n  A climbing aroid with split leaves.\n"));
        assert!(content.contains("Watering Frequency:"));
        assert!(!content.contains("Additional Care Tips:"));
        // Plain text: no notices and no ANSI escapes in a file target
        assert!(!content.contains("Plant Info Ready!"));
        assert!(!content.contains('\u{1b}'));
    }
}
