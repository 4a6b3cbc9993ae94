//! The `leafwise lookup` command: description and care tips for a named plant.

use clap::Args;
use leafwise_core::Notice;

use super::identify::setup::{check_provider, load_config, setup_identifier};
use super::identify::{write_identification, LlmArgs, OutputArgs};
use super::render;

/// Arguments for the `lookup` command.
#[derive(Args, Debug, Default)]
pub struct LookupArgs {
    /// Common name of the plant
    #[arg(required = true)]
    pub name: String,

    /// Scientific (Latin) name, if known
    #[arg(long)]
    pub scientific_name: Option<String>,

    /// Botanical family, if known
    #[arg(long)]
    pub family: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub llm: LlmArgs,
}

/// Execute the lookup command.
pub async fn execute(args: LookupArgs) -> anyhow::Result<()> {
    if args.name.trim().is_empty() {
        anyhow::bail!("Plant name must not be empty");
    }

    let config = load_config()?;
    let ctx = setup_identifier(config, &args.llm, &args.output)?;
    check_provider(&ctx).await;

    let result = ctx
        .leafwise
        .identifier()
        .lookup_name(
            &args.name,
            args.scientific_name.as_deref(),
            args.family.as_deref(),
            |notice: &Notice| render::print_notice(notice),
        )
        .await;

    match result {
        Ok(identification) => {
            write_identification(&ctx, &identification, args.output.output.as_deref())
        }
        Err(e) => {
            render::print_notice(&render::failure_notice());
            Err(e.into())
        }
    }
}
