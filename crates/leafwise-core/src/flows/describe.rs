//! `generatePlantDescription`: a short description of a named plant.

use super::schema::Field;
use super::{run_flow, Flow};
use crate::error::FlowResult;
use crate::llm::LlmClient;
use crate::types::{DescriptionInput, DescriptionOutput};

pub struct GeneratePlantDescription;

impl Flow for GeneratePlantDescription {
    const NAME: &'static str = "generatePlantDescription";

    const TEMPLATE: &'static str = "\
You are an expert botanist. Generate a short, informative description of the following plant, \
including its key characteristics and uses.

Plant Name: {{{plantName}}}
Scientific Name: {{{scientificName}}}
Family: {{{family}}}";

    const OUTPUT_SCHEMA: &'static [Field] = &[Field::string(
        "description",
        "A short, informative description of the plant.",
    )];

    type Input = DescriptionInput;
    type Output = DescriptionOutput;
}

/// Describe a plant from its names.
pub async fn generate_plant_description(
    client: &LlmClient,
    input: &DescriptionInput,
) -> FlowResult<DescriptionOutput> {
    run_flow::<GeneratePlantDescription>(client, input).await
}
