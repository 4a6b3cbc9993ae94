//! `generatePlantCareTips`: watering, sunlight and general care advice.

use super::schema::Field;
use super::{run_flow, Flow};
use crate::error::FlowResult;
use crate::llm::LlmClient;
use crate::types::{CareTipsInput, CareTipsOutput};

pub struct GeneratePlantCareTips;

impl Flow for GeneratePlantCareTips {
    const NAME: &'static str = "generatePlantCareTips";

    const TEMPLATE: &'static str = "\
You are an expert botanist specializing in providing care tips for plants.

Based on the provided plant name and description, generate personalized care tips, \
including watering frequency, sunlight requirements, and any additional care tips.

Plant Name: {{{plantName}}}
Plant Description: {{{plantDescription}}}";

    const OUTPUT_SCHEMA: &'static [Field] = &[
        Field::string(
            "wateringFrequency",
            "Recommended watering frequency for the plant.",
        ),
        Field::string(
            "sunlightRequirements",
            "Sunlight requirements for the plant.",
        ),
        Field::string(
            "additionalCareTips",
            "Any additional care tips for the plant.",
        ),
    ];

    type Input = CareTipsInput;
    type Output = CareTipsOutput;
}

/// Care tips for a plant, given its name and a description.
pub async fn generate_plant_care_tips(
    client: &LlmClient,
    input: &CareTipsInput,
) -> FlowResult<CareTipsOutput> {
    run_flow::<GeneratePlantCareTips>(client, input).await
}
