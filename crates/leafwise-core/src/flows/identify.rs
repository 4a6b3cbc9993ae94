//! `identifyPlantFromImage`: decide whether a photo shows a plant and name it.

use super::schema::Field;
use super::{run_flow, Flow};
use crate::error::FlowResult;
use crate::llm::LlmClient;
use crate::media::ImageInput;
use crate::types::{IdentifyPlantInput, IdentifyPlantOutput};

pub struct IdentifyPlantFromImage;

const IDENTIFICATION_FIELDS: &[Field] = &[
    Field::boolean(
        "isPlant",
        "Whether or not the input image contains a plant.",
    ),
    Field::string(
        "commonName",
        "The common name of the identified plant. Empty if not a plant or not identifiable.",
    ),
    Field::string(
        "latinName",
        "The Latin name (scientific name) of the identified plant. \
         Empty if not a plant or not identifiable.",
    ),
    Field::string(
        "family",
        "The family of the identified plant. Empty if not a plant or not identifiable.",
    ),
];

impl Flow for IdentifyPlantFromImage {
    const NAME: &'static str = "identifyPlantFromImage";

    const TEMPLATE: &'static str = "\
You are an expert botanist. Analyze the provided image.
Determine if the image contains a plant.
If it is a plant, identify its common name, Latin (scientific) name, and family.
If it is not a plant or cannot be reliably identified, indicate that.

Image: {{media url=photoDataUri}}";

    const OUTPUT_SCHEMA: &'static [Field] = &[Field::object(
        "identification",
        "The identification result.",
        IDENTIFICATION_FIELDS,
    )];

    type Input = IdentifyPlantInput;
    type Output = IdentifyPlantOutput;

    fn validate_input(input: &IdentifyPlantInput) -> Result<(), String> {
        ImageInput::from_data_uri(&input.photo_data_uri)
            .map(|_| ())
            .map_err(|e| format!("photoDataUri: {e}"))
    }
}

/// Identify the plant in a photo given as a data URI.
pub async fn identify_plant_from_image(
    client: &LlmClient,
    input: &IdentifyPlantInput,
) -> FlowResult<IdentifyPlantOutput> {
    run_flow::<IdentifyPlantFromImage>(client, input).await
}
