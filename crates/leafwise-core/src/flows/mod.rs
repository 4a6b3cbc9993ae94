//! Flows: named prompt templates with typed, schema-checked input and output.
//!
//! A flow renders its template from the serialized input, appends the
//! output-schema instructions, sends one request through [`LlmClient`] and
//! parses the answer back into its output type. The three flows the
//! identifier sequences live in their own modules.

mod care_tips;
mod describe;
mod identify;
pub mod prompt;
pub mod schema;

pub use care_tips::{generate_plant_care_tips, GeneratePlantCareTips};
pub use describe::{generate_plant_description, GeneratePlantDescription};
pub use identify::{identify_plant_from_image, IdentifyPlantFromImage};

use crate::error::{FlowError, FlowResult};
use crate::llm::{LlmClient, LlmRequest};
use crate::media::ImageInput;
use schema::Field;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A request/response pair bound to one prompt template.
pub trait Flow {
    /// Flow name used in errors, logs and cache keys.
    const NAME: &'static str;

    /// Handlebars-style prompt template (see [`prompt::render`]).
    const TEMPLATE: &'static str;

    /// Shape the model must answer with.
    const OUTPUT_SCHEMA: &'static [Field];

    type Input: Serialize + Sync;
    type Output: DeserializeOwned + Send;

    fn validate_input(_input: &Self::Input) -> Result<(), String> {
        Ok(())
    }

    fn validate_output(_output: &Self::Output) -> Result<(), String> {
        Ok(())
    }
}

/// Validate `input` and render the request a flow would send.
pub fn build_request<F: Flow>(input: &F::Input) -> FlowResult<LlmRequest> {
    F::validate_input(input).map_err(invalid_input::<F>)?;

    let vars = serde_json::to_value(input).map_err(|e| invalid_input::<F>(e.to_string()))?;
    let rendered = prompt::render(F::TEMPLATE, &vars).map_err(invalid_input::<F>)?;

    let text = format!(
        "{}\n\n{}",
        rendered.text.trim_end(),
        schema::instructions(F::OUTPUT_SCHEMA)
    );
    let mut request = LlmRequest::new(text);
    request.json_output = true;

    if let Some(uri) = rendered.media {
        let image = ImageInput::from_data_uri(&uri).map_err(|e| invalid_input::<F>(e.to_string()))?;
        request = request.with_image(image);
    }

    Ok(request)
}

/// Parse and validate a raw model answer as the flow's output.
pub fn parse_response<F: Flow>(text: &str) -> FlowResult<F::Output> {
    let value = schema::parse_output(text, F::OUTPUT_SCHEMA).map_err(invalid_output::<F>)?;
    let output: F::Output =
        serde_json::from_value(value).map_err(|e| invalid_output::<F>(e.to_string()))?;
    F::validate_output(&output).map_err(invalid_output::<F>)?;
    Ok(output)
}

/// Run one flow end to end.
pub async fn run_flow<F: Flow>(client: &LlmClient, input: &F::Input) -> FlowResult<F::Output> {
    let request = build_request::<F>(input)?;
    tracing::debug!(
        "{}: sending {} prompt chars{}",
        F::NAME,
        request.prompt.len(),
        if request.image.is_some() { " + image" } else { "" }
    );

    client
        .complete(F::NAME, request, parse_response::<F>)
        .await
}

fn invalid_input<F: Flow>(message: String) -> FlowError {
    FlowError::InvalidInput {
        flow: F::NAME.to_string(),
        message,
    }
}

fn invalid_output<F: Flow>(message: String) -> FlowError {
    FlowError::InvalidOutput {
        flow: F::NAME.to_string(),
        message,
    }
}
