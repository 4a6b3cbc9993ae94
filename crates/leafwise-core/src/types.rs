//! Core data types: flow inputs/outputs and the assembled plant report.
//!
//! Field names serialize as camelCase so the JSON matches the schemas the
//! prompts describe to the model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder for a scientific name or family that could not be determined.
pub const NOT_AVAILABLE: &str = "N/A";

// === Identification flow ===

/// Input to the identification flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyPlantInput {
    /// A photo as a data URI: `data:<mimetype>;base64,<encoded_data>`
    pub photo_data_uri: String,
}

/// Output of the identification flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyPlantOutput {
    pub identification: PlantIdentification,
}

/// What the model saw in the image.
///
/// Name fields are empty when the image is not a plant or the species could
/// not be determined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantIdentification {
    /// Whether or not the image contains a plant
    pub is_plant: bool,

    /// Common name of the identified plant
    pub common_name: String,

    /// Latin (scientific) name
    pub latin_name: String,

    /// Botanical family
    pub family: String,
}

// === Description flow ===

/// Input to the description flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionInput {
    pub plant_name: String,
    pub scientific_name: String,
    pub family: String,
}

/// Output of the description flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionOutput {
    /// A short, informative description of the plant
    pub description: String,
}

// === Care tips flow ===

/// Input to the care-tips flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareTipsInput {
    pub plant_name: String,
    pub plant_description: String,
}

/// Output of the care-tips flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareTipsOutput {
    pub watering_frequency: String,
    pub sunlight_requirements: String,
    pub additional_care_tips: String,
}

// === Assembled result ===

/// Everything gathered about one plant, ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantReport {
    /// Name shown as the title (common name or a fallback)
    pub plant_name: String,

    /// Scientific name, or "N/A"
    pub scientific_name: String,

    /// Family, or "N/A"
    pub family: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<DescriptionOutput>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub care_tips: Option<CareTipsOutput>,

    /// Submitted image as a data URI (only when requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Image file the report was produced from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl PlantReport {
    /// The description text, if the model produced a non-empty one.
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_ref()
            .map(|d| d.description.trim())
            .filter(|d| !d.is_empty())
    }
}

/// How prominently a notice should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A user-facing progress or diagnostic message emitted while identifying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Info)
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Warning)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Error)
    }

    fn new(title: impl Into<String>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }
}

/// Final state of one identification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The three flows ran and produced a report
    Report(PlantReport),
    /// The identification flow found no plant in the image
    NotAPlant {
        #[serde(skip_serializing_if = "Option::is_none")]
        source: Option<PathBuf>,
    },
}

impl Outcome {
    pub fn report(&self) -> Option<&PlantReport> {
        match self {
            Outcome::Report(report) => Some(report),
            Outcome::NotAPlant { .. } => None,
        }
    }
}
