//! Orchestration of the three flows into one plant report.
//!
//! `identify_image` runs identification, then description, then care tips,
//! substituting fallback text when a step comes back partial. Progress is
//! reported as [`Notice`]s through a caller-supplied callback and also kept
//! on the returned [`Identification`]. Any flow error aborts the sequence.
//!
//! `identify_batch` fans single-image runs out over many files with a
//! semaphore bounding the number in flight. Results are delivered via a
//! callback as they complete, enabling real-time JSONL streaming.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::config::{Config, LimitsConfig};
use crate::error::{InputError, LeafwiseError, Result};
use crate::flows::{generate_plant_care_tips, generate_plant_description, identify_plant_from_image};
use crate::llm::LlmClient;
use crate::media::{self, ImageInput};
use crate::types::{
    CareTipsInput, DescriptionInput, IdentifyPlantInput, Notice, Outcome, PlantReport,
    NOT_AVAILABLE,
};

/// Title used when the model sees a plant but cannot name it.
pub const UNCLEAR_PLANT_NAME: &str = "Plant (species unclear)";

/// Description handed to the care-tips flow when the description flow
/// returned nothing for a photo.
pub const IMAGE_DESCRIPTION_FALLBACK: &str = "A plant identified from an image.";

/// Upper bound on concurrent identifications in a batch.
pub const MAX_PARALLEL: usize = 8;

/// Result of one identification run.
#[derive(Debug, Clone, Serialize)]
pub struct Identification {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub notices: Vec<Notice>,
}

/// Result of identifying a single file in a batch.
#[derive(Debug)]
pub enum BatchResult {
    Success(Box<PlantReport>),
    NotAPlant(PathBuf),
    Failure(PathBuf, String),
}

/// Runs the identification sequence against one model client.
#[derive(Clone)]
pub struct PlantIdentifier {
    client: LlmClient,
    limits: LimitsConfig,
    parallel: usize,
    include_image: bool,
}

/// Names that feed the description and care-tips flows.
struct PlantNames {
    plant_name: String,
    scientific_name: String,
    family: String,
}

/// Collects notices while forwarding them to the caller.
struct NoticeLog<'a> {
    notices: Vec<Notice>,
    sink: &'a mut (dyn FnMut(&Notice) + Send),
}

impl<'a> NoticeLog<'a> {
    fn new(sink: &'a mut (dyn FnMut(&Notice) + Send)) -> Self {
        Self {
            notices: Vec::new(),
            sink,
        }
    }

    fn push(&mut self, notice: Notice) {
        (self.sink)(&notice);
        self.notices.push(notice);
    }

    fn finish(self, outcome: Outcome) -> Identification {
        Identification {
            outcome,
            notices: self.notices,
        }
    }
}

impl PlantIdentifier {
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            limits: LimitsConfig::default(),
            parallel: 4,
            include_image: false,
        }
    }

    /// Build an identifier using the limits and worker count from `config`.
    pub fn from_config(client: LlmClient, config: &Config) -> Self {
        Self::new(client)
            .with_limits(config.limits.clone())
            .with_parallel(config.processing.parallel_workers)
            .with_image_url(config.output.include_image)
    }

    pub fn with_limits(mut self, limits: LimitsConfig) -> Self {
        self.limits = limits;
        self
    }

    /// Set batch concurrency (clamped to `1..=MAX_PARALLEL`).
    pub fn with_parallel(mut self, parallel: usize) -> Self {
        self.parallel = parallel.clamp(1, MAX_PARALLEL);
        self
    }

    /// Attach the submitted image to reports as a data URI.
    pub fn with_image_url(mut self, include: bool) -> Self {
        self.include_image = include;
        self
    }

    pub fn client(&self) -> &LlmClient {
        &self.client
    }

    pub fn parallel(&self) -> usize {
        self.parallel
    }

    /// Identify the plant in `image` and gather its description and care tips.
    pub async fn identify_image<N>(&self, image: &ImageInput, mut on_notice: N) -> Result<Identification>
    where
        N: FnMut(&Notice) + Send,
    {
        let mut log = NoticeLog::new(&mut on_notice);
        log.push(Notice::info(
            "Identifying Plant...",
            "Please wait while we analyze the image.",
        ));

        let input = IdentifyPlantInput {
            photo_data_uri: image.data_url(),
        };
        let identification = identify_plant_from_image(&self.client, &input)
            .await?
            .identification;

        if !identification.is_plant {
            log.push(Notice::error(
                "Not a Plant?",
                "We couldn't identify a plant in the image. Please try another image.",
            ));
            return Ok(log.finish(Outcome::NotAPlant { source: None }));
        }

        let common_name = identification.common_name.trim();
        let names = if common_name.is_empty() {
            log.push(Notice::warning(
                "Identification Unclear",
                "Could not confidently identify the plant species. \
                 Displaying generic information if possible.",
            ));
            PlantNames {
                plant_name: UNCLEAR_PLANT_NAME.to_string(),
                scientific_name: NOT_AVAILABLE.to_string(),
                family: NOT_AVAILABLE.to_string(),
            }
        } else {
            log.push(Notice::info(
                "Plant Identified!",
                format!("Identified as {common_name}. Fetching details..."),
            ));
            PlantNames {
                plant_name: common_name.to_string(),
                scientific_name: or_not_available(&identification.latin_name),
                family: or_not_available(&identification.family),
            }
        };

        let mut report = self
            .fetch_details(names, IMAGE_DESCRIPTION_FALLBACK.to_string(), &mut log)
            .await?;
        if self.include_image {
            report.image_url = Some(image.data_url());
        }
        Ok(log.finish(Outcome::Report(report)))
    }

    /// Identify a photo given as a `data:<mime>;base64,<payload>` URI.
    pub async fn identify_data_uri<N>(&self, uri: &str, on_notice: N) -> Result<Identification>
    where
        N: FnMut(&Notice) + Send,
    {
        let image = ImageInput::from_data_uri(uri)?;
        self.identify_image(&image, on_notice).await
    }

    /// Load an image file and identify it. The report records the path.
    pub async fn identify_file<N>(&self, path: &Path, on_notice: N) -> Result<Identification>
    where
        N: FnMut(&Notice) + Send,
    {
        let image = self.load(path).await?;
        let mut identification = self.identify_image(&image, on_notice).await?;
        match &mut identification.outcome {
            Outcome::Report(report) => report.source = Some(path.to_path_buf()),
            Outcome::NotAPlant { source } => *source = Some(path.to_path_buf()),
        }
        Ok(identification)
    }

    /// Describe a plant by name, skipping image identification.
    pub async fn lookup_name<N>(
        &self,
        name: &str,
        scientific_name: Option<&str>,
        family: Option<&str>,
        mut on_notice: N,
    ) -> Result<Identification>
    where
        N: FnMut(&Notice) + Send,
    {
        let plant_name = name.trim();
        if plant_name.is_empty() {
            return Err(InputError::EmptyName.into());
        }

        let mut log = NoticeLog::new(&mut on_notice);
        let names = PlantNames {
            plant_name: plant_name.to_string(),
            scientific_name: or_not_available(scientific_name.unwrap_or_default()),
            family: or_not_available(family.unwrap_or_default()),
        };
        let fallback = format!("A plant named {plant_name}.");
        let report = self.fetch_details(names, fallback, &mut log).await?;
        Ok(log.finish(Outcome::Report(report)))
    }

    /// Description, then care tips, then the closing notice.
    async fn fetch_details(
        &self,
        names: PlantNames,
        fallback_description: String,
        log: &mut NoticeLog<'_>,
    ) -> Result<PlantReport> {
        let description = generate_plant_description(
            &self.client,
            &DescriptionInput {
                plant_name: names.plant_name.clone(),
                scientific_name: names.scientific_name.clone(),
                family: names.family.clone(),
            },
        )
        .await?;

        let description_text = description.description.trim();
        let plant_description = if description_text.is_empty() {
            log.push(Notice::info(
                "Description Note",
                "Could not generate a detailed plant description.",
            ));
            fallback_description
        } else {
            description_text.to_string()
        };

        let care_tips = generate_plant_care_tips(
            &self.client,
            &CareTipsInput {
                plant_name: names.plant_name.clone(),
                plant_description,
            },
        )
        .await?;

        if !description_text.is_empty() || !care_tips.watering_frequency.trim().is_empty() {
            log.push(Notice::info(
                "Plant Info Ready!",
                format!("Details for {} are now available.", names.plant_name),
            ));
        } else {
            log.push(Notice::info(
                "Limited Info",
                format!("We found some basic info for {}.", names.plant_name),
            ));
        }

        Ok(PlantReport {
            plant_name: names.plant_name,
            scientific_name: names.scientific_name,
            family: names.family,
            description: Some(description),
            care_tips: Some(care_tips),
            image_url: None,
            source: None,
        })
    }

    async fn load(&self, path: &Path) -> Result<ImageInput> {
        let path = path.to_path_buf();
        let limits = self.limits.clone();
        let image = tokio::task::spawn_blocking(move || media::load_image(&path, &limits))
            .await
            .map_err(|e| LeafwiseError::Io(std::io::Error::other(e)))??;
        Ok(image)
    }

    /// Identify many image files concurrently.
    ///
    /// Spawns one tokio task per file, bounded by a semaphore. Calls
    /// `on_result` for each completed file.
    ///
    /// Returns `(succeeded, not_plants, failed)` counts.
    pub async fn identify_batch<F>(&self, files: &[PathBuf], on_result: F) -> (usize, usize, usize)
    where
        F: Fn(BatchResult) + Send + Sync + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.parallel));
        let on_result = Arc::new(on_result);
        let mut handles = Vec::with_capacity(files.len());

        for path in files {
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                tracing::warn!("Identification semaphore closed unexpectedly, stopping batch");
                break;
            };

            let identifier = self.clone();
            let on_result = on_result.clone();
            let path = path.clone();

            let handle = tokio::spawn(async move {
                let result = match identifier
                    .identify_file(&path, |notice: &Notice| {
                        tracing::debug!("{:?}: {}: {}", path, notice.title, notice.description);
                    })
                    .await
                {
                    Ok(Identification {
                        outcome: Outcome::Report(report),
                        ..
                    }) => BatchResult::Success(Box::new(report)),
                    Ok(Identification {
                        outcome: Outcome::NotAPlant { .. },
                        ..
                    }) => BatchResult::NotAPlant(path),
                    Err(e) => BatchResult::Failure(path, e.to_string()),
                };
                let kind = match &result {
                    BatchResult::Success(_) => 0,
                    BatchResult::NotAPlant(_) => 1,
                    BatchResult::Failure(..) => 2,
                };
                drop(permit);
                on_result(result);
                kind
            });

            handles.push(handle);
        }

        let (mut succeeded, mut not_plants, mut failed) = (0usize, 0usize, 0usize);
        for handle in handles {
            match handle.await {
                Ok(0) => succeeded += 1,
                Ok(1) => not_plants += 1,
                Ok(_) => failed += 1,
                Err(e) => {
                    tracing::error!("Identification task panicked: {e}");
                    failed += 1;
                }
            }
        }

        (succeeded, not_plants, failed)
    }
}

fn or_not_available(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use crate::llm::testing::MockProvider;
    use crate::llm::{ClientOptions, LlmRequest};
    use crate::types::Severity;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    const MONSTERA: &str = r#"{"identification": {"isPlant": true,
        "commonName": "Swiss cheese plant", "latinName": "Monstera deliciosa",
        "family": "Araceae"}}"#;
    const DESCRIPTION: &str = r#"{"description": "A climbing aroid with split leaves."}"#;
    const TIPS: &str = r#"{"wateringFrequency": "Weekly",
        "sunlightRequirements": "Bright indirect light",
        "additionalCareTips": "Provide a moss pole"}"#;

    enum Step {
        Identify,
        Describe,
        CareTips,
    }

    fn step(request: &LlmRequest) -> Step {
        if request.prompt.contains("Analyze the provided image") {
            Step::Identify
        } else if request.prompt.contains("short, informative description") {
            Step::Describe
        } else {
            Step::CareTips
        }
    }

    fn answers(identify: &'static str, describe: &'static str, tips: &'static str) -> MockProvider {
        MockProvider::scripted(move |request| {
            Ok(match step(request) {
                Step::Identify => identify,
                Step::Describe => describe,
                Step::CareTips => tips,
            }
            .to_string())
        })
    }

    fn identifier(provider: MockProvider) -> PlantIdentifier {
        let options = ClientOptions {
            retry_attempts: 0,
            ..ClientOptions::default()
        };
        PlantIdentifier::new(LlmClient::new(Box::new(provider), options))
    }

    fn png() -> ImageInput {
        ImageInput::from_bytes(PNG, "png")
    }

    fn titles(identification: &Identification) -> Vec<&str> {
        identification
            .notices
            .iter()
            .map(|n| n.title.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_full_identification() {
        let provider = answers(MONSTERA, DESCRIPTION, TIPS);
        let requests = provider.requests_handle();
        let mut streamed = Vec::new();

        let result = identifier(provider)
            .identify_image(&png(), |n: &Notice| streamed.push(n.title.clone()))
            .await
            .unwrap();

        assert_eq!(
            titles(&result),
            ["Identifying Plant...", "Plant Identified!", "Plant Info Ready!"]
        );
        assert_eq!(streamed, titles(&result));
        assert_eq!(
            result.notices[1].description,
            "Identified as Swiss cheese plant. Fetching details..."
        );

        let report = result.outcome.report().unwrap();
        assert_eq!(report.plant_name, "Swiss cheese plant");
        assert_eq!(report.scientific_name, "Monstera deliciosa");
        assert_eq!(report.family, "Araceae");
        assert_eq!(
            report.description_text(),
            Some("A climbing aroid with split leaves.")
        );
        assert_eq!(report.care_tips.as_ref().unwrap().watering_frequency, "Weekly");
        assert!(report.image_url.is_none());

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].image.is_some());
        assert!(requests[1].image.is_none());
        assert!(requests[1].prompt.contains("Scientific Name: Monstera deliciosa"));
        assert!(requests[2]
            .prompt
            .contains("Plant Description: A climbing aroid with split leaves."));
    }

    #[tokio::test]
    async fn test_not_a_plant_stops_early() {
        let provider = answers(
            r#"{"identification": {"isPlant": false, "commonName": "",
                "latinName": "", "family": ""}}"#,
            DESCRIPTION,
            TIPS,
        );
        let calls = provider.call_count_handle();

        let result = identifier(provider)
            .identify_image(&png(), |_: &Notice| {})
            .await
            .unwrap();

        assert!(matches!(result.outcome, Outcome::NotAPlant { .. }));
        assert_eq!(titles(&result), ["Identifying Plant...", "Not a Plant?"]);
        assert_eq!(result.notices[1].severity, Severity::Error);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unclear_species_uses_fallback_names() {
        let provider = answers(
            r#"{"identification": {"isPlant": true, "commonName": "",
                "latinName": "Ficus", "family": "Moraceae"}}"#,
            DESCRIPTION,
            TIPS,
        );
        let requests = provider.requests_handle();

        let result = identifier(provider)
            .identify_image(&png(), |_: &Notice| {})
            .await
            .unwrap();

        let report = result.outcome.report().unwrap();
        assert_eq!(report.plant_name, UNCLEAR_PLANT_NAME);
        assert_eq!(report.scientific_name, NOT_AVAILABLE);
        assert_eq!(report.family, NOT_AVAILABLE);
        assert_eq!(result.notices[1].title, "Identification Unclear");
        assert_eq!(result.notices[1].severity, Severity::Warning);
        assert!(requests.lock().unwrap()[1]
            .prompt
            .contains("Plant Name: Plant (species unclear)"));
    }

    #[tokio::test]
    async fn test_missing_latin_name_and_family_become_na() {
        let provider = answers(
            r#"{"identification": {"isPlant": true, "commonName": "Pothos",
                "latinName": "", "family": "  "}}"#,
            DESCRIPTION,
            TIPS,
        );
        let result = identifier(provider)
            .identify_image(&png(), |_: &Notice| {})
            .await
            .unwrap();

        let report = result.outcome.report().unwrap();
        assert_eq!(report.plant_name, "Pothos");
        assert_eq!(report.scientific_name, "N/A");
        assert_eq!(report.family, "N/A");
    }

    #[tokio::test]
    async fn test_empty_description_continues_with_fallback() {
        let provider = answers(MONSTERA, r#"{"description": ""}"#, TIPS);
        let requests = provider.requests_handle();

        let result = identifier(provider)
            .identify_image(&png(), |_: &Notice| {})
            .await
            .unwrap();

        assert_eq!(
            titles(&result),
            [
                "Identifying Plant...",
                "Plant Identified!",
                "Description Note",
                "Plant Info Ready!"
            ]
        );
        assert!(requests.lock().unwrap()[2]
            .prompt
            .contains("Plant Description: A plant identified from an image."));
        assert_eq!(result.outcome.report().unwrap().description_text(), None);
    }

    #[tokio::test]
    async fn test_limited_info_when_nothing_useful() {
        let provider = answers(
            MONSTERA,
            r#"{"description": ""}"#,
            r#"{"wateringFrequency": "", "sunlightRequirements": "Full sun",
                "additionalCareTips": ""}"#,
        );
        let result = identifier(provider)
            .identify_image(&png(), |_: &Notice| {})
            .await
            .unwrap();

        let last = result.notices.last().unwrap();
        assert_eq!(last.title, "Limited Info");
        assert_eq!(last.description, "We found some basic info for Swiss cheese plant.");
    }

    #[tokio::test]
    async fn test_flow_error_aborts_sequence() {
        let provider = MockProvider::scripted(|request| match step(request) {
            Step::Identify => Ok(MONSTERA.to_string()),
            _ => Err(FlowError::Llm {
                message: "invalid api key".to_string(),
                status_code: Some(401),
            }),
        });
        let calls = provider.call_count_handle();

        let err = identifier(provider)
            .identify_image(&png(), |_: &Notice| {})
            .await
            .unwrap_err();

        assert!(matches!(err, LeafwiseError::Flow(FlowError::Llm { .. })));
        // identification + failed description; care tips never requested
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_include_image_sets_data_url() {
        let provider = answers(MONSTERA, DESCRIPTION, TIPS);
        let result = identifier(provider)
            .with_image_url(true)
            .identify_image(&png(), |_: &Notice| {})
            .await
            .unwrap();

        let report = result.outcome.report().unwrap();
        assert_eq!(report.image_url.as_deref(), Some(png().data_url().as_str()));
    }

    #[tokio::test]
    async fn test_identify_data_uri_rejects_garbage() {
        let err = identifier(answers(MONSTERA, DESCRIPTION, TIPS))
            .identify_data_uri("not a uri", |_: &Notice| {})
            .await
            .unwrap_err();
        assert!(matches!(err, LeafwiseError::Input(InputError::InvalidDataUri(_))));
    }

    #[tokio::test]
    async fn test_lookup_name_skips_identification() {
        let provider = answers(MONSTERA, r#"{"description": ""}"#, TIPS);
        let requests = provider.requests_handle();

        let result = identifier(provider)
            .lookup_name("  Boston fern ", None, Some("Nephrolepidaceae"), |_: &Notice| {})
            .await
            .unwrap();

        let report = result.outcome.report().unwrap();
        assert_eq!(report.plant_name, "Boston fern");
        assert_eq!(report.scientific_name, "N/A");
        assert_eq!(report.family, "Nephrolepidaceae");
        assert_eq!(titles(&result), ["Description Note", "Plant Info Ready!"]);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[1]
            .prompt
            .contains("Plant Description: A plant named Boston fern."));
    }

    #[tokio::test]
    async fn test_lookup_blank_name_is_rejected() {
        let provider = answers(MONSTERA, DESCRIPTION, TIPS);
        let calls = provider.call_count_handle();
        let err = identifier(provider)
            .lookup_name("   ", None, None, |_: &Notice| {})
            .await
            .unwrap_err();
        assert!(matches!(err, LeafwiseError::Input(InputError::EmptyName)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_identify_file_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.png");
        std::fs::write(&path, PNG).unwrap();

        let result = identifier(answers(MONSTERA, DESCRIPTION, TIPS))
            .identify_file(&path, |_: &Notice| {})
            .await
            .unwrap();
        assert_eq!(
            result.outcome.report().unwrap().source.as_deref(),
            Some(path.as_path())
        );
    }

    #[test]
    fn test_parallel_is_clamped() {
        let id = identifier(answers(MONSTERA, DESCRIPTION, TIPS));
        assert_eq!(id.clone().with_parallel(0).parallel(), 1);
        assert_eq!(id.with_parallel(64).parallel(), MAX_PARALLEL);
    }

    #[tokio::test]
    async fn test_batch_respects_concurrency_bound() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = (0..6)
            .map(|i| {
                let path = dir.path().join(format!("plant_{i}.png"));
                std::fs::write(&path, PNG).unwrap();
                path
            })
            .collect();

        let in_flight = Arc::new(AtomicU32::new(0));
        let max_seen = Arc::new(AtomicU32::new(0));
        let provider = answers(MONSTERA, DESCRIPTION, TIPS)
            .with_delay(Duration::from_millis(20))
            .with_concurrency_gauge(in_flight, max_seen.clone());

        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = reports.clone();
        let (ok, not_plants, failed) = identifier(provider)
            .with_parallel(2)
            .identify_batch(&files, move |result| {
                if let BatchResult::Success(report) = result {
                    sink.lock().unwrap().push(report.source.clone());
                }
            })
            .await;

        assert_eq!((ok, not_plants, failed), (6, 0, 0));
        assert_eq!(reports.lock().unwrap().len(), 6);
        assert!(max_seen.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_batch_counts_each_kind() {
        let dir = tempfile::tempdir().unwrap();
        let plant = dir.path().join("plant.png");
        let rock = dir.path().join("rock.png");
        std::fs::write(&plant, PNG).unwrap();
        // Same bytes but a different payload so the mock can tell them apart
        let mut rock_bytes = PNG.to_vec();
        rock_bytes.push(0xFF);
        std::fs::write(&rock, &rock_bytes).unwrap();
        let missing = dir.path().join("missing.png");

        let rock_data = ImageInput::from_bytes(&rock_bytes, "png").data;
        let provider = MockProvider::scripted(move |request| {
            Ok(match step(request) {
                Step::Identify
                    if request.image.as_ref().is_some_and(|i| i.data == rock_data) =>
                {
                    r#"{"identification": {"isPlant": false, "commonName": "",
                        "latinName": "", "family": ""}}"#
                }
                Step::Identify => MONSTERA,
                Step::Describe => DESCRIPTION,
                Step::CareTips => TIPS,
            }
            .to_string())
        });

        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = failures.clone();
        let counts = identifier(provider)
            .identify_batch(&[plant, rock, missing.clone()], move |result| {
                if let BatchResult::Failure(path, message) = result {
                    sink.lock().unwrap().push((path, message));
                }
            })
            .await;

        assert_eq!(counts, (1, 1, 1));
        let failures = failures.lock().unwrap();
        assert_eq!(failures[0].0, missing);
        assert!(failures[0].1.contains("File not found"));
    }
}
