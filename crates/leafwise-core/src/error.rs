//! Error types for LeafWise.
//!
//! Errors are split by concern so callers can tell a bad config file from a
//! bad input image from a misbehaving model: each variant carries the context
//! needed for an actionable message (file path, flow name, HTTP status).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for LeafWise operations.
#[derive(Error, Debug)]
pub enum LeafwiseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A flow (LLM call) failed
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    /// The submitted image or name was rejected
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while running a flow against the model.
#[derive(Error, Debug)]
pub enum FlowError {
    /// The provider call failed (transport, HTTP status, empty body)
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        status_code: Option<u16>,
    },

    /// The provider did not answer in time
    #[error("Timeout in {flow} after {timeout_ms}ms")]
    Timeout { flow: String, timeout_ms: u64 },

    /// The flow input failed validation before any call was made
    #[error("Invalid input for {flow}: {message}")]
    InvalidInput { flow: String, message: String },

    /// The model answered, but not with something matching the output schema
    #[error("Invalid output from {flow}: {message}")]
    InvalidOutput { flow: String, message: String },
}

/// Errors about the user's submission (image file, data URI, plant name).
#[derive(Error, Debug)]
pub enum InputError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Not an image format we can send to a vision model
    #[error("Unsupported format for {path}: {message}")]
    UnsupportedFormat { path: PathBuf, message: String },

    /// A data URI that is not `data:<mime>;base64,<payload>`
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    /// Blank plant name on the name-lookup path
    #[error("Plant name must not be empty")]
    EmptyName,
}

/// Convenience type alias for LeafWise results.
pub type Result<T> = std::result::Result<T, LeafwiseError>;

/// Convenience type alias for flow-level results.
pub type FlowResult<T> = std::result::Result<T, FlowError>;
