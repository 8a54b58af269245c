//! Error and warning types shared across domains.
//!
//! Parsing never fails hard: malformed model output produces
//! [`ParseWarning`]s next to whatever could be salvaged. Only the pipeline
//! (provider call, image payload) and settings loading return real errors.

use serde::Serialize;
use std::path::PathBuf;

/// A non-fatal problem found while decoding the annotations payload.
///
/// `index` is the position of the offending entry in the `annotations` list.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum ParseWarning {
    #[error("annotations payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("annotations payload has no \"annotations\" list")]
    MissingAnnotationsList,

    #[error("annotation #{index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("annotation #{index} has no id")]
    MissingId { index: usize },

    #[error("annotation id '{id}' is already taken, later entry dropped")]
    DuplicateId { id: String },

    #[error("annotation '{id}' has no type, defaulting to info")]
    MissingType { id: String },

    #[error("annotation '{id}' has unknown type '{value}'")]
    UnknownType { id: String, value: String },

    #[error("annotation '{id}' has a missing or non-numeric '{field}'")]
    InvalidCoordinate { id: String, field: &'static str },

    #[error("annotation '{id}' is out of bounds ({field}={value}, clamped: {clamped})")]
    OutOfBounds {
        id: String,
        field: &'static str,
        value: f64,
        clamped: bool,
    },

    #[error("annotation '{id}' has invalid color '{value}'")]
    InvalidColor { id: String, value: String },
}

impl ParseWarning {
    /// True when the warning caused the annotation to be discarded.
    pub fn drops_annotation(&self) -> bool {
        matches!(
            self,
            Self::NotAnObject { .. }
                | Self::MissingId { .. }
                | Self::DuplicateId { .. }
                | Self::UnknownType { .. }
                | Self::InvalidCoordinate { .. }
                | Self::OutOfBounds { clamped: false, .. }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value '{value}' for {key}")]
    InvalidOverride { key: &'static str, value: String },
}

/// Failure reported by a chat completion backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("no API key configured for {0}")]
    MissingApiKey(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion contained no text")]
    EmptyContent,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PayloadError {
    #[error("image is empty")]
    Empty,

    #[error("image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("could not read image dimensions: {0}")]
    Undecodable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}
