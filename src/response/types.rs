//! Response types: the annotation record and the per-run analysis result.
//!
//! An `Annotation` is the JSON object the model emits after the
//! `---ANNOTATIONS---` delimiter, after validation. Coordinates are
//! percentages of the source image's natural size, `x,y` being the top-left
//! corner.

use crate::error::ParseWarning;
use crate::llm::provider::Provider;
use serde::{Deserialize, Serialize};

/// Output of the response splitter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitResponse {
    /// Prose analysis, rendered by the structured text parser.
    pub textual: String,
    /// Raw JSON candidate for the annotation decoder.
    pub annotations_json: Option<String>,
}

/// Category of a single annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    Issue,
    Recommendation,
    Info,
}

impl AnnotationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Recommendation => "recommendation",
            Self::Info => "info",
        }
    }

    /// Parse a type string, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "issue" => Some(Self::Issue),
            "recommendation" => Some(Self::Recommendation),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

/// A positioned, typed callout over a region of the analyzed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,
    #[serde(rename = "type")]
    pub annotation_type: AnnotationType,
    pub title: String,
    /// Usually a pipe-delimited `Label : content | Label : content` string.
    pub description: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Author-supplied hex color, if it was valid.
    pub color: Option<String>,
}

/// Token accounting reported by the provider for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// Per-type annotation totals for one or more results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationCounts {
    pub issues: usize,
    pub recommendations: usize,
    pub info: usize,
}

impl AnnotationCounts {
    pub fn total(&self) -> usize {
        self.issues + self.recommendations + self.info
    }
}

impl std::ops::Add for AnnotationCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            issues: self.issues + rhs.issues,
            recommendations: self.recommendations + rhs.recommendations,
            info: self.info + rhs.info,
        }
    }
}

/// Output of one (image, analysis type, provider) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub analysis_type_id: String,
    pub provider: Provider,
    pub model: String,
    /// Textual part of the response.
    pub content: String,
    pub annotations: Vec<Annotation>,
    /// Decode problems, kept so the UI can say how many annotations were lost.
    #[serde(default, skip_deserializing)]
    pub warnings: Vec<ParseWarning>,
    pub usage: TokenUsage,
    pub duration_ms: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl AnalysisResult {
    pub fn counts(&self) -> AnnotationCounts {
        self.annotations
            .iter()
            .fold(AnnotationCounts::default(), |mut acc, a| {
                match a.annotation_type {
                    AnnotationType::Issue => acc.issues += 1,
                    AnnotationType::Recommendation => acc.recommendations += 1,
                    AnnotationType::Info => acc.info += 1,
                }
                acc
            })
    }

    /// Number of annotation entries that were discarded during decoding.
    pub fn dropped_annotations(&self) -> usize {
        self.warnings.iter().filter(|w| w.drops_annotation()).count()
    }

    pub fn find_annotation(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }
}
