//! Response domain: from raw completion text to validated annotations.
//!
//! External code should only use the items re-exported here.
//!
//!   - split.rs : delimiter split with JSON-scan fallback
//!   - decode.rs: annotation JSON validation, coordinate policy
//!   - types.rs : Annotation, AnalysisResult, TokenUsage

pub mod decode;
pub mod split;
pub mod types;

pub use decode::{decode, decode_with_policy, CoordinatePolicy, DecodeOutcome};
pub use split::{split, split_with_delimiter, ANNOTATIONS_DELIMITER};
pub use types::{
    AnalysisResult, Annotation, AnnotationCounts, AnnotationType, SplitResponse, TokenUsage,
};
