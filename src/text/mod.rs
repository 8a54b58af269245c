//! Text domain: structured rendering of the prose and of annotation details.
//!
//!   - sections.rs  : numbered sections, dash items, fences, main title
//!   - fields.rs    : `Label : content | ...` description fields
//!   - heuristics.rs: code detection for fields
//!   - cache.rs     : memoization keyed by content hash

pub mod cache;
pub mod fields;
pub mod heuristics;
pub mod sections;

pub use cache::{content_hash, ParseCache};
pub use fields::{parse_fields, LabeledField};
pub use sections::{parse_sections, Block, ParsedDocument, ParsedSection, ParserState, SectionItem};
