//! Response splitter: separates the prose analysis from the annotation JSON.
//!
//! The prompt asks the model to put `---ANNOTATIONS---` between the two
//! parts. Models do not always comply, so when the delimiter is missing (or
//! repeated) we fall back to scanning for a JSON object that mentions
//! `"annotations"`.

use super::types::SplitResponse;
use regex::Regex;
use std::sync::OnceLock;

/// Delimiter line the prompt asks the model to emit before the JSON part.
pub const ANNOTATIONS_DELIMITER: &str = "---ANNOTATIONS---";

/// Greedy: first `{` through the last `}` as long as `"annotations"` sits between.
fn annotations_object_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)\{.*"annotations".*\}"#).expect("annotations pattern is valid")
    })
}

/// Split a raw completion using the standard delimiter.
pub fn split(raw: &str) -> SplitResponse {
    split_with_delimiter(raw, ANNOTATIONS_DELIMITER)
}

/// Split a raw completion on `delimiter`.
///
/// Exactly one delimiter yields the trimmed text on each side. Anything else
/// keeps the whole (untrimmed) response as the textual part and tries the
/// JSON scan. Never fails.
pub fn split_with_delimiter(raw: &str, delimiter: &str) -> SplitResponse {
    let parts: Vec<&str> = raw.split(delimiter).collect();

    if parts.len() == 2 {
        log::debug!("[SPLIT] Delimiter found, {} chars of annotations", parts[1].len());
        return SplitResponse {
            textual: parts[0].trim().to_string(),
            annotations_json: Some(parts[1].trim().to_string()),
        };
    }

    log::info!(
        "[SPLIT] Delimiter yielded {} parts, scanning for an annotations object",
        parts.len()
    );

    let annotations_json = annotations_object_pattern()
        .find(raw)
        .map(|m| m.as_str().to_string());

    if annotations_json.is_none() {
        log::info!("[SPLIT] No annotations object found, textual-only response");
    }

    SplitResponse {
        textual: raw.to_string(),
        annotations_json,
    }
}
