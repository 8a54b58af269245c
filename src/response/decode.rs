//! Annotation decoder: turns the JSON part of a response into validated
//! [`Annotation`]s.
//!
//! A malformed payload never aborts the analysis: the textual part is still
//! rendered, and every problem is reported as a [`ParseWarning`] so the UI
//! can tell the user how many annotations could not be used.

use super::types::{Annotation, AnnotationType};
use crate::error::ParseWarning;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Upper bound for every percentage coordinate.
pub const MAX_PERCENT: f64 = 100.0;

/// What to do with an annotation whose box leaves the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinatePolicy {
    /// Pull the box back inside `[0, 100]`.
    #[default]
    Clamp,
    /// Discard the annotation.
    Drop,
}

impl CoordinatePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Some(Self::Clamp),
            "drop" => Some(Self::Drop),
            _ => None,
        }
    }
}

/// Decoded annotations plus everything that went wrong along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeOutcome {
    pub annotations: Vec<Annotation>,
    pub warnings: Vec<ParseWarning>,
}

impl DecodeOutcome {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Strict view: `Err` with the warnings if anything was dropped, clamped
    /// or defaulted.
    pub fn into_result(self) -> Result<Vec<Annotation>, Vec<ParseWarning>> {
        if self.warnings.is_empty() {
            Ok(self.annotations)
        } else {
            Err(self.warnings)
        }
    }
}

/// Decode with the default [`CoordinatePolicy::Clamp`].
pub fn decode(annotations_json: Option<&str>) -> DecodeOutcome {
    decode_with_policy(annotations_json, CoordinatePolicy::default())
}

pub fn decode_with_policy(annotations_json: Option<&str>, policy: CoordinatePolicy) -> DecodeOutcome {
    let mut outcome = DecodeOutcome::default();

    let Some(raw) = annotations_json else {
        return outcome;
    };

    let payload: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            log::warn!(
                "[DECODE] Annotations JSON parse failed: {} (raw: {})",
                e,
                preview(raw)
            );
            outcome.warnings.push(ParseWarning::InvalidJson(e.to_string()));
            return outcome;
        }
    };

    let Some(entries) = payload.get("annotations").and_then(Value::as_array) else {
        log::warn!("[DECODE] Payload has no annotations list");
        outcome.warnings.push(ParseWarning::MissingAnnotationsList);
        return outcome;
    };

    // Ids are claimed by the first entry that survives validation.
    let mut seen = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let Some(annotation) = decode_entry(index, entry, policy, &mut outcome.warnings) else {
            continue;
        };
        if !seen.insert(annotation.id.clone()) {
            log::warn!("[DECODE] Annotation '{}' duplicates an earlier id, dropped", annotation.id);
            outcome.warnings.push(ParseWarning::DuplicateId { id: annotation.id });
            continue;
        }
        outcome.annotations.push(annotation);
    }

    log::info!(
        "[DECODE] {} annotations accepted, {} warnings",
        outcome.annotations.len(),
        outcome.warnings.len()
    );
    outcome
}

fn decode_entry(
    index: usize,
    entry: &Value,
    policy: CoordinatePolicy,
    warnings: &mut Vec<ParseWarning>,
) -> Option<Annotation> {
    let Some(obj) = entry.as_object() else {
        log::warn!("[DECODE] Annotation #{} is not an object, dropped", index);
        warnings.push(ParseWarning::NotAnObject { index });
        return None;
    };

    let id = match obj.get("id").map(value_to_string) {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            log::warn!("[DECODE] Annotation #{} has no id, dropped", index);
            warnings.push(ParseWarning::MissingId { index });
            return None;
        }
    };

    let annotation_type = match obj.get("type") {
        None | Some(Value::Null) => {
            log::warn!("[DECODE] Annotation '{}' has no type, using info", id);
            warnings.push(ParseWarning::MissingType { id: id.clone() });
            AnnotationType::Info
        }
        Some(v) => {
            let value = value_to_string(v);
            match AnnotationType::parse(&value) {
                Some(t) => t,
                None => {
                    log::warn!("[DECODE] Annotation '{}' has unknown type '{}', dropped", id, value);
                    warnings.push(ParseWarning::UnknownType { id, value });
                    return None;
                }
            }
        }
    };

    let mut coords = [0.0_f64; 4];
    for (slot, field) in coords.iter_mut().zip(["x", "y", "width", "height"]) {
        match obj.get(field).and_then(number_of) {
            Some(n) => *slot = n,
            None => {
                log::warn!("[DECODE] Annotation '{}' has invalid {}, dropped", id, field);
                warnings.push(ParseWarning::InvalidCoordinate { id, field });
                return None;
            }
        }
    }
    let [x, y, width, height] = fit_box(&id, coords, policy, warnings)?;

    let color = match obj.get("color") {
        None | Some(Value::Null) => None,
        Some(v) => {
            let value = value_to_string(v);
            if is_hex_color(&value) {
                Some(value)
            } else {
                log::warn!("[DECODE] Annotation '{}' has invalid color '{}'", id, value);
                warnings.push(ParseWarning::InvalidColor { id: id.clone(), value });
                None
            }
        }
    };

    Some(Annotation {
        title: text_field(obj, "title"),
        description: text_field(obj, "description"),
        id,
        annotation_type,
        x,
        y,
        width,
        height,
        color,
    })
}

/// Bring `[x, y, width, height]` inside the image, or reject it under
/// [`CoordinatePolicy::Drop`].
fn fit_box(
    id: &str,
    [x, y, width, height]: [f64; 4],
    policy: CoordinatePolicy,
    warnings: &mut Vec<ParseWarning>,
) -> Option<[f64; 4]> {
    let clamped = policy == CoordinatePolicy::Clamp;
    let mut report = |field: &'static str, value: f64| {
        log::warn!(
            "[DECODE] Annotation '{}' out of bounds: {}={} ({})",
            id,
            field,
            value,
            if clamped { "clamped" } else { "dropped" }
        );
        warnings.push(ParseWarning::OutOfBounds {
            id: id.to_string(),
            field,
            value,
            clamped,
        });
    };

    // Under Drop the first offending field rejects the box, so each
    // dropped annotation carries exactly one warning.
    let fx = x.clamp(0.0, MAX_PERCENT);
    if fx != x {
        report("x", x);
        if !clamped {
            return None;
        }
    }
    let fy = y.clamp(0.0, MAX_PERCENT);
    if fy != y {
        report("y", y);
        if !clamped {
            return None;
        }
    }
    let fw = width.clamp(0.0, MAX_PERCENT - fx);
    if fw != width {
        report("width", width);
        if !clamped {
            return None;
        }
    }
    let fh = height.clamp(0.0, MAX_PERCENT - fy);
    if fh != height {
        report("height", height);
        if !clamped {
            return None;
        }
    }

    Some([fx, fy, fw, fh])
}

/// Accept JSON numbers and numeric strings (`"12.5"`, `"12.5%"`).
fn number_of(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(value_to_string).unwrap_or_default()
}

/// `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
pub fn is_hex_color(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

fn preview(raw: &str) -> &str {
    match raw.char_indices().nth(200) {
        Some((end, _)) => &raw[..end],
        None => raw,
    }
}
