//! Inline field parser: splits an annotation description into labeled fields
//! for the detail panel.
//!
//! Descriptions normally follow the prompt's
//! `Label : content | Label : content` convention. Anything else falls back
//! to line-oriented `Label: content` extraction, and finally to a single
//! unlabeled field.

use super::heuristics;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

const FIELD_SEPARATOR: &str = " | ";
const LABEL_SEPARATOR: &str = " : ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledField {
    /// Empty for unlabeled text.
    pub label: String,
    pub content: String,
    /// Render in a monospace panel instead of inline text.
    pub is_code: bool,
}

impl LabeledField {
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        let label = label.into();
        let content = content.into();
        let is_code = if label.is_empty() {
            heuristics::unlabeled_looks_like_code(&content)
        } else {
            heuristics::looks_like_code(&label, &content)
        };
        Self {
            label,
            content,
            is_code,
        }
    }

    pub fn unlabeled(content: impl Into<String>) -> Self {
        Self::new(String::new(), content)
    }

    pub fn is_labeled(&self) -> bool {
        !self.label.is_empty()
    }
}

fn label_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([^:\n]+?)\s*:\s*(.*)$").expect("label pattern is valid"))
}

/// Parse a description into fields. Blank input yields no fields.
pub fn parse_fields(description: &str) -> Vec<LabeledField> {
    if description.trim().is_empty() {
        return Vec::new();
    }
    if description.contains(FIELD_SEPARATOR) {
        parse_pipe_delimited(description)
    } else {
        parse_label_lines(description)
    }
}

fn parse_pipe_delimited(description: &str) -> Vec<LabeledField> {
    description
        .split(FIELD_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once(LABEL_SEPARATOR) {
            Some((label, content)) if !label.trim().is_empty() => {
                LabeledField::new(label.trim(), content.trim())
            }
            _ => LabeledField::unlabeled(segment),
        })
        .collect()
}

/// Each `Label: content` line opens a field; following lines without a label
/// belong to it.
fn parse_label_lines(description: &str) -> Vec<LabeledField> {
    let mut preamble: Vec<&str> = Vec::new();
    let mut labeled: Vec<(String, Vec<&str>)> = Vec::new();

    for line in description.lines() {
        if let Some(caps) = label_line_pattern().captures(line) {
            let label = caps.get(1).map_or("", |m| m.as_str()).trim();
            if !label.is_empty() {
                let first = caps.get(2).map_or("", |m| m.as_str());
                labeled.push((label.to_string(), vec![first]));
                continue;
            }
        }
        match labeled.last_mut() {
            Some((_, lines)) => lines.push(line),
            None => preamble.push(line),
        }
    }

    if labeled.is_empty() {
        return vec![LabeledField::unlabeled(description.trim())];
    }

    let mut fields = Vec::with_capacity(labeled.len() + 1);
    let preamble = preamble.join("\n");
    if !preamble.trim().is_empty() {
        fields.push(LabeledField::unlabeled(preamble.trim()));
    }
    fields.extend(
        labeled
            .into_iter()
            .map(|(label, lines)| LabeledField::new(label, lines.join("\n").trim())),
    );
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipe_delimited_fields() {
        let fields = parse_fields("Role : X | Position : Y");
        assert_eq!(
            fields,
            vec![
                LabeledField { label: "Role".into(), content: "X".into(), is_code: false },
                LabeledField { label: "Position".into(), content: "Y".into(), is_code: false },
            ]
        );
    }

    #[test]
    fn code_suggestion_is_flagged() {
        let fields = parse_fields("Suggested code : <div class=\"x\">");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].label, "Suggested code");
        assert_eq!(fields[0].content, "<div class=\"x\">");
        assert!(fields[0].is_code);
    }

    #[test]
    fn pipe_segment_content_keeps_later_separators() {
        let fields = parse_fields("Contrast : 2.5 : 1 | Fix : darken text");
        assert_eq!(fields[0].content, "2.5 : 1");
        assert_eq!(fields[1].label, "Fix");
    }

    #[test]
    fn pipe_segment_without_label_is_kept_unlabeled() {
        let fields = parse_fields("Role : nav | no label here");
        assert_eq!(fields.len(), 2);
        assert!(!fields[1].is_labeled());
        assert_eq!(fields[1].content, "no label here");
    }

    #[test]
    fn label_lines_collect_continuations() {
        let fields = parse_fields("Role: navigation\nPosition: left side\nspans full height\nCSS:\nnav {\n  width: 20%;\n}");
        let labels: Vec<&str> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Role", "Position", "CSS", "width"]);
        assert_eq!(fields[1].content, "left side\nspans full height");
        assert_eq!(fields[2].content, "nav {");
        assert!(fields[2].is_code);
    }

    #[test]
    fn colon_inside_code_line_opens_a_new_field() {
        let fields = parse_fields("Code suggestions: <a href=\"#\">\na:hover { color: red }\n:root {\n}");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].label, "Code suggestions");
        assert_eq!(fields[0].content, "<a href=\"#\">");
        assert_eq!(fields[1].label, "a");
        // A line starting with ':' has no label and stays a continuation.
        assert_eq!(fields[1].content, "hover { color: red }\n:root {\n}");
    }

    #[test]
    fn text_before_first_label_becomes_unlabeled_field() {
        let fields = parse_fields("Overview of the header\nRole: banner");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].label, "");
        assert_eq!(fields[0].content, "Overview of the header");
        assert_eq!(fields[1].label, "Role");
    }

    #[test]
    fn unstructured_text_is_single_unlabeled_field() {
        let fields = parse_fields("  The header lacks a landmark role.  ");
        assert_eq!(fields, vec![LabeledField::unlabeled("The header lacks a landmark role.")]);
        assert!(!fields[0].is_code);
    }

    #[test]
    fn blank_description_has_no_fields() {
        assert!(parse_fields("   ").is_empty());
    }
}
