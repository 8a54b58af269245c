//! Prompt construction for analysis requests.
//!
//! The system prompt of every analysis type is extended with the response
//! contract the parsers rely on: numbered sections in the prose, one
//! annotation per section, and the annotation JSON after the delimiter.

use crate::response::ANNOTATIONS_DELIMITER;
use serde::{Deserialize, Serialize};

pub const MAX_TOKENS: u32 = 4000;
pub const TEMPERATURE: f32 = 0.1;

/// User turn sent alongside the screenshot.
pub const USER_INSTRUCTION: &str = "Analyze this image according to the requested criteria. \
First provide a conversational analysis, then the annotations with precise coordinates.";

/// Field layout requested for annotation descriptions when the analysis
/// type does not define its own.
pub const DEFAULT_FORMATTING: &str = "Role and function : [description] | \
Position and hierarchy : [description] | Visual boundaries : [description] | \
Accessibility issues : [list] | Code suggestions : [HTML/CSS code]";

pub const DEFAULT_ANNOTATION_RULES: &str =
    "Precise coordinates as percentages of the image. x,y = top-left corner of the zone.";

/// One configured analysis type. Optional prompt parts fall back to the
/// defaults above when absent or blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisTypeConfig {
    pub id: String,
    pub name: String,
    pub system_prompt: String,
    pub coordination_prompt: Option<String>,
    pub formatting_instructions: Option<String>,
    pub annotation_rules: Option<String>,
}

impl AnalysisTypeConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            system_prompt: system_prompt.into(),
            ..Self::default()
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// System prompt plus coordination instructions plus the response contract.
pub fn build_enhanced_prompt(analysis: &AnalysisTypeConfig) -> String {
    let mut prompt = analysis.system_prompt.clone();

    if let Some(coordination) = non_blank(&analysis.coordination_prompt) {
        prompt.push_str("\n\nSPECIFIC COORDINATION INSTRUCTIONS:\n");
        prompt.push_str(coordination);
    }

    let formatting = non_blank(&analysis.formatting_instructions).unwrap_or(DEFAULT_FORMATTING);
    let rules = non_blank(&analysis.annotation_rules).unwrap_or(DEFAULT_ANNOTATION_RULES);

    prompt.push_str(&format!(
        r##"

TECHNICAL INSTRUCTIONS FOR THE RESPONSE:
Your response must be structured in two parts:

1. TEXTUAL ANALYSIS: Follow the system prompt above exactly.
   STRUCTURE your analysis with numbered sections (1., 2., 3., etc.) for each zone identified.

2. ANNOTATIONS: For each numbered section of your analysis, create ONE matching annotation:
{{
  "annotations": [
    {{
      "id": "zone_1",
      "type": "info",
      "title": "Zone name (e.g. Side Navigation, Header)",
      "description": "STRUCTURE the content with this exact format: {formatting}",
      "x": [X position as a percentage 0-100],
      "y": [Y position as a percentage 0-100],
      "width": [width as a percentage],
      "height": [height as a percentage],
      "color": "#0066cc"
    }}
  ]
}}

CRUCIAL TECHNICAL RULES:
{rules}
- Each annotation must carry the FULL content of its section
- Include ALL details in the specified format
- Do not summarize or shorten: copy ALL the text of each section

Separate the two parts with "{delimiter}""##,
        formatting = formatting,
        rules = rules,
        delimiter = ANNOTATIONS_DELIMITER,
    ));

    prompt
}

/// Heading the host prepends to a finished analysis, e.g.
/// `📊 **Analyse Navigation (Claude) terminée**`. The text parser
/// recognizes this line as the main title.
pub fn completion_heading(type_name: &str, model_label: &str) -> String {
    format!("📊 **Analyse {} ({}) terminée**", type_name, model_label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{parse_sections, Block};

    #[test]
    fn defaults_fill_missing_parts() {
        let analysis = AnalysisTypeConfig::new("nav", "Navigation", "You are an auditor.");
        let prompt = build_enhanced_prompt(&analysis);
        assert!(prompt.starts_with("You are an auditor."));
        assert!(!prompt.contains("COORDINATION"));
        assert!(prompt.contains(DEFAULT_FORMATTING));
        assert!(prompt.contains(DEFAULT_ANNOTATION_RULES));
        assert!(prompt.ends_with("\"---ANNOTATIONS---\""));
    }

    #[test]
    fn custom_parts_replace_defaults() {
        let analysis = AnalysisTypeConfig {
            coordination_prompt: Some("Focus on landmarks.".into()),
            formatting_instructions: Some("Issue : [text]".into()),
            annotation_rules: Some("   ".into()),
            ..AnalysisTypeConfig::new("nav", "Navigation", "Audit.")
        };
        let prompt = build_enhanced_prompt(&analysis);
        assert!(prompt.contains("SPECIFIC COORDINATION INSTRUCTIONS:\nFocus on landmarks."));
        assert!(prompt.contains("this exact format: Issue : [text]"));
        assert!(!prompt.contains(DEFAULT_FORMATTING));
        // Blank rules fall back.
        assert!(prompt.contains(DEFAULT_ANNOTATION_RULES));
    }

    #[test]
    fn example_annotation_keeps_hex_color_and_braces() {
        let prompt = build_enhanced_prompt(&AnalysisTypeConfig::new("nav", "Navigation", "Audit."));
        assert!(prompt.contains("\"color\": \"#0066cc\"\n    }\n  ]\n}"));
        assert!(prompt.contains("{\n  \"annotations\": ["));
    }

    #[test]
    fn heading_is_recognized_as_main_title() {
        let heading = completion_heading("Navigation", "Claude");
        let doc = parse_sections(&heading);
        assert!(matches!(
            doc.blocks.first(),
            Some(Block::MainTitle { content }) if content == "Analyse Navigation (Claude) terminée"
        ));
    }
}
