//! Structured text parser: the prose half of a response.
//!
//! The prompt asks for numbered sections (`1. Navigation Panel`), each with
//! dash items (`- Role : banner`), free paragraphs and fenced code. Parsing
//! is a single pass over lines driven by [`step`], an explicit transition
//! function over [`ParserState`].

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

const CODE_FENCE: &str = "```";
const ITEM_PREFIX: &str = "- ";
const ITEM_SEPARATOR: &str = " : ";

/// One entry inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SectionItem {
    /// `- Label : content`
    Labeled { label: String, content: String },
    /// Contents of a fenced block, trimmed.
    Code { content: String },
    /// Consecutive free lines joined with single spaces.
    Text { content: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedSection {
    pub title: String,
    pub items: Vec<SectionItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    /// Document heading such as `📊 **Analyse Contraste (GPT-4o) terminée**`.
    MainTitle { content: String },
    Section(ParsedSection),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    pub blocks: Vec<Block>,
}

impl ParsedDocument {
    pub fn sections(&self) -> impl Iterator<Item = &ParsedSection> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Section(s) => Some(s),
            Block::MainTitle { .. } => None,
        })
    }

    pub fn main_title(&self) -> Option<&str> {
        self.blocks.iter().find_map(|b| match b {
            Block::MainTitle { content } => Some(content.as_str()),
            Block::Section(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Render as formatted plain prose (used for exports and chat transcripts).
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            if !out.is_empty() {
                out.push('\n');
            }
            match block {
                Block::MainTitle { content } => {
                    out.push_str(content);
                    out.push('\n');
                    out.push_str(&"=".repeat(content.chars().count()));
                    out.push('\n');
                }
                Block::Section(section) => {
                    out.push_str(&section.title);
                    out.push('\n');
                    for item in &section.items {
                        match item {
                            SectionItem::Labeled { label, content } if content.is_empty() => {
                                out.push_str(&format!("  • {}\n", label));
                            }
                            SectionItem::Labeled { label, content } => {
                                out.push_str(&format!("  • {}: {}\n", label, content));
                            }
                            SectionItem::Code { content } => {
                                for line in content.lines() {
                                    out.push_str("      ");
                                    out.push_str(line);
                                    out.push('\n');
                                }
                            }
                            SectionItem::Text { content } => {
                                out.push_str("  ");
                                out.push_str(content);
                                out.push('\n');
                            }
                        }
                    }
                }
            }
        }
        out
    }
}

/// Parser state between two lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserState {
    /// Before the first numbered section.
    Idle,
    InSection(ParsedSection),
    /// Inside a fence; `section` is where the block lands when it closes.
    InCodeBlock {
        section: Option<ParsedSection>,
        buffer: String,
    },
}

impl ParserState {
    fn from_section(section: Option<ParsedSection>) -> Self {
        match section {
            Some(s) => Self::InSection(s),
            None => Self::Idle,
        }
    }
}

fn section_header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\.\s(.*)$").expect("section pattern is valid"))
}

/// Parse the textual part of a response. Pure and deterministic.
pub fn parse_sections(textual: &str) -> ParsedDocument {
    let mut state = ParserState::Idle;
    let mut blocks = Vec::new();

    for line in textual.lines() {
        let (next, emitted) = step(state, line);
        state = next;
        blocks.extend(emitted);
    }
    blocks.extend(finish(state));

    ParsedDocument { blocks }
}

/// Advance the parser by one line, returning the new state and any
/// completed block.
pub fn step(state: ParserState, line: &str) -> (ParserState, Option<Block>) {
    match state {
        ParserState::InCodeBlock { section, mut buffer } => {
            if !line.contains(CODE_FENCE) {
                buffer.push_str(line);
                buffer.push('\n');
                return (ParserState::InCodeBlock { section, buffer }, None);
            }
            let content = buffer.trim().to_string();
            match section {
                Some(mut s) => {
                    s.items.push(SectionItem::Code { content });
                    (ParserState::InSection(s), None)
                }
                None => {
                    log::debug!("[SECTIONS] Code block outside any section discarded");
                    (ParserState::Idle, None)
                }
            }
        }
        ParserState::Idle => outside_code(None, line),
        ParserState::InSection(s) => outside_code(Some(s), line),
    }
}

/// Close the parser at end of input.
pub fn finish(state: ParserState) -> Option<Block> {
    match state {
        ParserState::Idle => None,
        ParserState::InSection(s) => Some(Block::Section(s)),
        ParserState::InCodeBlock { section, buffer } => {
            log::warn!("[SECTIONS] Unclosed code fence at end of text");
            let mut s = section?;
            let content = buffer.trim().to_string();
            if !content.is_empty() {
                s.items.push(SectionItem::Code { content });
            }
            Some(Block::Section(s))
        }
    }
}

fn outside_code(section: Option<ParsedSection>, line: &str) -> (ParserState, Option<Block>) {
    if is_main_title(line) {
        let title = Block::MainTitle {
            content: clean_main_title(line),
        };
        return (ParserState::from_section(section), Some(title));
    }

    if let Some(caps) = section_header_pattern().captures(line) {
        let next = ParsedSection {
            title: caps[1].trim().to_string(),
            items: Vec::new(),
        };
        return (ParserState::InSection(next), section.map(Block::Section));
    }

    if line.contains(CODE_FENCE) {
        let state = ParserState::InCodeBlock {
            section,
            buffer: String::new(),
        };
        return (state, None);
    }

    let Some(mut s) = section else {
        return (ParserState::Idle, None);
    };

    if let Some(rest) = line.strip_prefix(ITEM_PREFIX) {
        let (label, content) = rest.split_once(ITEM_SEPARATOR).unwrap_or((rest, ""));
        s.items.push(SectionItem::Labeled {
            label: label.trim().to_string(),
            content: content.trim().to_string(),
        });
    } else if !line.trim().is_empty() {
        match s.items.last_mut() {
            Some(SectionItem::Text { content }) => {
                content.push(' ');
                content.push_str(line.trim());
            }
            _ => s.items.push(SectionItem::Text {
                content: line.trim().to_string(),
            }),
        }
    }

    (ParserState::InSection(s), None)
}

fn is_main_title(line: &str) -> bool {
    line.contains("**Analyse") && line.contains("terminée**")
}

/// Drop bold markers and any leading emoji or punctuation.
fn clean_main_title(line: &str) -> String {
    line.replace("**", "")
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(label: &str, content: &str) -> SectionItem {
        SectionItem::Labeled {
            label: label.to_string(),
            content: content.to_string(),
        }
    }

    fn text(content: &str) -> SectionItem {
        SectionItem::Text {
            content: content.to_string(),
        }
    }

    fn code(content: &str) -> SectionItem {
        SectionItem::Code {
            content: content.to_string(),
        }
    }

    #[test]
    fn numbered_lines_start_sections() {
        let doc = parse_sections("1. Header\n- Role : banner\n2. Footer\n- Role : contentinfo");
        let sections: Vec<_> = doc.sections().collect();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Header");
        assert_eq!(sections[0].items, vec![labeled("Role", "banner")]);
        assert_eq!(sections[1].title, "Footer");
    }

    #[test]
    fn item_content_keeps_further_separators() {
        let doc = parse_sections("1. Nav\n- Ratio : 3 : 1 measured");
        let section = doc.sections().next().unwrap();
        assert_eq!(section.items, vec![labeled("Ratio", "3 : 1 measured")]);
    }

    #[test]
    fn item_without_separator_is_all_label() {
        let doc = parse_sections("1. Nav\n- Missing skip link");
        assert_eq!(
            doc.sections().next().unwrap().items,
            vec![labeled("Missing skip link", "")]
        );
    }

    #[test]
    fn free_lines_coalesce_into_one_paragraph() {
        let doc = parse_sections("1. Nav\nThe sidebar is\nwell structured.\n\n- Role : navigation\nAfter item");
        let items = &doc.sections().next().unwrap().items;
        assert_eq!(
            items,
            &vec![
                text("The sidebar is well structured."),
                labeled("Role", "navigation"),
                text("After item"),
            ]
        );
    }

    #[test]
    fn code_blocks_are_verbatim() {
        let input = "1. Form\n```html\n<label for=\"q\">Search</label>\n2. not a section\n- not an item\n```\n- Fix : add label";
        let doc = parse_sections(input);
        let sections: Vec<_> = doc.sections().collect();
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].items,
            vec![
                code("<label for=\"q\">Search</label>\n2. not a section\n- not an item"),
                labeled("Fix", "add label"),
            ]
        );
    }

    #[test]
    fn code_block_before_any_section_is_discarded() {
        let doc = parse_sections("```\nconst x = 1\n```\n1. Nav\n- Role : navigation");
        let sections: Vec<_> = doc.sections().collect();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].items, vec![labeled("Role", "navigation")]);
    }

    #[test]
    fn unclosed_code_block_is_flushed() {
        let doc = parse_sections("1. Nav\n```\n<nav>\n");
        assert_eq!(doc.sections().next().unwrap().items, vec![code("<nav>")]);
    }

    #[test]
    fn main_title_is_detected_and_cleaned() {
        let doc = parse_sections("📊 **Analyse Navigation (Claude 3.5 Sonnet) terminée**\n\n1. Header\n- Role : banner");
        assert_eq!(doc.main_title(), Some("Analyse Navigation (Claude 3.5 Sonnet) terminée"));
        assert!(matches!(doc.blocks[0], Block::MainTitle { .. }));
        assert_eq!(doc.sections().count(), 1);
    }

    #[test]
    fn preamble_before_first_section_is_ignored() {
        let doc = parse_sections("Here is my analysis.\n- stray : item\n1. Header");
        let sections: Vec<_> = doc.sections().collect();
        assert_eq!(sections.len(), 1);
        assert!(sections[0].items.is_empty());
    }

    #[test]
    fn step_transitions() {
        let (state, emitted) = step(ParserState::Idle, "1. Header");
        assert!(emitted.is_none());
        assert!(matches!(state, ParserState::InSection(ref s) if s.title == "Header"));

        let (state, _) = step(state, "```");
        assert!(matches!(state, ParserState::InCodeBlock { section: Some(_), .. }));

        let (state, _) = step(state, "<header>");
        let (state, _) = step(state, "```");
        let (state, emitted) = step(state, "2. Next");
        match emitted {
            Some(Block::Section(s)) => assert_eq!(s.items, vec![code("<header>")]),
            other => panic!("expected flushed section, got {:?}", other),
        }
        assert!(matches!(finish(state), Some(Block::Section(s)) if s.title == "Next"));
    }

    #[test]
    fn parsing_is_deterministic() {
        let input = "1. A\n- x : y\ntext\n```\ncode\n```\n2. B";
        assert_eq!(parse_sections(input), parse_sections(input));
    }

    #[test]
    fn render_text_formats_items() {
        let doc = parse_sections("1. Header\n- Role : banner\nSome words.");
        assert_eq!(doc.render_text(), "Header\n  • Role: banner\n  Some words.\n");
    }
}
