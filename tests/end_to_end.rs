//! Raw model reply → split → decode → sections/fields → overlay.

use ainalyzer_lib::llm::{completion_heading, process_response, Provider};
use ainalyzer_lib::overlay::{AnnotationOverlay, RenderBox, PALETTE};
use ainalyzer_lib::response::{self, AnnotationType, CoordinatePolicy, TokenUsage};
use ainalyzer_lib::text::{parse_fields, parse_sections, ParseCache, ParsedSection, SectionItem};
use ainalyzer_lib::{ParseWarning, Settings};

const RAW: &str = "1. Header\n- Role : banner\n\n---ANNOTATIONS---\n{\"annotations\":[{\"id\":\"a1\",\"type\":\"issue\",\"title\":\"T\",\"description\":\"Role : banner\",\"x\":0,\"y\":0,\"width\":10,\"height\":10,\"color\":\"#fff\"}]}";

#[test]
fn raw_reply_parses_into_section_and_annotation() {
    let split = response::split(RAW);
    assert_eq!(split.textual, "1. Header\n- Role : banner");

    let doc = parse_sections(&split.textual);
    assert_eq!(
        doc.sections().collect::<Vec<_>>(),
        vec![&ParsedSection {
            title: "Header".into(),
            items: vec![SectionItem::Labeled {
                label: "Role".into(),
                content: "banner".into(),
            }],
        }]
    );

    let decoded = response::decode(split.annotations_json.as_deref());
    assert!(decoded.is_clean());
    assert_eq!(decoded.annotations.len(), 1);
    let a = &decoded.annotations[0];
    assert_eq!(a.id, "a1");
    assert_eq!(a.annotation_type, AnnotationType::Issue);
    assert_eq!(a.title, "T");
    assert_eq!((a.x, a.y, a.width, a.height), (0.0, 0.0, 10.0, 10.0));
    assert_eq!(a.color.as_deref(), Some("#fff"));

    let fields = parse_fields(&a.description);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].label, "Role");
    assert_eq!(fields[0].content, "banner");
    assert!(!fields[0].is_code);
}

#[test]
fn missing_delimiter_falls_back_to_embedded_json() {
    let raw = "Some prose.\n{\"annotations\":[{\"id\":\"z\",\"type\":\"info\",\"title\":\"Z\",\"description\":\"\",\"x\":1,\"y\":2,\"width\":3,\"height\":4}]}";
    let split = response::split(raw);
    assert_eq!(split.textual, raw);

    let decoded = response::decode(split.annotations_json.as_deref());
    assert_eq!(decoded.annotations.len(), 1);
    assert_eq!(decoded.annotations[0].id, "z");
}

#[test]
fn out_of_range_boxes_follow_policy() {
    let raw = "1. Footer\n---ANNOTATIONS---\n{\"annotations\":[\
{\"id\":\"f\",\"type\":\"recommendation\",\"title\":\"F\",\"description\":\"\",\"x\":90,\"y\":95,\"width\":30,\"height\":10}]}";

    let clamped = process_response("nav", Provider::OpenAi, "gpt-4o", raw, TokenUsage::default(), CoordinatePolicy::Clamp);
    assert_eq!(clamped.annotations.len(), 1);
    assert_eq!(clamped.annotations[0].width, 10.0);
    assert_eq!(clamped.annotations[0].height, 5.0);
    assert!(clamped
        .warnings
        .iter()
        .all(|w| matches!(w, ParseWarning::OutOfBounds { clamped: true, .. })));
    assert_eq!(clamped.dropped_annotations(), 0);

    let dropped = process_response("nav", Provider::OpenAi, "gpt-4o", raw, TokenUsage::default(), CoordinatePolicy::Drop);
    assert!(dropped.annotations.is_empty());
    assert_eq!(dropped.dropped_annotations(), 1);
}

#[test]
fn overlay_exposes_percent_boxes_and_toggles() {
    let raw = "1. Header\n---ANNOTATIONS---\n{\"annotations\":[\
{\"id\":\"h\",\"type\":\"issue\",\"title\":\"Header\",\"description\":\"Role : banner | Code suggestions : <header role=\\\"banner\\\">\",\"x\":10,\"y\":20,\"width\":30,\"height\":15}]}";
    let contrast = "1. Body\n---ANNOTATIONS---\n{\"annotations\":[\
{\"id\":\"b\",\"type\":\"info\",\"title\":\"Body\",\"description\":\"Contrast is fine\",\"x\":0,\"y\":40,\"width\":100,\"height\":50}]}";

    let mut overlay = AnnotationOverlay::new();
    overlay.add_result(process_response("nav", Provider::Anthropic, "claude", raw, TokenUsage::default(), CoordinatePolicy::Clamp));
    overlay.add_result(process_response("contrast", Provider::Anthropic, "claude", contrast, TokenUsage::default(), CoordinatePolicy::Clamp));

    let items = overlay.visible_annotations();
    assert_eq!(items.len(), 2);
    let css = &items[0].css;
    assert_eq!((css.left.as_str(), css.top.as_str()), ("10%", "20%"));
    assert_eq!((css.width.as_str(), css.height.as_str()), ("30%", "15%"));
    assert_eq!(items[0].color, PALETTE[0]);
    assert_eq!(items[1].color, PALETTE[1]);

    // Partial visibility resolves to all visible, then all hidden.
    overlay.toggle_type("contrast");
    assert_eq!(overlay.visible_annotations().len(), 1);
    assert!(overlay.toggle_all());
    assert_eq!(overlay.visible_annotations().len(), 2);
    assert!(!overlay.toggle_all());
    assert!(overlay.visible_annotations().is_empty());
    overlay.toggle_all();

    // Click inside the header box on a 1000x500 render.
    let render = RenderBox::new(1000.0, 500.0);
    let hit = overlay.select_at(200.0, 120.0, render);
    assert_eq!(hit.map(|s| s.annotation_id).as_deref(), Some("h"));

    let cache = ParseCache::from_settings(&Settings::default());
    let fields = overlay.selected_fields(&cache).unwrap_or_default();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[1].label, "Code suggestions");
    assert!(fields[1].is_code);
}

#[test]
fn heading_and_sections_render_together() {
    let textual = format!(
        "{}\n1. Navigation\n- Role : landmark\n```\n<nav aria-label=\"Main\">\n```\nExtra note\n2. Footer",
        completion_heading("Navigation", "Claude")
    );
    let doc = ParseCache::default().sections(&textual);
    assert_eq!(doc.main_title(), Some("Analyse Navigation (Claude) terminée"));

    let sections: Vec<_> = doc.sections().collect();
    assert_eq!(sections.len(), 2);
    assert_eq!(
        sections[0].items,
        vec![
            SectionItem::Labeled {
                label: "Role".into(),
                content: "landmark".into()
            },
            SectionItem::Code {
                content: "<nav aria-label=\"Main\">".into()
            },
            SectionItem::Text {
                content: "Extra note".into()
            },
        ]
    );
    assert!(sections[1].items.is_empty());
}

#[test]
fn repeated_id_cannot_select_the_wrong_box() {
    let raw = "1. First\n2. Second\n---ANNOTATIONS---\n{\"annotations\":[\
{\"id\":\"zone_1\",\"type\":\"info\",\"title\":\"First\",\"description\":\"\",\"x\":0,\"y\":0,\"width\":10,\"height\":10},\
{\"id\":\"zone_1\",\"type\":\"info\",\"title\":\"Second\",\"description\":\"\",\"x\":50,\"y\":50,\"width\":10,\"height\":10}]}";
    let result = process_response("nav", Provider::Anthropic, "claude", raw, TokenUsage::default(), CoordinatePolicy::Clamp);
    assert_eq!(result.annotations.len(), 1);
    assert_eq!(result.dropped_annotations(), 1);

    let mut overlay = AnnotationOverlay::new();
    overlay.add_result(result);
    let render = RenderBox::new(1000.0, 1000.0);

    // The second box was dropped, so its area holds nothing to select.
    assert!(overlay.select_at(550.0, 550.0, render).is_none());
    assert!(overlay.selected().is_none());

    overlay.select_at(50.0, 50.0, render);
    assert_eq!(overlay.selected().map(|a| a.title.as_str()), Some("First"));
}
