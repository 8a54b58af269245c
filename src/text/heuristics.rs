//! Code-snippet heuristics for annotation fields.
//!
//! Decides whether a labeled field should be rendered as a monospace code
//! panel. Deliberately permissive: a false positive only changes styling.

/// Label fragments (lowercase) that mark a field as code.
const CODE_LABEL_HINTS: &[&str] = &["code", "html", "css", "suggestion"];

/// Content fragments that mark a field as code.
const CODE_CONTENT_HINTS: &[&str] = &["<", "{", "class=", "aria-", "function", "const ", "var "];

/// Returns true if the label names a code field or the content looks like markup/script.
pub fn looks_like_code(label: &str, content: &str) -> bool {
    let label = label.to_lowercase();
    CODE_LABEL_HINTS.iter().any(|hint| label.contains(hint))
        || CODE_CONTENT_HINTS.iter().any(|hint| content.contains(hint))
}

/// Heuristic for text that carries no label at all.
///
/// Same content hints, plus indented multi-line blocks (more than three
/// lines with a double-space indent somewhere).
pub fn unlabeled_looks_like_code(text: &str) -> bool {
    looks_like_code("", text) || (text.lines().count() > 3 && text.contains("  "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_hints_are_case_insensitive() {
        assert!(looks_like_code("Suggested Code", "plain words"));
        assert!(looks_like_code("HTML", "plain words"));
        assert!(looks_like_code("Suggestions de correction", "plain words"));
        assert!(!looks_like_code("Role", "plain words"));
    }

    #[test]
    fn content_hints() {
        assert!(looks_like_code("Fix", "<nav aria-label=\"main\">"));
        assert!(looks_like_code("Fix", "button { outline: 2px }"));
        assert!(looks_like_code("Fix", "const x = 1"));
        assert!(!looks_like_code("Fix", "increase the contrast ratio"));
    }

    #[test]
    fn indented_block_counts_as_code_only_when_unlabeled() {
        let block = "line one\n  line two\n  line three\n  line four";
        assert!(unlabeled_looks_like_code(block));
        assert!(!unlabeled_looks_like_code("short\n  text"));
        assert!(!looks_like_code("Notes", block));
    }
}
