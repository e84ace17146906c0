use tower_lsp::lsp_types::{Position, Range, TextEdit};

use crate::document::DocumentState;

/// Formats `doc` as a single whole-document [`TextEdit`]. Returns nothing
/// when the document failed to parse — formatting an unparseable document
/// would just echo the error recovery output back as "correct" style.
pub fn format_document(doc: &DocumentState) -> Vec<TextEdit> {
    if !doc.parse_result.success {
        return Vec::new();
    }

    let formatted = kcl_syntax::format(&doc.parse_result, &doc.interner, Some(&doc.source));
    if formatted == doc.source {
        return Vec::new();
    }

    let end_line = doc.parse_result.line_index.line_count() as u32;
    vec![TextEdit {
        range: Range { start: Position { line: 0, character: 0 }, end: Position { line: end_line, character: 0 } },
        new_text: formatted,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_clean_document_produces_no_edit_when_already_formatted() {
        let doc = DocumentState::new("let x = 1\n".to_string(), 1);
        let edits = format_document(&doc);
        assert!(edits.is_empty());
    }

    #[test]
    fn formatting_normalizes_blank_line_runs() {
        let doc = DocumentState::new("x = 1\n\n\n\n\ny = 2".to_string(), 1);
        let edits = format_document(&doc);
        assert_eq!(edits.len(), 1);
        assert!(edits[0].new_text.contains("x = 1\n\n\ny = 2"));
    }

    #[test]
    fn formatting_unparseable_document_returns_no_edits() {
        let doc = DocumentState::new("let x = \nlet y = 2".to_string(), 1);
        let edits = format_document(&doc);
        assert!(edits.is_empty());
    }
}
