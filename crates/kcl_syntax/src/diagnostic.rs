//! The `Diagnostic` shape shared by lex errors, parse errors and lint
//! findings, in editor-protocol coordinates (0-based line/character).

use crate::line_index::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Range { start, end }
    }
}

/// Severity encoding follows editor-protocol convention:
/// `1 = error, 2 = warning, 3 = info, 4 = hint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error = 1,
    Warning = 2,
    Information = 3,
    Hint = 4,
}

impl Severity {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub source: String,
    pub message: String,
    pub code: Option<String>,
}

impl Diagnostic {
    pub fn new(range: Range, severity: Severity, source: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic { range, severity, source: source.into(), message: message.into(), code: None }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_numeric_encoding_matches_editor_protocol() {
        assert_eq!(Severity::Error.as_u8(), 1);
        assert_eq!(Severity::Warning.as_u8(), 2);
        assert_eq!(Severity::Information.as_u8(), 3);
        assert_eq!(Severity::Hint.as_u8(), 4);
    }

    #[test]
    fn with_code_sets_optional_code() {
        let diag = Diagnostic::new(
            Range::new(Position::new(0, 0), Position::new(0, 1)),
            Severity::Error,
            "kcl",
            "bad token",
        )
        .with_code("grammar-error");
        assert_eq!(diag.code.as_deref(), Some("grammar-error"));
    }
}
