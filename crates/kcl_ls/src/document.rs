use kcl_base::Interner;
use kcl_syntax::lint::{LintConfig, LintContext, LintEngine};
use kcl_syntax::parser::{self, ParseResult};

/// Per-document state: source text plus the immutable parse result derived
/// from it. Rebuilt wholesale on every edit — there is no incremental
/// re-parse.
pub struct DocumentState {
    pub source: String,
    pub version: i32,
    pub interner: Interner,
    pub parse_result: ParseResult,
    pub lint_diagnostics: Vec<kcl_syntax::Diagnostic>,
}

impl DocumentState {
    pub fn new(source: String, version: i32) -> Self {
        let mut interner = Interner::new();
        let parse_result = parser::parse(&source, &mut interner);
        let lint_diagnostics = run_lints(&parse_result, &interner, &source);
        DocumentState { source, version, interner, parse_result, lint_diagnostics }
    }

    /// Replaces the document's source with `source` and re-derives
    /// everything from scratch. `source` is always the full document text;
    /// the server only supports full-document sync.
    pub fn update(&mut self, source: String, version: i32) {
        let mut interner = Interner::new();
        let parse_result = parser::parse(&source, &mut interner);
        let lint_diagnostics = run_lints(&parse_result, &interner, &source);
        self.source = source;
        self.version = version;
        self.interner = interner;
        self.parse_result = parse_result;
        self.lint_diagnostics = lint_diagnostics;
    }
}

fn run_lints(parse_result: &ParseResult, interner: &Interner, source: &str) -> Vec<kcl_syntax::Diagnostic> {
    let engine = LintEngine::with_default_rules(LintConfig::new());
    let ctx = LintContext {
        program: &parse_result.program,
        tokens: &parse_result.tokens,
        line_index: &parse_result.line_index,
        interner,
        source_text: Some(source),
    };
    engine.run(&ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_parses_and_lints_source() {
        let doc = DocumentState::new("let width = 10mm".to_string(), 1);
        assert_eq!(doc.version, 1);
        assert!(doc.parse_result.success);
        assert!(doc.lint_diagnostics.is_empty());
    }

    #[test]
    fn update_replaces_parse_result() {
        let mut doc = DocumentState::new("let x = 1".to_string(), 1);
        assert_eq!(doc.parse_result.program.body.len(), 1);
        doc.update("let x = 1\nlet y = 2".to_string(), 2);
        assert_eq!(doc.version, 2);
        assert_eq!(doc.parse_result.program.body.len(), 2);
    }

    #[test]
    fn lint_flags_snake_case_binding() {
        let doc = DocumentState::new("let my_variable = 10".to_string(), 1);
        assert_eq!(doc.lint_diagnostics.len(), 1);
        assert!(doc.lint_diagnostics[0].message.contains("camelCase"));
    }

    #[test]
    fn parse_failure_still_populates_program_partially() {
        let doc = DocumentState::new("let x = \nlet y = 2".to_string(), 1);
        assert!(!doc.parse_result.success);
        assert!(!doc.parse_result.program.body.is_empty());
    }
}
