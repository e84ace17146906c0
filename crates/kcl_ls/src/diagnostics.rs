//! Converts [`kcl_syntax::Diagnostic`] (lex/parse/lint findings, already in
//! editor coordinates) to `tower-lsp`'s wire type.

use tower_lsp::lsp_types::{Diagnostic as LspDiagnostic, DiagnosticSeverity, NumberOrString, Position, Range};

use kcl_syntax::{Diagnostic, Severity};

pub fn convert_all(diagnostics: &[Diagnostic]) -> Vec<LspDiagnostic> {
    diagnostics.iter().map(convert).collect()
}

fn convert(diagnostic: &Diagnostic) -> LspDiagnostic {
    LspDiagnostic {
        range: convert_range(diagnostic.range),
        severity: Some(convert_severity(diagnostic.severity)),
        code: diagnostic.code.clone().map(NumberOrString::String),
        source: Some(diagnostic.source.clone()),
        message: diagnostic.message.clone(),
        ..Default::default()
    }
}

fn convert_range(range: kcl_syntax::Range) -> Range {
    Range {
        start: Position { line: range.start.line, character: range.start.character },
        end: Position { line: range.end.line, character: range.end.character },
    }
}

fn convert_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Information => DiagnosticSeverity::INFORMATION,
        Severity::Hint => DiagnosticSeverity::HINT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcl_syntax::line_index::Position as KclPosition;

    #[test]
    fn converts_range_and_severity() {
        let diagnostic = Diagnostic::new(
            kcl_syntax::Range::new(KclPosition::new(0, 4), KclPosition::new(0, 15)),
            Severity::Warning,
            "kcl",
            "'my_variable' should be camelCase",
        )
        .with_code("camel-case");

        let converted = convert(&diagnostic);
        assert_eq!(converted.range.start.line, 0);
        assert_eq!(converted.range.start.character, 4);
        assert_eq!(converted.severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(converted.code, Some(NumberOrString::String("camel-case".to_string())));
    }

    #[test]
    fn converts_every_severity_level() {
        for (severity, expected) in [
            (Severity::Error, DiagnosticSeverity::ERROR),
            (Severity::Warning, DiagnosticSeverity::WARNING),
            (Severity::Information, DiagnosticSeverity::INFORMATION),
            (Severity::Hint, DiagnosticSeverity::HINT),
        ] {
            assert_eq!(convert_severity(severity), expected);
        }
    }

    #[test]
    fn convert_all_preserves_order() {
        let diagnostics = vec![
            Diagnostic::new(
                kcl_syntax::Range::new(KclPosition::new(0, 0), KclPosition::new(0, 1)),
                Severity::Error,
                "kcl",
                "first",
            ),
            Diagnostic::new(
                kcl_syntax::Range::new(KclPosition::new(1, 0), KclPosition::new(1, 1)),
                Severity::Warning,
                "kcl",
                "second",
            ),
        ];
        let converted = convert_all(&diagnostics);
        assert_eq!(converted[0].message, "first");
        assert_eq!(converted[1].message, "second");
    }
}
