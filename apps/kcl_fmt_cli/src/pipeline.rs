//! Drives a source string through the front end and formatter, surfacing
//! parse errors as a single readable message rather than a diagnostic list.

use kcl_base::Interner;
use kcl_syntax::parser::{self};
use kcl_syntax::token::Token;
use kcl_syntax::Severity;

/// A formatted document plus the tokens of its *own* output, ready for
/// syntax highlighting. Re-lexing the formatted text (rather than reusing
/// the original parse) keeps spans aligned with what's actually printed.
pub struct Formatted {
    pub text: String,
    pub tokens: Vec<Token>,
}

pub fn format_source(source: &str) -> Result<Formatted, String> {
    let mut interner = Interner::new();
    let parse_result = parser::parse(source, &mut interner);

    let errors: Vec<_> = parse_result.diagnostics.iter().filter(|d| d.severity == Severity::Error).collect();
    if !errors.is_empty() {
        let mut message = String::new();
        for diagnostic in &errors {
            message.push_str(&format!(
                "{}:{}: {}\n",
                diagnostic.range.start.line + 1,
                diagnostic.range.start.character + 1,
                diagnostic.message
            ));
        }
        return Err(message.trim_end().to_string());
    }

    let text = kcl_syntax::format(&parse_result, &interner, Some(source));

    let mut highlight_interner = Interner::new();
    let reparsed = parser::parse(&text, &mut highlight_interner);
    Ok(Formatted { text, tokens: reparsed.tokens })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_valid_source() {
        let formatted = format_source("let   x=1\n").unwrap();
        assert!(formatted.text.contains("let x = 1"));
    }

    #[test]
    fn reports_parse_errors_with_line_and_column() {
        let err = format_source("let x = \nlet y = 2").unwrap_err();
        assert!(err.contains(':'));
    }
}
