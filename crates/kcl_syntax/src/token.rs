//! Token and trivia types produced by the lexer.
//!
//! Every token carries the exact source range of its characters plus the
//! trivia (comments, blank-line runs) that preceded it. Trivia is captured
//! here rather than discarded so the parser can later attach it to AST nodes
//! without re-scanning the source text.

use kcl_base::{Span, Symbol};

/// A unit suffix on a number literal, or the explicit unitless marker `_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSuffix {
    Mm,
    Cm,
    M,
    In,
    Ft,
    Yd,
    Deg,
    Rad,
    /// The `_` suffix: explicitly marks a number as having no unit.
    Unitless,
}

impl UnitSuffix {
    pub fn from_str(s: &str) -> Option<UnitSuffix> {
        Some(match s {
            "mm" => UnitSuffix::Mm,
            "cm" => UnitSuffix::Cm,
            "m" => UnitSuffix::M,
            "in" => UnitSuffix::In,
            "ft" => UnitSuffix::Ft,
            "yd" => UnitSuffix::Yd,
            "deg" => UnitSuffix::Deg,
            "rad" => UnitSuffix::Rad,
            "_" => UnitSuffix::Unitless,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitSuffix::Mm => "mm",
            UnitSuffix::Cm => "cm",
            UnitSuffix::M => "m",
            UnitSuffix::In => "in",
            UnitSuffix::Ft => "ft",
            UnitSuffix::Yd => "yd",
            UnitSuffix::Deg => "deg",
            UnitSuffix::Rad => "rad",
            UnitSuffix::Unitless => "_",
        }
    }
}

/// The kind of a lexical token. Comments are never tokens in this stream;
/// they are captured as [`TriviaEvent`]s attached to the following token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(Symbol),

    Number { value: f64, unit: Option<UnitSuffix> },
    Str(String),

    True,
    False,
    Nil,
    Fn,
    Let,
    Return,
    If,
    Else,
    Import,
    Export,
    As,
    From,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Dot,
    At,
    Dollar,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    EqEq,
    BangEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Amp,
    Pipe,
    Bang,
    Eq,
    PipeGt,

    DotDot,
    DotDotLt,

    Eof,
}

impl TokenKind {
    /// True for tokens that begin a statement; used by error recovery to
    /// find a resync point.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::At
                | TokenKind::Import
                | TokenKind::Export
                | TokenKind::Fn
                | TokenKind::Let
                | TokenKind::Return
        )
    }

    pub fn keyword_from_ident(s: &str) -> Option<TokenKind> {
        Some(match s {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "nil" => TokenKind::Nil,
            "fn" => TokenKind::Fn,
            "let" => TokenKind::Let,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "import" => TokenKind::Import,
            "export" => TokenKind::Export,
            "as" => TokenKind::As,
            "from" => TokenKind::From,
            _ => return None,
        })
    }
}

/// A raw comment event recorded by the lexer between two tokens, together
/// with how many newlines separated it from whatever came before it.
///
/// `newlines_before == 0` means the comment sits on the same source line as
/// the previous token; `1` means it starts the very next line with no blank
/// line in between; `2` or more implies `newlines_before - 1` blank (or
/// whitespace-only) lines preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct TriviaEvent {
    pub newlines_before: u32,
    pub is_block: bool,
    pub text: String,
    pub span: Span,
}

/// A single lexical token: its kind, its exact source range, and whatever
/// comment/blank-line trivia preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Comments that appeared between the previous token and this one.
    pub leading_trivia: Vec<TriviaEvent>,
    /// Newlines between the last trivia item (or the previous token, if
    /// none) and this token. `0` means this token is on the same source
    /// line as whatever preceded it.
    pub newlines_before: u32,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span, leading_trivia: Vec::new(), newlines_before: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_suffix_roundtrips() {
        for s in ["mm", "cm", "m", "in", "ft", "yd", "deg", "rad", "_"] {
            let unit = UnitSuffix::from_str(s).unwrap();
            assert_eq!(unit.as_str(), s);
        }
    }

    #[test]
    fn unknown_unit_suffix_is_none() {
        assert!(UnitSuffix::from_str("kg").is_none());
    }

    #[test]
    fn keyword_from_ident_recognizes_reserved_words() {
        assert_eq!(TokenKind::keyword_from_ident("let"), Some(TokenKind::Let));
        assert_eq!(TokenKind::keyword_from_ident("fn"), Some(TokenKind::Fn));
        assert_eq!(TokenKind::keyword_from_ident("banana"), None);
    }

    #[test]
    fn starts_statement_recognizes_statement_keywords() {
        assert!(TokenKind::Let.starts_statement());
        assert!(TokenKind::Fn.starts_statement());
        assert!(!TokenKind::Plus.starts_statement());
    }
}
