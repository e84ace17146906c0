//! Character-level lexer for KCL source text.
//!
//! Transforms source text into a flat stream of [`Token`]s terminated by an
//! `Eof` sentinel. Comments never become tokens in that stream; they are
//! recorded as [`TriviaEvent`]s on whichever token follows them, so the
//! parser can attach them to AST nodes without re-scanning the source.
//!
//! On an unrecognized character or an unterminated string/block comment the
//! lexer records a [`LexError`] and skips one character to resume, so a
//! single bad character never aborts tokenization of the rest of the file.

use kcl_base::{Interner, Span, Symbol};

use crate::token::{Token, TokenKind, TriviaEvent, UnitSuffix};

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

/// A cursor for traversing source text, tracking byte position only; line
/// and column are derived later via [`crate::line_index::LineIndex`].
struct Cursor<'a> {
    source: &'a str,
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Cursor { source, bytes: source.as_bytes(), position: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.bytes.len()
    }

    fn current(&self) -> char {
        self.char_at(0)
    }

    fn char_at(&self, offset: usize) -> char {
        self.source[self.position + offset..].chars().next().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let ch = self.current();
        self.position += ch.len_utf8();
        ch
    }

    fn matches(&self, ch: char) -> bool {
        self.current() == ch
    }
}

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    interner: &'a mut Interner,
    errors: Vec<LexError>,
    pending_newlines: u32,
    pending_trivia: Vec<TriviaEvent>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, interner: &'a mut Interner) -> Self {
        Lexer {
            cursor: Cursor::new(source),
            interner,
            errors: Vec::new(),
            pending_newlines: 0,
            pending_trivia: Vec::new(),
        }
    }

    /// Lexes the entire source, returning the token stream (ending in
    /// `Eof`) and any lex errors encountered along the way.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<LexError>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        (tokens, self.errors)
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let leading_trivia = std::mem::take(&mut self.pending_trivia);
        let newlines_before = std::mem::take(&mut self.pending_newlines);
        let start = self.cursor.position;

        if self.cursor.is_at_end() {
            return Token {
                kind: TokenKind::Eof,
                span: Span::new(start, start),
                leading_trivia,
                newlines_before,
            };
        }

        let ch = self.cursor.current();
        let kind = match ch {
            '(' => { self.cursor.advance(); TokenKind::LParen }
            ')' => { self.cursor.advance(); TokenKind::RParen }
            '{' => { self.cursor.advance(); TokenKind::LBrace }
            '}' => { self.cursor.advance(); TokenKind::RBrace }
            '[' => { self.cursor.advance(); TokenKind::LBracket }
            ']' => { self.cursor.advance(); TokenKind::RBracket }
            ',' => { self.cursor.advance(); TokenKind::Comma }
            ':' => { self.cursor.advance(); TokenKind::Colon }
            '@' => { self.cursor.advance(); TokenKind::At }
            '$' => { self.cursor.advance(); TokenKind::Dollar }
            '+' => { self.cursor.advance(); TokenKind::Plus }
            '*' => { self.cursor.advance(); TokenKind::Star }
            '/' => { self.cursor.advance(); TokenKind::Slash }
            '%' => { self.cursor.advance(); TokenKind::Percent }
            '^' => { self.cursor.advance(); TokenKind::Caret }
            '&' => { self.cursor.advance(); TokenKind::Amp }
            '.' => self.lex_dot(),
            '=' => self.lex_eq(),
            '!' => self.lex_bang(),
            '<' => self.lex_lt(),
            '>' => self.lex_gt(),
            '|' => self.lex_pipe(),
            '-' => { self.cursor.advance(); TokenKind::Minus }
            '"' => self.lex_string(start),
            c if c.is_ascii_digit() => self.lex_number(),
            c if is_ident_start(c) => self.lex_ident(),
            other => {
                self.cursor.advance();
                self.errors.push(LexError {
                    message: format!("unrecognized character '{}'", other),
                    span: Span::new(start, self.cursor.position),
                });
                return self.next_token();
            }
        };

        let end = self.cursor.position;
        Token { kind, span: Span::new(start, end), leading_trivia, newlines_before }
    }

    fn lex_dot(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.matches('.') {
            self.cursor.advance();
            if self.cursor.matches('<') {
                self.cursor.advance();
                return TokenKind::DotDotLt;
            }
            return TokenKind::DotDot;
        }
        TokenKind::Dot
    }

    fn lex_eq(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.matches('=') {
            self.cursor.advance();
            return TokenKind::EqEq;
        }
        TokenKind::Eq
    }

    fn lex_bang(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.matches('=') {
            self.cursor.advance();
            return TokenKind::BangEq;
        }
        TokenKind::Bang
    }

    fn lex_lt(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.matches('=') {
            self.cursor.advance();
            return TokenKind::LtEq;
        }
        TokenKind::Lt
    }

    fn lex_gt(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.matches('=') {
            self.cursor.advance();
            return TokenKind::GtEq;
        }
        TokenKind::Gt
    }

    fn lex_pipe(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.matches('>') {
            self.cursor.advance();
            return TokenKind::PipeGt;
        }
        TokenKind::Pipe
    }

    fn lex_string(&mut self, start: usize) -> TokenKind {
        self.cursor.advance(); // opening quote
        let mut value = String::new();
        loop {
            if self.cursor.is_at_end() {
                self.errors.push(LexError {
                    message: "unterminated string literal".to_string(),
                    span: Span::new(start, self.cursor.position),
                });
                break;
            }
            match self.cursor.current() {
                '"' => {
                    self.cursor.advance();
                    break;
                }
                '\\' => {
                    self.cursor.advance();
                    let escaped = self.cursor.advance();
                    value.push(match escaped {
                        '\\' => '\\',
                        '"' => '"',
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
                '\n' => {
                    self.errors.push(LexError {
                        message: "unterminated string literal".to_string(),
                        span: Span::new(start, self.cursor.position),
                    });
                    break;
                }
                c => {
                    value.push(c);
                    self.cursor.advance();
                }
            }
        }
        TokenKind::Str(value)
    }

    fn lex_number(&mut self) -> TokenKind {
        let start = self.cursor.position;
        while self.cursor.current().is_ascii_digit() {
            self.cursor.advance();
        }
        if self.cursor.matches('.') && self.cursor.char_at(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current().is_ascii_digit() {
                self.cursor.advance();
            }
        }
        let digits_end = self.cursor.position;
        let value: f64 = self.cursor.source[start..digits_end].parse().unwrap_or(0.0);

        let unit_start = self.cursor.position;
        if self.cursor.matches('_') {
            self.cursor.advance();
            return TokenKind::Number { value, unit: Some(UnitSuffix::Unitless) };
        }
        while is_ident_continue(self.cursor.current()) {
            self.cursor.advance();
        }
        let suffix = &self.cursor.source[unit_start..self.cursor.position];
        if suffix.is_empty() {
            TokenKind::Number { value, unit: None }
        } else if let Some(unit) = UnitSuffix::from_str(suffix) {
            TokenKind::Number { value, unit: Some(unit) }
        } else {
            // Not a recognized unit: treat the letters as a separate
            // identifier by rewinding to just after the digits.
            self.cursor.position = digits_end;
            TokenKind::Number { value, unit: None }
        }
    }

    fn lex_ident(&mut self) -> TokenKind {
        let start = self.cursor.position;
        while is_ident_continue(self.cursor.current()) {
            self.cursor.advance();
        }
        let text = &self.cursor.source[start..self.cursor.position];
        if let Some(keyword) = TokenKind::keyword_from_ident(text) {
            keyword
        } else {
            TokenKind::Ident(self.interner.intern(text))
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current() {
                '\n' => {
                    self.pending_newlines += 1;
                    self.cursor.advance();
                }
                c if c.is_whitespace() => {
                    self.cursor.advance();
                }
                '/' if self.cursor.char_at(1) == '/' => {
                    self.lex_line_comment();
                }
                '/' if self.cursor.char_at(1) == '*' => {
                    self.lex_block_comment();
                }
                _ => break,
            }
        }
    }

    fn lex_line_comment(&mut self) {
        let start = self.cursor.position;
        let newlines_before = std::mem::take(&mut self.pending_newlines);
        self.cursor.advance();
        self.cursor.advance();
        let text_start = self.cursor.position;
        while !self.cursor.is_at_end() && self.cursor.current() != '\n' {
            self.cursor.advance();
        }
        let text = self.cursor.source[text_start..self.cursor.position].to_string();
        self.pending_trivia.push(TriviaEvent {
            newlines_before,
            is_block: false,
            text,
            span: Span::new(start, self.cursor.position),
        });
    }

    fn lex_block_comment(&mut self) {
        let start = self.cursor.position;
        let newlines_before = std::mem::take(&mut self.pending_newlines);
        self.cursor.advance();
        self.cursor.advance();
        let text_start = self.cursor.position;
        loop {
            if self.cursor.is_at_end() {
                self.errors.push(LexError {
                    message: "unterminated block comment".to_string(),
                    span: Span::new(start, self.cursor.position),
                });
                break;
            }
            if self.cursor.current() == '*' && self.cursor.char_at(1) == '/' {
                break;
            }
            if self.cursor.current() == '\n' {
                self.pending_newlines += 1;
            }
            self.cursor.advance();
        }
        let text_end = self.cursor.position;
        let text = self.cursor.source[text_start..text_end].to_string();
        if !self.cursor.is_at_end() {
            self.cursor.advance();
            self.cursor.advance();
        }
        // The newlines consumed while scanning the comment body belong to
        // the comment's own interior, not the gap before the next token.
        self.pending_newlines = 0;
        self.pending_trivia.push(TriviaEvent {
            newlines_before,
            is_block: true,
            text,
            span: Span::new(start, self.cursor.position),
        });
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience wrapper over [`Lexer::tokenize`] for callers that only have
/// a source string and a scratch interner.
pub fn lex(source: &str, interner: &mut Interner) -> (Vec<Token>, Vec<LexError>) {
    Lexer::new(source, interner).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut interner = Interner::new();
        let (tokens, errors) = lex(source, &mut interner);
        assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_let_binding() {
        let mut interner = Interner::new();
        let (tokens, errors) = lex("let x = 1", &mut interner);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Let);
        assert!(matches!(tokens[1].kind, TokenKind::Ident(_)));
        assert_eq!(tokens[2].kind, TokenKind::Eq);
        assert_eq!(tokens[3].kind, TokenKind::Number { value: 1.0, unit: None });
        assert_eq!(tokens[4].kind, TokenKind::Eof);
    }

    #[test]
    fn number_with_unit_suffix() {
        let ks = kinds("42mm");
        assert_eq!(ks[0], TokenKind::Number { value: 42.0, unit: Some(UnitSuffix::Mm) });
    }

    #[test]
    fn number_with_unitless_marker() {
        let ks = kinds("42_");
        assert_eq!(ks[0], TokenKind::Number { value: 42.0, unit: Some(UnitSuffix::Unitless) });
    }

    #[test]
    fn operators_prefer_longest_match() {
        let ks = kinds("<= .. ..< |> == !=");
        assert_eq!(
            ks,
            vec![
                TokenKind::LtEq,
                TokenKind::DotDot,
                TokenKind::DotDotLt,
                TokenKind::PipeGt,
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_literal_handles_escapes() {
        let ks = kinds(r#""a\nb\"c""#);
        assert_eq!(ks[0], TokenKind::Str("a\nb\"c".to_string()));
    }

    #[test]
    fn unterminated_string_is_reported_and_recovers() {
        let mut interner = Interner::new();
        let (tokens, errors) = lex("\"abc", &mut interner);
        assert_eq!(errors.len(), 1);
        assert!(matches!(tokens.last().unwrap().kind, TokenKind::Eof));
    }

    #[test]
    fn unrecognized_character_is_reported_and_skipped() {
        let mut interner = Interner::new();
        let (tokens, errors) = lex("let x = 1 ` let y = 2", &mut interner);
        assert_eq!(errors.len(), 1);
        assert!(tokens.iter().any(|t| matches!(t.kind, TokenKind::Let)));
        assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Let).count(), 2);
    }

    #[test]
    fn line_comment_attaches_as_trivia_on_next_token() {
        let mut interner = Interner::new();
        let (tokens, errors) = lex("// hello\nlet x = 1", &mut interner);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Let);
        assert_eq!(tokens[0].leading_trivia.len(), 1);
        assert_eq!(tokens[0].leading_trivia[0].text, " hello");
        assert!(!tokens[0].leading_trivia[0].is_block);
    }

    #[test]
    fn block_comment_does_not_nest() {
        let mut interner = Interner::new();
        let (tokens, _) = lex("/* a */ let x = 1", &mut interner);
        assert_eq!(tokens[0].leading_trivia[0].text, " a ");
    }

    #[test]
    fn blank_line_run_recorded_via_newlines_before() {
        let mut interner = Interner::new();
        let (tokens, _) = lex("let a = 1\n\n\nlet b = 2", &mut interner);
        let let_b = &tokens[4];
        assert_eq!(let_b.kind, TokenKind::Let);
        assert_eq!(let_b.newlines_before, 3);
    }

    #[test]
    fn trailing_comment_on_same_line_has_zero_newlines_before() {
        let mut interner = Interner::new();
        let (tokens, _) = lex("let a = 1 // note\nlet b = 2", &mut interner);
        let let_b = &tokens[4];
        assert_eq!(let_b.leading_trivia[0].newlines_before, 0);
    }
}
