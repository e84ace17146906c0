//! Renders a formatted document as colorized terminal text or a
//! standalone HTML page. Shares its token classification with
//! [`kcl_ls`'s semantic token encoder][semantic], since both are
//! answering the same question — "what kind of thing is this span" —
//! for different renderers.
//!
//! [semantic]: ../../crates/kcl_ls/src/semantic_tokens.rs

use colored::Colorize;

use kcl_syntax::token::{Token, TokenKind};

#[derive(Clone, Copy)]
enum Category {
    Keyword,
    Ident,
    Number,
    String,
    Operator,
    Comment,
}

struct Span {
    start: usize,
    end: usize,
    category: Category,
}

fn spans(tokens: &[Token]) -> Vec<Span> {
    let mut spans = Vec::with_capacity(tokens.len());
    for token in tokens {
        for trivia in &token.leading_trivia {
            spans.push(Span { start: trivia.span.start, end: trivia.span.end, category: Category::Comment });
        }
        if let Some(category) = classify(&token.kind) {
            spans.push(Span { start: token.span.start, end: token.span.end, category });
        }
    }
    spans.sort_by_key(|s| s.start);
    spans
}

fn classify(kind: &TokenKind) -> Option<Category> {
    use TokenKind::*;
    Some(match kind {
        True | False | Nil | Fn | Let | Return | If | Else | Import | Export | As | From => Category::Keyword,
        Ident(_) => Category::Ident,
        Number { .. } => Category::Number,
        Str(_) => Category::String,
        Plus | Minus | Star | Slash | Percent | Caret | EqEq | BangEq | Lt | Gt | LtEq | GtEq | Amp | Pipe | Bang
        | Eq | PipeGt | DotDot | DotDotLt | At | Dollar => Category::Operator,
        LParen | RParen | LBrace | RBrace | LBracket | RBracket | Comma | Colon | Dot | Eof => return None,
    })
}

pub fn render_ansi(text: &str, tokens: &[Token]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for span in spans(tokens) {
        if span.start < cursor {
            continue;
        }
        out.push_str(&text[cursor..span.start]);
        out.push_str(&colorize(&text[span.start..span.end], span.category).to_string());
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

fn colorize(piece: &str, category: Category) -> colored::ColoredString {
    match category {
        Category::Keyword => piece.magenta().bold(),
        Category::Ident => piece.normal(),
        Category::Number => piece.cyan(),
        Category::String => piece.green(),
        Category::Operator => piece.yellow(),
        Category::Comment => piece.bright_black(),
    }
}

pub fn render_html(text: &str, tokens: &[Token]) -> String {
    let mut body = String::with_capacity(text.len() * 2);
    let mut cursor = 0usize;
    for span in spans(tokens) {
        if span.start < cursor {
            continue;
        }
        body.push_str(&escape_html(&text[cursor..span.start]));
        body.push_str(&format!(
            "<span class=\"{}\">{}</span>",
            html_class(span.category),
            escape_html(&text[span.start..span.end])
        ));
        cursor = span.end;
    }
    body.push_str(&escape_html(&text[cursor..]));

    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><style>{STYLE}</style></head>\n<body><pre class=\"kcl\">{body}</pre></body>\n</html>\n"
    )
}

fn html_class(category: Category) -> &'static str {
    match category {
        Category::Keyword => "kw",
        Category::Ident => "id",
        Category::Number => "num",
        Category::String => "str",
        Category::Operator => "op",
        Category::Comment => "com",
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

const STYLE: &str = ".kcl{background:#1e1e1e;color:#d4d4d4;padding:1rem}\
.kw{color:#c586c0}.id{color:#d4d4d4}.num{color:#b5cea8}.str{color:#ce9178}\
.op{color:#d4d4d4}.com{color:#6a9955;font-style:italic}";

#[cfg(test)]
mod tests {
    use super::*;
    use kcl_base::Interner;
    use kcl_syntax::parser::parse;

    #[test]
    fn html_escapes_reserved_characters_in_strings() {
        let mut interner = Interner::new();
        let result = parse("let x = \"<a & b>\"", &mut interner);
        let html = render_html("let x = \"<a & b>\"", &result.tokens);
        assert!(html.contains("&lt;a &amp; b&gt;"));
    }

    #[test]
    fn ansi_output_preserves_total_text_length_ignoring_escapes() {
        let mut interner = Interner::new();
        let source = "let x = 1\n";
        let result = parse(source, &mut interner);
        let rendered = render_ansi(source, &result.tokens);
        assert!(rendered.contains('1'));
    }

    #[test]
    fn comments_are_classified_separately_from_code() {
        let mut interner = Interner::new();
        let source = "// note\nlet x = 1\n";
        let result = parse(source, &mut interner);
        let html = render_html(source, &result.tokens);
        assert!(html.contains("class=\"com\""));
    }
}
