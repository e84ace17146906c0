//! Maps the lexer's token stream to LSP's delta-encoded semantic token
//! format. Comments never become [`kcl_syntax::token::Token`]s — they ride
//! along as trivia — so they're folded back in here as their own token type
//! before delta-encoding.

use tower_lsp::lsp_types::{SemanticToken, SemanticTokenModifier, SemanticTokenType, SemanticTokensLegend};

use kcl_syntax::line_index::LineIndex;
use kcl_syntax::token::{Token, TokenKind};

pub const TOKEN_TYPES: &[SemanticTokenType] = &[
    SemanticTokenType::KEYWORD,  // 0
    SemanticTokenType::VARIABLE, // 1
    SemanticTokenType::NUMBER,   // 2
    SemanticTokenType::STRING,   // 3
    SemanticTokenType::OPERATOR, // 4
    SemanticTokenType::COMMENT,  // 5
];

pub const TOKEN_MODIFIERS: &[SemanticTokenModifier] = &[];

pub fn legend() -> SemanticTokensLegend {
    SemanticTokensLegend { token_types: TOKEN_TYPES.to_vec(), token_modifiers: TOKEN_MODIFIERS.to_vec() }
}

struct Entry {
    start: usize,
    end: usize,
    token_type: u32,
}

/// Delta-encodes `tokens` (plus every comment riding along as leading
/// trivia) in source order.
pub fn encode_tokens(tokens: &[Token], line_index: &LineIndex) -> Vec<SemanticToken> {
    let mut entries: Vec<Entry> = Vec::with_capacity(tokens.len());

    for token in tokens {
        for trivia in &token.leading_trivia {
            entries.push(Entry { start: trivia.span.start, end: trivia.span.end, token_type: 5 });
        }
        if let Some(token_type) = classify(&token.kind) {
            entries.push(Entry { start: token.span.start, end: token.span.end, token_type });
        }
    }
    entries.sort_by_key(|e| e.start);

    let mut result = Vec::with_capacity(entries.len());
    let mut prev_line = 0u32;
    let mut prev_start = 0u32;
    for entry in &entries {
        let length = line_index.utf16_length(entry.start, entry.end);
        if length == 0 {
            continue;
        }
        let pos = line_index.position(entry.start);
        let delta_line = pos.line - prev_line;
        let delta_start = if delta_line == 0 { pos.character - prev_start } else { pos.character };

        result.push(SemanticToken {
            delta_line,
            delta_start,
            length,
            token_type: entry.token_type,
            token_modifiers_bitset: 0,
        });
        prev_line = pos.line;
        prev_start = pos.character;
    }
    result
}

fn classify(kind: &TokenKind) -> Option<u32> {
    use TokenKind::*;
    Some(match kind {
        True | False | Nil | Fn | Let | Return | If | Else | Import | Export | As | From => 0,
        Ident(_) => 1,
        Number { .. } => 2,
        Str(_) => 3,
        Plus | Minus | Star | Slash | Percent | Caret | EqEq | BangEq | Lt | Gt | LtEq | GtEq | Amp | Pipe | Bang
        | Eq | PipeGt | DotDot | DotDotLt | At | Dollar => 4,
        LParen | RParen | LBrace | RBrace | LBracket | RBracket | Comma | Colon | Dot | Eof => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcl_base::Interner;
    use kcl_syntax::parser::parse;

    #[test]
    fn delta_encoding_across_two_tokens_on_same_line() {
        let mut interner = Interner::new();
        let result = parse("let x = 1", &mut interner);
        let encoded = encode_tokens(&result.tokens, &result.line_index);
        assert!(encoded.len() >= 3);
        assert_eq!(encoded[0].delta_line, 0);
        assert_eq!(encoded[0].delta_start, 0);
    }

    #[test]
    fn delta_line_resets_character_delta() {
        let mut interner = Interner::new();
        let result = parse("let x = 1\nlet y = 2", &mut interner);
        let encoded = encode_tokens(&result.tokens, &result.line_index);
        let second_line_start = encoded.iter().position(|t| t.delta_line > 0).expect("a token on line 1");
        assert_eq!(encoded[second_line_start].delta_start, 0);
    }

    #[test]
    fn comments_are_emitted_as_comment_tokens() {
        let mut interner = Interner::new();
        let result = parse("// hello\nlet x = 1", &mut interner);
        let encoded = encode_tokens(&result.tokens, &result.line_index);
        assert!(encoded.iter().any(|t| t.token_type == 5));
    }

    #[test]
    fn punctuation_is_not_emitted() {
        let mut interner = Interner::new();
        let result = parse("let a = [1, 2]", &mut interner);
        let encoded = encode_tokens(&result.tokens, &result.line_index);
        let count_for_len_two = encoded.iter().filter(|t| t.token_type == 2).count();
        assert_eq!(count_for_len_two, 2);
    }
}
