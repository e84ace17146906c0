//! A Pratt-style expression parser with a recursive statement layer.
//!
//! Consumes the lexer's token stream into a [`Program`] plus a list of
//! diagnostics. Never throws on a recoverable error: an unexpected token
//! produces a diagnostic and the parser resyncs to the next statement
//! boundary rather than aborting the whole document.

use kcl_base::{Interner, Span};

use crate::ast::expr::{
    Argument, Block, ElseBranch, Expr, ExprKind, Ident, Param, TypeRef, BinaryOp, UnaryOp,
};
use crate::ast::stmt::{ExportImport, Import, Program, Stmt, StmtKind};
use crate::ast::trivia::{Trivia, TriviaItem};
use crate::diagnostic::{Diagnostic, Range, Severity};
use crate::lexer::Lexer;
use crate::line_index::LineIndex;
use crate::token::{Token, TokenKind, TriviaEvent, UnitSuffix};

/// The immutable record produced for one source text: `{success, tokens,
/// program, lineIndex, diagnostics}`.
pub struct ParseResult {
    pub success: bool,
    pub tokens: Vec<Token>,
    pub program: Program,
    pub line_index: LineIndex,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lexes and parses `source` in one step, interning identifiers into
/// `interner`. Never panics: lex errors and parse errors both become
/// diagnostics on the returned [`ParseResult`].
pub fn parse(source: &str, interner: &mut Interner) -> ParseResult {
    let line_index = LineIndex::new(source);
    let (tokens, lex_errors) = Lexer::new(source, interner).tokenize();

    let mut diagnostics: Vec<Diagnostic> = lex_errors
        .iter()
        .map(|e| {
            Diagnostic::new(span_to_range(&line_index, e.span), Severity::Error, "kcl", e.message.clone())
        })
        .collect();

    let mut parser = Parser::new(tokens.clone(), &line_index);
    let program = parser.parse_program();
    diagnostics.extend(parser.diagnostics);

    let success = diagnostics.is_empty();
    ParseResult { success, tokens, program, line_index, diagnostics }
}

fn span_to_range(line_index: &LineIndex, span: Span) -> Range {
    Range::new(line_index.position(span.start), line_index.position(span.end))
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    line_index: &'a LineIndex,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token>, line_index: &'a LineIndex) -> Self {
        Parser { tokens, pos: 0, line_index, diagnostics: Vec::new() }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn is_eof(&self) -> bool {
        matches!(self.kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.kind()) == std::mem::discriminant(kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&mut self, span: Span, message: impl Into<String>) {
        self.diagnostics.push(
            Diagnostic::new(span_to_range(self.line_index, span), Severity::Error, "kcl", message)
                .with_code("grammar-error"),
        );
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Token {
        if self.check(kind) {
            self.advance()
        } else {
            let span = self.current().span;
            self.error(span, format!("expected {}, found {:?}", what, self.kind()));
            Token::new(kind.clone(), span)
        }
    }

    fn expect_ident(&mut self) -> Ident {
        if let TokenKind::Ident(symbol) = self.kind().clone() {
            let span = self.current().span;
            self.advance();
            Ident { symbol, span }
        } else {
            let span = self.current().span;
            self.error(span, "expected an identifier");
            Ident { symbol: kcl_base::Symbol::EMPTY, span }
        }
    }

    /// Skips tokens until the next statement-start keyword or a newline
    /// followed by an identifier, so one bad statement doesn't take the
    /// rest of the document with it.
    fn synchronize(&mut self) {
        loop {
            if self.is_eof() {
                return;
            }
            if self.kind().starts_statement() {
                return;
            }
            if self.current().newlines_before > 0 && matches!(self.kind(), TokenKind::Ident(_)) {
                return;
            }
            self.advance();
        }
    }

    // ---- trivia -----------------------------------------------------

    /// Converts a raw event list plus the gap before the owning token into
    /// the public, blank-collapsed `Vec<TriviaItem>` shape.
    fn build_trivia_items(events: &[TriviaEvent], trailing_gap: u32) -> Vec<TriviaItem> {
        let mut items = Vec::new();
        for ev in events {
            if ev.newlines_before >= 2 {
                items.push(TriviaItem::Blank { count: ev.newlines_before - 1 });
            }
            items.push(TriviaItem::Comment { is_block: ev.is_block, text: ev.text.clone(), span: ev.span });
        }
        if trailing_gap >= 2 {
            items.push(TriviaItem::Blank { count: trailing_gap - 1 });
        }
        items
    }

    /// Pulls the leading trivia off the current token, splitting off a
    /// same-line comment (if any) as a trailing comment for the previous
    /// statement.
    fn take_leading_trivia(&mut self, has_previous_stmt: bool) -> (Option<(bool, String)>, Vec<TriviaItem>) {
        let token = self.current().clone();
        let mut events = token.leading_trivia;
        let mut trailing = None;
        if has_previous_stmt {
            if let Some(first) = events.first() {
                if first.newlines_before == 0 {
                    let ev = events.remove(0);
                    trailing = Some((ev.is_block, ev.text));
                }
            }
        }
        let items = Self::build_trivia_items(&events, token.newlines_before);
        (trailing, items)
    }

    // ---- program / statements ----------------------------------------

    fn parse_program(&mut self) -> Program {
        let mut program = Program { body: Vec::new(), leading_trivia: Vec::new(), trailing_trivia: Vec::new() };

        loop {
            let has_previous = !program.body.is_empty();
            let (trailing, leading_items) = self.take_leading_trivia(has_previous);
            if let Some((is_block, text)) = trailing {
                if let Some(prev) = program.body.last_mut() {
                    prev.trivia.trailing = Some(text);
                    prev.trivia.trailing_is_block = is_block;
                }
            }

            if self.is_eof() {
                if has_previous {
                    program.trailing_trivia = leading_items;
                } else {
                    program.leading_trivia = leading_items;
                }
                break;
            }

            if !has_previous {
                // Trivia before the very first statement belongs to the
                // program root, not to that statement.
                program.leading_trivia = leading_items;
                let start_pos = self.pos;
                let stmt = self.parse_stmt();
                program.body.push(stmt);
                if self.pos == start_pos {
                    self.advance();
                }
                continue;
            }

            let start_pos = self.pos;
            let mut stmt = self.parse_stmt();
            stmt.trivia.leading = leading_items;
            program.body.push(stmt);

            // Guard against a statement parser that fails to consume any
            // tokens on a malformed input; force progress.
            if self.pos == start_pos && !self.is_eof() {
                self.advance();
            }
        }

        program
    }

    fn parse_stmt(&mut self) -> Stmt {
        let span_start = self.current().span;
        let kind = match self.kind().clone() {
            TokenKind::At => self.parse_annotation(),
            TokenKind::Import => self.parse_import(),
            TokenKind::Export => self.parse_export(),
            TokenKind::Fn => self.parse_fn_def(),
            TokenKind::Let => self.parse_let(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Ident(_) if self.peek_is_assign() => self.parse_assign(),
            _ => {
                let expr = self.parse_expr(0);
                StmtKind::ExprStmt(expr)
            }
        };
        let span_end = self.tokens[self.pos.saturating_sub(1).max(0)].span;
        let span = span_start.merge(span_end);

        // If the statement body itself produced a grammar error, resync so
        // subsequent statements still parse.
        if !self.statement_terminated_cleanly() {
            self.synchronize();
        }

        Stmt::new(kind, span)
    }

    /// Heuristic: after parsing a statement we expect to be at a newline
    /// boundary, EOF, or a closing brace (end of block). Anything else
    /// signals we stopped mid-expression due to an error already reported.
    fn statement_terminated_cleanly(&self) -> bool {
        self.is_eof()
            || matches!(self.kind(), TokenKind::RBrace)
            || self.current().newlines_before > 0
    }

    fn peek_is_assign(&self) -> bool {
        if self.pos + 1 >= self.tokens.len() {
            return false;
        }
        matches!(self.tokens[self.pos + 1].kind, TokenKind::Eq)
    }

    fn parse_let(&mut self) -> StmtKind {
        self.advance(); // 'let'
        let name = self.expect_ident();
        self.expect(&TokenKind::Eq, "'='");
        let value = self.parse_expr(0);
        StmtKind::Let { name, value }
    }

    fn parse_assign(&mut self) -> StmtKind {
        let name = self.expect_ident();
        self.expect(&TokenKind::Eq, "'='");
        let value = self.parse_expr(0);
        StmtKind::Assign { name, value }
    }

    fn parse_return(&mut self) -> StmtKind {
        self.advance(); // 'return'
        let value = if self.current().newlines_before > 0
            || self.is_eof()
            || matches!(self.kind(), TokenKind::RBrace)
        {
            None
        } else {
            Some(self.parse_expr(0))
        };
        StmtKind::Return { value }
    }

    fn parse_annotation(&mut self) -> StmtKind {
        self.advance(); // '@'
        let name = self.expect_ident();
        let mut args = Vec::new();
        if self.eat(&TokenKind::LParen) {
            while !self.check(&TokenKind::RParen) && !self.is_eof() {
                let arg_start = self.current().span;
                let label = if matches!(self.kind(), TokenKind::Ident(_)) && self.peek_is_assign() {
                    let l = self.expect_ident();
                    self.advance(); // '='
                    Some(l)
                } else {
                    None
                };
                let value = self.parse_expr(0);
                let span = arg_start.merge(value.span);
                args.push(Argument { label, value, span });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RParen, "')'");
        }
        StmtKind::Annotation { name, args }
    }

    fn parse_import(&mut self) -> StmtKind {
        self.advance(); // 'import'
        let mut items = None;
        if matches!(self.kind(), TokenKind::Ident(_)) || matches!(self.kind(), TokenKind::LBrace) {
            let braced = self.eat(&TokenKind::LBrace);
            let mut list = Vec::new();
            loop {
                if matches!(self.kind(), TokenKind::Str(_)) {
                    break;
                }
                list.push(self.expect_ident());
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            if braced {
                self.expect(&TokenKind::RBrace, "'}'");
            }
            self.expect(&TokenKind::From, "'from'");
            items = Some(list);
        }
        let source = self.expect_string();
        let alias = if self.eat(&TokenKind::As) { Some(self.expect_ident()) } else { None };
        StmtKind::Import(Import { items, source, alias })
    }

    fn parse_export(&mut self) -> StmtKind {
        self.advance(); // 'export'
        // Re-export shorthand: `export IDENT, IDENT from "source"` (no
        // leading `import` keyword).
        if matches!(self.kind(), TokenKind::Ident(_)) && self.looks_like_export_import_shorthand() {
            let mut items = Vec::new();
            loop {
                items.push(self.expect_ident());
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::From, "'from'");
            let source = self.expect_string();
            return StmtKind::ExportImport(ExportImport { items, source });
        }
        let inner = self.parse_stmt();
        StmtKind::Export(Box::new(inner))
    }

    /// Looks ahead for `IDENT (',' IDENT)* 'from'` without consuming.
    fn looks_like_export_import_shorthand(&self) -> bool {
        let mut i = self.pos;
        loop {
            if !matches!(self.tokens.get(i).map(|t| &t.kind), Some(TokenKind::Ident(_))) {
                return false;
            }
            i += 1;
            match self.tokens.get(i).map(|t| &t.kind) {
                Some(TokenKind::Comma) => { i += 1; continue; }
                Some(TokenKind::From) => return true,
                _ => return false,
            }
        }
    }

    fn expect_string(&mut self) -> String {
        if let TokenKind::Str(s) = self.kind().clone() {
            self.advance();
            s
        } else {
            let span = self.current().span;
            self.error(span, "expected a string literal");
            String::new()
        }
    }

    fn parse_fn_def(&mut self) -> StmtKind {
        self.advance(); // 'fn'
        let name = self.expect_ident();
        self.expect(&TokenKind::LParen, "'('");
        let params = self.parse_params();
        self.expect(&TokenKind::RParen, "')'");
        let return_type = if self.eat(&TokenKind::Colon) { Some(self.parse_type_ref()) } else { None };
        let body = self.parse_block();
        StmtKind::FnDef { name, params, return_type, body }
    }

    fn parse_params(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_eof() {
            let start = self.current().span;
            let at_prefixed = self.eat(&TokenKind::At);
            let name = self.expect_ident();
            let type_ascription = if self.eat(&TokenKind::Colon) { Some(self.parse_type_ref()) } else { None };
            let span = start.merge(self.tokens[self.pos.saturating_sub(1)].span);
            params.push(Param { name, at_prefixed, type_ascription, span });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        params
    }

    fn parse_type_ref(&mut self) -> TypeRef {
        let name = self.expect_ident();
        TypeRef { name: name.clone(), span: name.span }
    }

    fn parse_block(&mut self) -> Block {
        let start = self.current().span;
        self.expect(&TokenKind::LBrace, "'{'");
        let mut stmts = Vec::new();
        let mut tail = None;
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            let has_previous = !stmts.is_empty();
            let (trailing, leading_items) = self.take_leading_trivia(has_previous);
            if let Some((is_block, text)) = trailing {
                if let Some(prev) = stmts.last_mut() {
                    let prev: &mut Stmt = prev;
                    prev.trivia.trailing = Some(text);
                    prev.trivia.trailing_is_block = is_block;
                }
            }
            if self.check(&TokenKind::RBrace) {
                break;
            }

            // A bare trailing expression with nothing after it is the
            // block's tail expression rather than an `ExprStmt`.
            if self.looks_like_tail_expr() {
                tail = Some(Box::new(self.parse_expr(0)));
                break;
            }

            let start_pos = self.pos;
            let mut stmt = self.parse_stmt();
            stmt.trivia.leading = leading_items;
            stmts.push(stmt);
            if self.pos == start_pos && !self.is_eof() {
                self.advance();
            }
        }
        let end = self.current().span;
        self.expect(&TokenKind::RBrace, "'}'");
        Block { stmts, tail, span: start.merge(end) }
    }

    /// A block's final line is its tail expression only when it is not one
    /// of the statement-introducing keywords (so `return x` still parses
    /// as a `Return` statement, not a tail expression).
    fn looks_like_tail_expr(&self) -> bool {
        !self.kind().starts_statement() && !matches!(self.kind(), TokenKind::Return)
    }

    // ---- expressions ---------------------------------------------------

    /// Binding powers, low to high, matching the precedence ladder: pipe;
    /// logical `|` then `&`; comparison; additive; multiplicative;
    /// exponent (right-assoc); unary; postfix; primary.
    fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8, BindKind)> {
        use BindKind::*;
        Some(match kind {
            TokenKind::PipeGt => (1, 2, Pipe),
            TokenKind::Pipe => (3, 4, Binary(BinaryOp::Or)),
            TokenKind::Amp => (5, 6, Binary(BinaryOp::And)),
            TokenKind::EqEq => (7, 8, Binary(BinaryOp::Eq)),
            TokenKind::BangEq => (7, 8, Binary(BinaryOp::Ne)),
            TokenKind::Lt => (7, 8, Binary(BinaryOp::Lt)),
            TokenKind::Gt => (7, 8, Binary(BinaryOp::Gt)),
            TokenKind::LtEq => (7, 8, Binary(BinaryOp::Le)),
            TokenKind::GtEq => (7, 8, Binary(BinaryOp::Ge)),
            TokenKind::Plus => (9, 10, Binary(BinaryOp::Add)),
            TokenKind::Minus => (9, 10, Binary(BinaryOp::Sub)),
            TokenKind::Star => (11, 12, Binary(BinaryOp::Mul)),
            TokenKind::Slash => (11, 12, Binary(BinaryOp::Div)),
            TokenKind::Percent => (11, 12, Binary(BinaryOp::Mod)),
            // right-associative: right bp lower than left bp
            TokenKind::Caret => (14, 13, Binary(BinaryOp::Pow)),
            _ => return None,
        })
    }

    fn parse_expr(&mut self, min_bp: u8) -> Expr {
        let mut lhs = self.parse_unary();

        loop {
            let kind = self.kind().clone();
            let Some((left_bp, right_bp, bind)) = Self::infix_binding_power(&kind) else { break };
            if left_bp < min_bp {
                break;
            }
            self.advance();
            match bind {
                BindKind::Pipe => {
                    let rhs = self.parse_expr(right_bp);
                    let span = lhs.span.merge(rhs.span);
                    lhs = Expr::new(ExprKind::Pipe { left: Box::new(lhs), right: Box::new(rhs) }, span);
                }
                BindKind::Binary(op) => {
                    let rhs = self.parse_expr(right_bp);
                    let span = lhs.span.merge(rhs.span);
                    lhs = Expr::new(
                        ExprKind::Binary { op, left: Box::new(lhs), right: Box::new(rhs) },
                        span,
                    );
                }
            }
        }

        lhs
    }

    fn parse_unary(&mut self) -> Expr {
        let start = self.current().span;
        match self.kind() {
            TokenKind::Minus => {
                self.advance();
                let expr = self.parse_unary();
                let span = start.merge(expr.span);
                Expr::new(ExprKind::Unary { op: UnaryOp::Neg, expr: Box::new(expr) }, span)
            }
            TokenKind::Bang => {
                self.advance();
                let expr = self.parse_unary();
                let span = start.merge(expr.span);
                Expr::new(ExprKind::Unary { op: UnaryOp::Not, expr: Box::new(expr) }, span)
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();
        loop {
            match self.kind() {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr(0);
                    let end = self.current().span;
                    self.expect(&TokenKind::RBracket, "']'");
                    let span = expr.span.merge(end);
                    expr = Expr::new(ExprKind::Index { base: Box::new(expr), index: Box::new(index) }, span);
                }
                TokenKind::Dot => {
                    self.advance();
                    let property = self.expect_ident();
                    let span = expr.span.merge(property.span);
                    expr = Expr::new(ExprKind::Member { base: Box::new(expr), property }, span);
                }
                TokenKind::Colon => {
                    self.advance();
                    let ty = self.parse_type_ref();
                    let span = expr.span.merge(ty.span);
                    expr = Expr::new(ExprKind::TypeAscription { expr: Box::new(expr), ty }, span);
                }
                TokenKind::DotDot | TokenKind::DotDotLt => {
                    let inclusive = matches!(self.kind(), TokenKind::DotDot);
                    self.advance();
                    let end_expr = self.parse_expr(9); // additive-and-above, below range itself
                    let span = expr.span.merge(end_expr.span);
                    expr = Expr::new(
                        ExprKind::Range { start: Box::new(expr), end: Box::new(end_expr), inclusive },
                        span,
                    );
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_primary(&mut self) -> Expr {
        let start = self.current().span;
        match self.kind().clone() {
            TokenKind::Number { value, unit } => {
                self.advance();
                Expr::new(ExprKind::Number { value, unit }, start)
            }
            TokenKind::Str(s) => {
                self.advance();
                Expr::new(ExprKind::Str(s), start)
            }
            TokenKind::True => { self.advance(); Expr::new(ExprKind::Bool(true), start) }
            TokenKind::False => { self.advance(); Expr::new(ExprKind::Bool(false), start) }
            TokenKind::Nil => { self.advance(); Expr::new(ExprKind::Nil, start) }
            TokenKind::Percent => { self.advance(); Expr::new(ExprKind::PipeSubst, start) }
            TokenKind::Dollar => {
                self.advance();
                let name = self.expect_ident();
                let span = start.merge(name.span);
                Expr::new(ExprKind::Tag(name), span)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr(0);
                let end = self.current().span;
                self.expect(&TokenKind::RParen, "')'");
                Expr::new(inner.kind, start.merge(end))
            }
            TokenKind::LBracket => self.parse_array(start),
            TokenKind::LBrace => self.parse_object(start),
            TokenKind::If => self.parse_if(start),
            TokenKind::Fn => self.parse_fn_expr(start),
            TokenKind::Ident(symbol) => {
                self.advance();
                let ident = Ident { symbol, span: start };
                if self.check(&TokenKind::LParen) {
                    self.parse_call(ident)
                } else {
                    Expr::new(ExprKind::Var(ident), start)
                }
            }
            _ => {
                let span = self.current().span;
                self.error(span, format!("unexpected token {:?}", self.kind()));
                // Don't consume a token that starts the next statement (or
                // EOF/`}`): leave it for the caller to resync onto.
                if !self.kind().starts_statement() && !self.is_eof() && !matches!(self.kind(), TokenKind::RBrace) {
                    self.advance();
                }
                Expr::new(ExprKind::Nil, span)
            }
        }
    }

    fn parse_call(&mut self, callee: Ident) -> Expr {
        self.advance(); // '('
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) && !self.is_eof() {
            let arg_start = self.current().span;
            let label = if matches!(self.kind(), TokenKind::Ident(_)) && self.peek_is_assign() {
                let l = self.expect_ident();
                self.advance(); // '='
                Some(l)
            } else {
                None
            };
            let value = self.parse_expr(0);
            let span = arg_start.merge(value.span);
            args.push(Argument { label, value, span });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.current().span;
        self.expect(&TokenKind::RParen, "')'");
        let span = callee.span.merge(end);
        Expr::new(ExprKind::Call { callee, args }, span)
    }

    fn parse_array(&mut self, start: Span) -> Expr {
        self.advance(); // '['
        let mut items = Vec::new();
        while !self.check(&TokenKind::RBracket) && !self.is_eof() {
            items.push(self.parse_expr(0));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.current().span;
        self.expect(&TokenKind::RBracket, "']'");
        Expr::new(ExprKind::Array(items), start.merge(end))
    }

    fn parse_object(&mut self, start: Span) -> Expr {
        self.advance(); // '{'
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            let key = self.expect_ident();
            self.expect(&TokenKind::Colon, "':'");
            let value = self.parse_expr(0);
            fields.push((key, value));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.current().span;
        self.expect(&TokenKind::RBrace, "'}'");
        Expr::new(ExprKind::Object(fields), start.merge(end))
    }

    fn parse_if(&mut self, start: Span) -> Expr {
        self.advance(); // 'if'
        let cond = self.parse_expr(0);
        let then_branch = self.parse_block();
        let else_branch = if self.eat(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                let nested_start = self.current().span;
                Some(Box::new(ElseBranch::If(Box::new(self.parse_if(nested_start)))))
            } else {
                Some(Box::new(ElseBranch::Block(self.parse_block())))
            }
        } else {
            None
        };
        let end = else_branch
            .as_ref()
            .map(|b| match b.as_ref() {
                ElseBranch::Block(block) => block.span,
                ElseBranch::If(e) => e.span,
            })
            .unwrap_or(then_branch.span);
        Expr::new(ExprKind::If { cond: Box::new(cond), then_branch, else_branch }, start.merge(end))
    }

    fn parse_fn_expr(&mut self, start: Span) -> Expr {
        self.advance(); // 'fn'
        self.expect(&TokenKind::LParen, "'('");
        let params = self.parse_params();
        self.expect(&TokenKind::RParen, "')'");
        let return_type = if self.eat(&TokenKind::Colon) { Some(self.parse_type_ref()) } else { None };
        let body = self.parse_block();
        let span = start.merge(body.span);
        Expr::new(ExprKind::Fn { params, return_type, body }, span)
    }
}

enum BindKind {
    Pipe,
    Binary(BinaryOp),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> ParseResult {
        let mut interner = Interner::new();
        let result = parse(source, &mut interner);
        assert!(result.diagnostics.is_empty(), "unexpected diagnostics: {:?}", result.diagnostics);
        result
    }

    #[test]
    fn parses_let_binding() {
        let result = parse_ok("let x = 1");
        assert_eq!(result.program.body.len(), 1);
        assert!(matches!(result.program.body[0].kind, StmtKind::Let { .. }));
    }

    #[test]
    fn parses_assignment_without_let() {
        let result = parse_ok("x = 1");
        assert!(matches!(result.program.body[0].kind, StmtKind::Assign { .. }));
    }

    #[test]
    fn parses_arithmetic_precedence() {
        let result = parse_ok("let a = 1 + 2 * 3");
        let StmtKind::Let { value, .. } = &result.program.body[0].kind else { panic!() };
        let ExprKind::Binary { op: BinaryOp::Add, right, .. } = &value.kind else { panic!("expected add") };
        assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn exponent_is_right_associative() {
        let result = parse_ok("let a = 2 ^ 3 ^ 2");
        let StmtKind::Let { value, .. } = &result.program.body[0].kind else { panic!() };
        let ExprKind::Binary { op: BinaryOp::Pow, right, .. } = &value.kind else { panic!() };
        assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Pow, .. }));
    }

    #[test]
    fn parses_call_with_positional_and_labeled_args() {
        let result = parse_ok("result = makeBox(10, 20, height = 30)");
        let StmtKind::Assign { value, .. } = &result.program.body[0].kind else { panic!() };
        let ExprKind::Call { args, .. } = &value.kind else { panic!() };
        assert_eq!(args.len(), 3);
        assert!(args[0].label.is_none());
        assert!(args[1].label.is_none());
        assert!(args[2].label.is_some());
    }

    #[test]
    fn parses_pipe_chain() {
        let result = parse_ok("result = a() |> b() |> c()");
        let StmtKind::Assign { value, .. } = &result.program.body[0].kind else { panic!() };
        assert!(matches!(value.kind, ExprKind::Pipe { .. }));
    }

    #[test]
    fn parses_pipe_substitution() {
        let result = parse_ok("result = a() |> f(%, 1)");
        let StmtKind::Assign { value, .. } = &result.program.body[0].kind else { panic!() };
        let ExprKind::Pipe { right, .. } = &value.kind else { panic!() };
        let ExprKind::Call { args, .. } = &right.kind else { panic!() };
        assert!(matches!(args[0].value.kind, ExprKind::PipeSubst));
    }

    #[test]
    fn parses_fn_def_with_at_prefixed_param() {
        let result = parse_ok("fn f(@a) { return a }");
        let StmtKind::FnDef { params, body, .. } = &result.program.body[0].kind else { panic!() };
        assert!(params[0].at_prefixed);
        assert_eq!(body.stmts.len(), 1);
    }

    #[test]
    fn fn_def_tail_expression_becomes_block_tail() {
        let result = parse_ok("fn f() { 1 + 1 }");
        let StmtKind::FnDef { body, .. } = &result.program.body[0].kind else { panic!() };
        assert!(body.tail.is_some());
        assert!(body.stmts.is_empty());
    }

    #[test]
    fn parses_if_else_if_chain() {
        let result = parse_ok("let a = if x { 1 } else if y { 2 } else { 3 }");
        let StmtKind::Let { value, .. } = &result.program.body[0].kind else { panic!() };
        let ExprKind::If { else_branch, .. } = &value.kind else { panic!() };
        assert!(matches!(else_branch.as_deref(), Some(ElseBranch::If(_))));
    }

    #[test]
    fn parses_range_expressions() {
        let result = parse_ok("let r = 0..<10");
        let StmtKind::Let { value, .. } = &result.program.body[0].kind else { panic!() };
        assert!(matches!(value.kind, ExprKind::Range { inclusive: false, .. }));
    }

    #[test]
    fn parses_import_with_items() {
        let result = parse_ok(r#"import { a, b } from "geometry" as g"#);
        let StmtKind::Import(import) = &result.program.body[0].kind else { panic!() };
        assert_eq!(import.items.as_ref().unwrap().len(), 2);
        assert_eq!(import.source, "geometry");
        assert!(import.alias.is_some());
    }

    #[test]
    fn parses_export_wrapping_let() {
        let result = parse_ok("export let width = 10");
        assert!(matches!(result.program.body[0].kind, StmtKind::Export(_)));
    }

    #[test]
    fn parses_annotation() {
        let result = parse_ok(r#"@sketch(plane = "XY")"#);
        assert!(matches!(result.program.body[0].kind, StmtKind::Annotation { .. }));
    }

    #[test]
    fn recovers_from_missing_expression_and_parses_next_statement() {
        let mut interner = Interner::new();
        let result = parse("let x = \nlet y = 2", &mut interner);
        assert!(!result.diagnostics.is_empty());
        assert_eq!(result.program.body.len(), 2);
        assert!(matches!(result.program.body[1].kind, StmtKind::Let { .. }));
        assert!(!result.success);
    }

    #[test]
    fn leading_comment_before_first_statement_attaches_to_program_root() {
        let result = parse_ok("// doc\nlet x = 1");
        assert_eq!(result.program.leading_trivia.len(), 1);
        assert!(matches!(&result.program.leading_trivia[0], TriviaItem::Comment { text, .. } if text == " doc"));
        assert!(result.program.body[0].trivia.leading.is_empty());
    }

    #[test]
    fn trailing_comment_attaches_to_previous_statement() {
        let result = parse_ok("let x = 1 // note\nlet y = 2");
        assert_eq!(result.program.body[0].trivia.trailing.as_deref(), Some(" note"));
        assert!(result.program.body[1].trivia.leading.is_empty());
    }

    #[test]
    fn blank_line_run_collapses_into_single_blank_item() {
        let result = parse_ok("x = 1\n\n\n\n\ny = 2");
        let trivia = &result.program.body[1].trivia;
        assert_eq!(trivia.leading.len(), 1);
        assert!(matches!(trivia.leading[0], TriviaItem::Blank { count: 4 }));
    }
}
