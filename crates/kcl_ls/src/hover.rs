//! A hover provider scoped to what the core front end actually knows: a
//! token's lexical kind, and — for identifiers — which binding declared it.
//! Type signatures and stdlib documentation need the catalog collaborators
//! this crate deliberately doesn't depend on; hover simply has nothing to
//! say about those and returns `None`.

use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position, Range};

use kcl_base::Symbol;
use kcl_syntax::ast::expr::ExprKind;
use kcl_syntax::ast::stmt::StmtKind;
use kcl_syntax::ast::visit::walk_program;
use kcl_syntax::token::TokenKind;

use crate::document::DocumentState;

pub fn hover(doc: &DocumentState, position: Position) -> Option<Hover> {
    let offset = doc.parse_result.line_index.offset(kcl_syntax::line_index::Position::new(
        position.line,
        position.character,
    ));
    let token = doc.parse_result.tokens.iter().find(|t| offset >= t.span.start && offset < t.span.end)?;

    let content = match &token.kind {
        TokenKind::Let => keyword_doc("let", "Declares an immutable binding.\n\n```\nlet width = 10mm\n```"),
        TokenKind::Fn => keyword_doc("fn", "Declares a named function.\n\n```\nfn square(@x) { return x * x }\n```"),
        TokenKind::Return => keyword_doc("return", "Returns a value from the enclosing function."),
        TokenKind::If => keyword_doc("if", "A conditional expression; `if cond { .. } else { .. }`."),
        TokenKind::Import => keyword_doc("import", "Imports bindings from another module."),
        TokenKind::Export => keyword_doc("export", "Re-exports a binding or import as public API."),
        TokenKind::Ident(symbol) => describe_ident(doc, *symbol),
        _ => None,
    }?;

    let range = Range {
        start: doc.parse_result.line_index.position(token.span.start).into_lsp(),
        end: doc.parse_result.line_index.position(token.span.end).into_lsp(),
    };
    Some(Hover { contents: HoverContents::Markup(MarkupContent { kind: MarkupKind::Markdown, value: content }), range: Some(range) })
}

fn keyword_doc(name: &str, description: &str) -> Option<String> {
    Some(format!("**{name}**\n\n{description}"))
}

/// Finds the `let`/`fn`/param declaration whose name matches `symbol` and
/// describes it. Whole-document scan, same scoping approximation as
/// [`kcl_syntax::lint::rules::UnusedVariableRule`].
fn describe_ident(doc: &DocumentState, symbol: Symbol) -> Option<String> {
    let mut found: Option<String> = None;
    let mut on_stmt = |stmt: &kcl_syntax::ast::Stmt| {
        if found.is_some() {
            return;
        }
        match &stmt.kind {
            StmtKind::Let { name, .. } if name.symbol == symbol => {
                found = Some(format!("**let** `{}`", doc.interner.resolve(symbol)));
            }
            StmtKind::FnDef { name, params, .. } if name.symbol == symbol => {
                let param_names: Vec<&str> = params.iter().map(|p| doc.interner.resolve(p.name.symbol)).collect();
                found = Some(format!("**fn** `{}({})`", doc.interner.resolve(symbol), param_names.join(", ")));
            }
            StmtKind::FnDef { params, .. } => {
                for param in params {
                    if param.name.symbol == symbol {
                        found = Some(format!("**parameter** `{}`", doc.interner.resolve(symbol)));
                    }
                }
            }
            _ => {}
        }
    };
    let mut on_expr = |_: &kcl_syntax::ast::Expr| {};
    walk_program(&doc.parse_result.program, &mut on_stmt, &mut on_expr);
    found.or_else(|| describe_if_tag_or_member(doc, symbol))
}

fn describe_if_tag_or_member(doc: &DocumentState, symbol: Symbol) -> Option<String> {
    let mut found: Option<String> = None;
    let mut on_stmt = |_: &kcl_syntax::ast::Stmt| {};
    let mut on_expr = |expr: &kcl_syntax::ast::Expr| {
        if found.is_some() {
            return;
        }
        if let ExprKind::Tag(ident) = &expr.kind {
            if ident.symbol == symbol {
                found = Some(format!("**tag** `${}`", doc.interner.resolve(symbol)));
            }
        }
    };
    walk_program(&doc.parse_result.program, &mut on_stmt, &mut on_expr);
    found
}

trait IntoLsp {
    fn into_lsp(self) -> Position;
}

impl IntoLsp for kcl_syntax::line_index::Position {
    fn into_lsp(self) -> Position {
        Position { line: self.line, character: self.character }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_on_let_keyword() {
        let doc = DocumentState::new("let width = 10mm".to_string(), 1);
        let result = hover(&doc, Position { line: 0, character: 1 });
        assert!(result.is_some());
        match result.unwrap().contents {
            HoverContents::Markup(m) => assert!(m.value.contains("let")),
            _ => panic!("expected markup"),
        }
    }

    #[test]
    fn hover_on_binding_name_describes_the_let() {
        let doc = DocumentState::new("let width = 10mm\nresult = width * 2".to_string(), 1);
        let result = hover(&doc, Position { line: 1, character: 10 });
        assert!(result.is_some());
        match result.unwrap().contents {
            HoverContents::Markup(m) => assert!(m.value.contains("width")),
            _ => panic!("expected markup"),
        }
    }

    #[test]
    fn hover_on_whitespace_returns_none() {
        let doc = DocumentState::new("let x = 1".to_string(), 1);
        let result = hover(&doc, Position { line: 0, character: 9 });
        assert!(result.is_none());
    }
}
