//! The built-in rule set: naming convention, unused bindings, and magic
//! numbers. Each rule walks the AST via [`crate::ast::visit`] rather than
//! re-deriving its own traversal.

use std::collections::{HashMap, HashSet};

use kcl_base::{Interner, Span, Symbol};

use crate::ast::expr::ExprKind;
use crate::ast::stmt::StmtKind;
use crate::ast::visit::walk_program;
use crate::diagnostic::{Diagnostic, Range, Severity};
use crate::lint::{LintContext, Rule};
use crate::line_index::LineIndex;

fn span_to_range(line_index: &LineIndex, span: Span) -> Range {
    Range::new(line_index.position(span.start), line_index.position(span.end))
}

/// Flags binding names that are not lowerCamelCase: a leading uppercase
/// letter or any underscore (other than a sole leading `_`) disqualifies a
/// name.
pub struct CamelCaseRule;

fn is_camel_case(name: &str) -> bool {
    if name.is_empty() {
        return true;
    }
    if name == "_" || name.starts_with('_') {
        return false;
    }
    if !name.chars().next().unwrap().is_ascii_lowercase() {
        return false;
    }
    !name.contains('_')
}

impl Rule for CamelCaseRule {
    fn name(&self) -> &str {
        "camel-case"
    }

    fn description(&self) -> &str {
        "binding names should be lowerCamelCase"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut check_ident = |symbol: Symbol, span: Span, interner: &Interner| {
            let name = interner.resolve(symbol);
            if !is_camel_case(name) {
                diagnostics.push(Diagnostic::new(
                    span_to_range(ctx.line_index, span),
                    self.default_severity(),
                    "kcl",
                    format!("'{name}' should be camelCase"),
                ).with_code("camel-case"));
            }
        };

        let mut on_stmt = |stmt: &crate::ast::Stmt| match &stmt.kind {
            StmtKind::Let { name, .. } => check_ident(name.symbol, name.span, ctx.interner),
            StmtKind::Assign { name, .. } => check_ident(name.symbol, name.span, ctx.interner),
            StmtKind::FnDef { name, params, .. } => {
                check_ident(name.symbol, name.span, ctx.interner);
                for param in params {
                    check_ident(param.name.symbol, param.name.span, ctx.interner);
                }
            }
            _ => {}
        };
        let mut on_expr = |_: &crate::ast::Expr| {};
        walk_program(ctx.program, &mut on_stmt, &mut on_expr);
        diagnostics
    }
}

/// Flags `let` bindings that are never referenced elsewhere in the
/// document. A binding wrapped in `export` is public API and exempt.
///
/// This is a whole-document, symbol-based approximation rather than a
/// scope-accurate one: a binding counts as used if its name appears as a
/// variable reference anywhere in the program, regardless of nesting. Real
/// lexical scoping (so a same-named binding in a sibling function doesn't
/// mask a genuinely unused one) is future work.
pub struct UnusedVariableRule;

impl Rule for UnusedVariableRule {
    fn name(&self) -> &str {
        "unused-variable"
    }

    fn description(&self) -> &str {
        "flags let bindings that are never referenced"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        let mut declared: HashMap<Symbol, (Span, &'static str)> = HashMap::new();
        let mut used: HashSet<Symbol> = HashSet::new();

        let mut on_stmt = |stmt: &crate::ast::Stmt| {
            let (name, exported) = match &stmt.kind {
                StmtKind::Let { name, .. } => (Some(name), false),
                StmtKind::Export(inner) => match &inner.kind {
                    StmtKind::Let { name, .. } => (Some(name), true),
                    _ => (None, false),
                },
                _ => (None, false),
            };
            if let Some(name) = name {
                if !exported {
                    declared.entry(name.symbol).or_insert((name.span, "let"));
                } else {
                    // Exported bindings are never flagged: mark them used
                    // up front so they never surface below.
                    used.insert(name.symbol);
                }
            }
        };
        let mut on_expr = |expr: &crate::ast::Expr| {
            if let ExprKind::Var(ident) = &expr.kind {
                used.insert(ident.symbol);
            }
        };
        walk_program(ctx.program, &mut on_stmt, &mut on_expr);

        let mut diagnostics: Vec<_> = declared
            .into_iter()
            .filter(|(symbol, _)| !used.contains(symbol))
            .map(|(symbol, (span, _))| {
                let name = ctx.interner.resolve(symbol);
                Diagnostic::new(
                    span_to_range(ctx.line_index, span),
                    self.default_severity(),
                    "kcl",
                    format!("variable '{name}' is never used"),
                )
                .with_code("unused-variable")
            })
            .collect();
        diagnostics.sort_by_key(|d| (d.range.start.line, d.range.start.character));
        diagnostics
    }
}

/// Flags bare number literals other than `0` and `1`, and any number
/// carrying an explicit unit suffix is exempt (units make a quantity
/// self-documenting).
pub struct MagicNumbersRule;

impl Rule for MagicNumbersRule {
    fn name(&self) -> &str {
        "magic-numbers"
    }

    fn description(&self) -> &str {
        "flags unexplained numeric literals"
    }

    fn default_severity(&self) -> Severity {
        Severity::Information
    }

    fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut on_stmt = |_: &crate::ast::Stmt| {};
        let mut on_expr = |expr: &crate::ast::Expr| {
            if let ExprKind::Number { value, unit } = &expr.kind {
                if unit.is_none() && *value != 0.0 && *value != 1.0 {
                    diagnostics.push(
                        Diagnostic::new(
                            span_to_range(ctx.line_index, expr.span),
                            self.default_severity(),
                            "kcl",
                            format!("magic number '{value}'"),
                        )
                        .with_code("magic-numbers"),
                    );
                }
            }
        };
        walk_program(ctx.program, &mut on_stmt, &mut on_expr);
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::LintContext;
    use crate::parser::parse;

    fn run_rule(rule: &dyn Rule, source: &str) -> Vec<Diagnostic> {
        let mut interner = Interner::new();
        let result = parse(source, &mut interner);
        let ctx = LintContext {
            program: &result.program,
            tokens: &result.tokens,
            line_index: &result.line_index,
            interner: &interner,
            source_text: Some(source),
        };
        rule.check(&ctx)
    }

    #[test]
    fn camel_case_flags_snake_case_binding() {
        let diags = run_rule(&CamelCaseRule, "let my_variable = 10");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("my_variable"));
        assert!(diags[0].message.contains("camelCase"));
        assert_eq!(diags[0].range.start.character, 4);
        assert_eq!(diags[0].range.end.character, 15);
    }

    #[test]
    fn camel_case_allows_lower_camel() {
        let diags = run_rule(&CamelCaseRule, "let myVariable = 10");
        assert!(diags.is_empty());
    }

    #[test]
    fn unused_variable_flags_only_unreferenced_binding() {
        let diags = run_rule(
            &UnusedVariableRule,
            "let unused = 10\nlet used = 20\nlet r = used + 5",
        );
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("unused"));
    }

    #[test]
    fn unused_variable_exempts_exports() {
        let diags = run_rule(&UnusedVariableRule, "export let width = 10");
        assert!(diags.is_empty());
    }

    #[test]
    fn magic_numbers_flags_bare_literal() {
        let diags = run_rule(&MagicNumbersRule, "let area = width * 42");
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn magic_numbers_exempts_units_and_zero_one() {
        let diags = run_rule(&MagicNumbersRule, "let w = 42mm");
        assert!(diags.is_empty());

        let diags = run_rule(&MagicNumbersRule, "let zero = 0\nlet one = 1\nlet m = -1");
        assert!(diags.is_empty());
    }
}
