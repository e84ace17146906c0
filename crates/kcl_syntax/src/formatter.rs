//! Pretty-prints a [`Program`] back to text, honoring a soft column budget,
//! the blank-line policy, and comment preservation.
//!
//! The primary path reconstructs comments and blank-line intent entirely
//! from trivia captured during parsing (see [`crate::ast::trivia`]); it
//! never needs to re-scan source text. [`format`]'s `source` parameter only
//! feeds the fallback path: comments the parser dropped while resyncing
//! past a grammar error are re-injected, keyed by comparing every comment
//! span the lexer ever saw against the spans the AST trivia actually
//! captured.

use std::collections::HashSet;

use kcl_base::{Interner, Span};

use crate::ast::expr::{Argument, Block, ElseBranch, Expr, ExprKind, Ident, Param};
use crate::ast::stmt::{ExportImport, Import, Program, Stmt, StmtKind};
use crate::ast::trivia::TriviaItem;
use crate::parser::ParseResult;
use crate::token::UnitSuffix;

/// Columns at which the formatter prefers to wrap an array, object, or call.
pub const TARGET_WIDTH: usize = 80;
/// Absolute column ceiling; only consulted as a last resort for expressions
/// the formatter has no way to split further (e.g. a single long string).
pub const HARD_WIDTH: usize = 120;

const INDENT_UNIT: &str = "  ";

/// Renders `result.program` back to text. Pass the original source to
/// additionally recover comments dropped during parse-error recovery.
pub fn format(result: &ParseResult, interner: &Interner, source: Option<&str>) -> String {
    let printer = Printer { interner };
    let mut out = printer.render_program(&result.program);
    if let Some(_source) = source {
        out = reinject_orphan_comments(out, result, &printer);
    }
    out
}

fn indent_str(level: usize) -> String {
    INDENT_UNIT.repeat(level)
}

fn fits(indent: usize, s: &str) -> bool {
    !s.contains('\n') && indent * 2 + s.chars().count() <= TARGET_WIDTH
}

struct Printer<'a> {
    interner: &'a Interner,
}

impl<'a> Printer<'a> {
    fn ident(&self, ident: &Ident) -> &str {
        self.interner.resolve(ident.symbol)
    }

    // ---- top-level driver ---------------------------------------------

    fn render_program(&self, program: &Program) -> String {
        let mut out = String::new();
        let mut emitted_any = false;

        self.render_leading_trivia(&program.leading_trivia, 0, &mut out, true, false);

        for (i, stmt) in program.body.iter().enumerate() {
            let is_fn = is_fn_like(stmt);
            let prev_is_fn = i > 0 && is_fn_like(&program.body[i - 1]);
            let force_blank = emitted_any && (is_fn || prev_is_fn);

            self.render_leading_trivia(&stmt.trivia.leading, 0, &mut out, !emitted_any, force_blank);

            out.push_str(&indent_str(0));
            self.render_stmt(stmt, 0, &mut out);
            self.render_trailing_comment(&stmt.trivia.trailing, stmt.trivia.trailing_is_block, &mut out);
            out.push('\n');
            emitted_any = true;
        }

        // Trailing trivia: keep any comments, drop every blank run — the
        // document always ends in exactly one newline.
        for item in &program.trailing_trivia {
            if let TriviaItem::Comment { is_block, text, .. } = item {
                out.push_str(&indent_str(0));
                render_comment_into(*is_block, text, &mut out);
                out.push('\n');
            }
        }

        while out.ends_with("\n\n") {
            out.pop();
        }
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }

    /// Renders a leading-trivia run: interleaved blank-line gaps and
    /// comments. `is_doc_start` drops a blank run that opens the very first
    /// trivia item of the document (rule: no blank line at file start).
    /// `force_blank` guarantees at least one blank line between whatever
    /// came before and the run, for spacing around `fn` — but that blank
    /// must land *before* a comment block directly attached to the owning
    /// statement, never between the comment and the statement it documents.
    fn render_leading_trivia(
        &self,
        items: &[TriviaItem],
        indent: usize,
        out: &mut String,
        is_doc_start: bool,
        force_blank: bool,
    ) {
        let last_is_blank = matches!(items.last(), Some(TriviaItem::Blank { .. }));

        // The trailing run of comments with no blank line anywhere inside
        // it: these are attached directly to the node that owns this
        // trivia. `attached_run_start == items.len()` means the run ends in
        // a blank (or `items` is empty) — nothing attached to push past.
        let attached_run_start = {
            let mut i = items.len();
            while i > 0 && matches!(items[i - 1], TriviaItem::Comment { .. }) {
                i -= 1;
            }
            i
        };
        let ends_in_comment = attached_run_start < items.len();

        // A blank preceding the attached run (if any) already satisfies the
        // "at least one blank line" requirement; only an attached run with
        // nothing rendered before it needs the forced blank prepended here.
        if force_blank && ends_in_comment && attached_run_start == 0 && !is_doc_start {
            out.push('\n');
        }

        for (idx, item) in items.iter().enumerate() {
            match item {
                TriviaItem::Blank { count } => {
                    if is_doc_start && idx == 0 {
                        continue;
                    }
                    let mut n = (*count).min(2);
                    if force_blank && !ends_in_comment && idx == items.len() - 1 {
                        n = n.max(1);
                    }
                    for _ in 0..n {
                        out.push('\n');
                    }
                }
                TriviaItem::Comment { is_block, text, .. } => {
                    out.push_str(&indent_str(indent));
                    render_comment_into(*is_block, text, out);
                    out.push('\n');
                }
            }
        }
        if force_blank && !last_is_blank && !ends_in_comment && !(is_doc_start && items.is_empty()) {
            out.push('\n');
        }
    }

    fn render_trailing_comment(&self, trailing: &Option<String>, is_block: bool, out: &mut String) {
        if let Some(text) = trailing {
            out.push(' ');
            render_comment_into(is_block, text, out);
        }
    }

    // ---- statements -----------------------------------------------------

    fn render_stmt(&self, stmt: &Stmt, indent: usize, out: &mut String) {
        match &stmt.kind {
            StmtKind::Let { name, value } => {
                out.push_str("let ");
                out.push_str(self.ident(name));
                out.push_str(" = ");
                self.render_expr(value, indent, out);
            }
            StmtKind::Assign { name, value } => {
                out.push_str(self.ident(name));
                out.push_str(" = ");
                self.render_expr(value, indent, out);
            }
            StmtKind::FnDef { name, params, return_type, body } => {
                out.push_str("fn ");
                out.push_str(self.ident(name));
                out.push('(');
                out.push_str(&self.render_params(params));
                out.push(')');
                if let Some(ty) = return_type {
                    out.push_str(": ");
                    out.push_str(self.ident(&ty.name));
                }
                out.push(' ');
                self.render_block(body, indent, out);
            }
            StmtKind::Return { value } => {
                out.push_str("return");
                if let Some(value) = value {
                    out.push(' ');
                    self.render_expr(value, indent, out);
                }
            }
            StmtKind::ExprStmt(expr) => self.render_expr(expr, indent, out),
            StmtKind::Annotation { name, args } => {
                out.push('@');
                out.push_str(self.ident(name));
                if !args.is_empty() {
                    out.push('(');
                    out.push_str(&self.flat_args(args));
                    out.push(')');
                }
            }
            StmtKind::Import(import) => self.render_import(import, out),
            StmtKind::Export(inner) => {
                out.push_str("export ");
                self.render_stmt(inner, indent, out);
            }
            StmtKind::ExportImport(export_import) => self.render_export_import(export_import, out),
        }
    }

    fn render_import(&self, import: &Import, out: &mut String) {
        out.push_str("import ");
        if let Some(items) = &import.items {
            out.push_str(&items.iter().map(|i| self.ident(i)).collect::<Vec<_>>().join(", "));
            out.push_str(" from ");
        }
        out.push('"');
        out.push_str(&escape_str(&import.source));
        out.push('"');
        if let Some(alias) = &import.alias {
            out.push_str(" as ");
            out.push_str(self.ident(alias));
        }
    }

    fn render_export_import(&self, export_import: &ExportImport, out: &mut String) {
        out.push_str("export ");
        out.push_str(&export_import.items.iter().map(|i| self.ident(i)).collect::<Vec<_>>().join(", "));
        out.push_str(" from \"");
        out.push_str(&escape_str(&export_import.source));
        out.push('"');
    }

    fn render_params(&self, params: &[Param]) -> String {
        params.iter().map(|p| self.render_param(p)).collect::<Vec<_>>().join(", ")
    }

    fn render_param(&self, param: &Param) -> String {
        let mut s = String::new();
        if param.at_prefixed {
            s.push('@');
        }
        s.push_str(self.ident(&param.name));
        if let Some(ty) = &param.type_ascription {
            s.push_str(": ");
            s.push_str(self.ident(&ty.name));
        }
        s
    }

    // ---- blocks ----------------------------------------------------------

    fn render_block(&self, block: &Block, indent: usize, out: &mut String) {
        if let Some(oneliner) = self.try_block_oneline(block) {
            out.push_str(&oneliner);
            return;
        }
        out.push_str("{\n");
        for (i, stmt) in block.stmts.iter().enumerate() {
            self.render_leading_trivia(&stmt.trivia.leading, indent + 1, out, i == 0, false);
            out.push_str(&indent_str(indent + 1));
            self.render_stmt(stmt, indent + 1, out);
            self.render_trailing_comment(&stmt.trivia.trailing, stmt.trivia.trailing_is_block, out);
            out.push('\n');
        }
        if let Some(tail) = &block.tail {
            out.push_str(&indent_str(indent + 1));
            self.render_expr(tail, indent + 1, out);
            out.push('\n');
        }
        out.push_str(&indent_str(indent));
        out.push('}');
    }

    /// A block collapses onto one line only when it holds a single trivial
    /// statement (a short `return`, or a short tail expression) and carries
    /// no comments that would otherwise be lost.
    fn try_block_oneline(&self, block: &Block) -> Option<String> {
        if block.stmts.is_empty() && block.tail.is_none() {
            return Some("{}".to_string());
        }
        if block.stmts.len() == 1 && block.tail.is_none() {
            let stmt = &block.stmts[0];
            if !stmt.trivia.is_empty() {
                return None;
            }
            if let StmtKind::Return { value } = &stmt.kind {
                let body = match value {
                    Some(v) => {
                        let inline = self.flat_expr(v);
                        if !is_trivial_atom(&inline) {
                            return None;
                        }
                        format!("return {inline}")
                    }
                    None => "return".to_string(),
                };
                return Some(format!("{{ {body} }}"));
            }
            return None;
        }
        if block.stmts.is_empty() {
            if let Some(tail) = &block.tail {
                let inline = self.flat_expr(tail);
                if is_trivial_atom(&inline) {
                    return Some(format!("{{ {inline} }}"));
                }
            }
        }
        None
    }

    // ---- expressions: dispatch -------------------------------------------

    fn render_expr(&self, expr: &Expr, indent: usize, out: &mut String) {
        match &expr.kind {
            ExprKind::Array(items) => self.render_array(items, indent, out),
            ExprKind::Object(fields) => self.render_object(fields, indent, out),
            ExprKind::Call { callee, args } => self.render_call(callee, args, indent, out),
            ExprKind::If { .. } => self.render_if(expr, indent, out),
            ExprKind::Fn { params, return_type, body } => {
                out.push_str("fn(");
                out.push_str(&self.render_params(params));
                out.push(')');
                if let Some(ty) = return_type {
                    out.push_str(": ");
                    out.push_str(self.ident(&ty.name));
                }
                out.push(' ');
                self.render_block(body, indent, out);
            }
            _ => out.push_str(&self.flat_expr(expr)),
        }
    }

    fn render_array(&self, items: &[Expr], indent: usize, out: &mut String) {
        let flat = format!("[{}]", items.iter().map(|e| self.flat_expr(e)).collect::<Vec<_>>().join(", "));
        if items.is_empty() || fits(indent, &flat) {
            out.push_str(&flat);
            return;
        }
        out.push_str("[\n");
        for item in items {
            out.push_str(&indent_str(indent + 1));
            self.render_expr(item, indent + 1, out);
            out.push_str(",\n");
        }
        out.push_str(&indent_str(indent));
        out.push(']');
    }

    fn render_object(&self, fields: &[(Ident, Expr)], indent: usize, out: &mut String) {
        let flat_fields: Vec<String> =
            fields.iter().map(|(k, v)| format!("{}: {}", self.ident(k), self.flat_expr(v))).collect();
        let flat = if flat_fields.is_empty() { "{}".to_string() } else { format!("{{ {} }}", flat_fields.join(", ")) };
        if fields.is_empty() || fits(indent, &flat) {
            out.push_str(&flat);
            return;
        }
        out.push_str("{\n");
        for (key, value) in fields {
            out.push_str(&indent_str(indent + 1));
            out.push_str(self.ident(key));
            out.push_str(": ");
            self.render_expr(value, indent + 1, out);
            out.push_str(",\n");
        }
        out.push_str(&indent_str(indent));
        out.push('}');
    }

    fn render_call(&self, callee: &Ident, args: &[Argument], indent: usize, out: &mut String) {
        let flat = format!("{}({})", self.ident(callee), self.flat_args(args));
        if args.is_empty() || fits(indent, &flat) {
            out.push_str(&flat);
            return;
        }
        out.push_str(self.ident(callee));
        out.push_str("(\n");
        for arg in args {
            out.push_str(&indent_str(indent + 1));
            self.render_arg(arg, indent + 1, out);
            out.push_str(",\n");
        }
        out.push_str(&indent_str(indent));
        out.push(')');
    }

    fn render_arg(&self, arg: &Argument, indent: usize, out: &mut String) {
        if let Some(label) = &arg.label {
            out.push_str(self.ident(label));
            out.push_str(" = ");
        }
        self.render_expr(&arg.value, indent, out);
    }

    fn render_if(&self, expr: &Expr, indent: usize, out: &mut String) {
        let ExprKind::If { cond, then_branch, else_branch } = &expr.kind else { unreachable!() };
        out.push_str("if ");
        out.push_str(&self.flat_expr(cond));
        out.push(' ');
        self.render_block(then_branch, indent, out);
        if let Some(branch) = else_branch {
            out.push_str(" else ");
            match branch.as_ref() {
                ElseBranch::Block(block) => self.render_block(block, indent, out),
                ElseBranch::If(nested) => self.render_if(nested, indent, out),
            }
        }
    }

    // ---- expressions: flat (single-line) rendering -----------------------

    fn flat_args(&self, args: &[Argument]) -> String {
        args.iter().map(|a| self.flat_arg(a)).collect::<Vec<_>>().join(", ")
    }

    fn flat_arg(&self, arg: &Argument) -> String {
        match &arg.label {
            Some(label) => format!("{} = {}", self.ident(label), self.flat_expr(&arg.value)),
            None => self.flat_expr(&arg.value),
        }
    }

    fn flat_expr(&self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Number { value, unit } => format_number(*value, *unit),
            ExprKind::Bool(b) => b.to_string(),
            ExprKind::Str(s) => format!("\"{}\"", escape_str(s)),
            ExprKind::Nil => "nil".to_string(),
            ExprKind::Array(items) => {
                format!("[{}]", items.iter().map(|e| self.flat_expr(e)).collect::<Vec<_>>().join(", "))
            }
            ExprKind::Object(fields) => {
                if fields.is_empty() {
                    return "{}".to_string();
                }
                let inner: Vec<String> =
                    fields.iter().map(|(k, v)| format!("{}: {}", self.ident(k), self.flat_expr(v))).collect();
                format!("{{ {} }}", inner.join(", "))
            }
            ExprKind::Var(ident) => self.ident(ident).to_string(),
            ExprKind::Call { callee, args } => format!("{}({})", self.ident(callee), self.flat_args(args)),
            ExprKind::Pipe { left, right } => format!("{} |> {}", self.flat_expr(left), self.flat_expr(right)),
            ExprKind::PipeSubst => "%".to_string(),
            ExprKind::Tag(ident) => format!("${}", self.ident(ident)),
            ExprKind::Unary { op, expr } => format!("{}{}", unary_symbol(*op), self.flat_expr(expr)),
            ExprKind::Binary { op, left, right } => {
                format!("{} {} {}", self.flat_expr(left), binary_symbol(*op), self.flat_expr(right))
            }
            ExprKind::Index { base, index } => format!("{}[{}]", self.flat_expr(base), self.flat_expr(index)),
            ExprKind::Range { start, end, inclusive } => {
                format!("{}{}{}", self.flat_expr(start), if *inclusive { ".." } else { "..<" }, self.flat_expr(end))
            }
            ExprKind::Member { base, property } => format!("{}.{}", self.flat_expr(base), self.ident(property)),
            ExprKind::TypeAscription { expr, ty } => format!("{}: {}", self.flat_expr(expr), self.ident(&ty.name)),
            ExprKind::If { .. } => {
                let mut s = String::new();
                self.render_if(expr, 0, &mut s);
                s.replace('\n', " ")
            }
            ExprKind::Fn { params, body, .. } => {
                let mut s = String::new();
                self.render_block(body, 0, &mut s);
                format!("fn({}) {}", self.render_params(params), s.replace('\n', " "))
            }
        }
    }
}

fn is_fn_like(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::FnDef { .. } => true,
        StmtKind::Export(inner) => is_fn_like(inner),
        _ => false,
    }
}

fn is_trivial_atom(s: &str) -> bool {
    s.len() <= 24 && !s.contains('\n')
}

fn render_comment_into(is_block: bool, text: &str, out: &mut String) {
    if is_block {
        out.push_str("/*");
        out.push_str(text);
        out.push_str("*/");
    } else {
        out.push_str("//");
        out.push_str(text);
    }
}

fn escape_str(s: &str) -> String {
    let mut out = String::new();
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

fn format_number(value: f64, unit: Option<UnitSuffix>) -> String {
    let num = if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    };
    match unit {
        Some(u) => format!("{num}{}", u.as_str()),
        None => num,
    }
}

fn binary_symbol(op: crate::ast::expr::BinaryOp) -> &'static str {
    use crate::ast::expr::BinaryOp::*;
    match op {
        Add => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        Mod => "%",
        Pow => "^",
        Eq => "==",
        Ne => "!=",
        Lt => "<",
        Gt => ">",
        Le => "<=",
        Ge => ">=",
        And => "&",
        Or => "|",
    }
}

fn unary_symbol(op: crate::ast::expr::UnaryOp) -> &'static str {
    use crate::ast::expr::UnaryOp::*;
    match op {
        Neg => "-",
        Not => "!",
    }
}

// ---- fallback: line-merge comment recovery -------------------------------

/// Comments the parser dropped while resyncing past a grammar error never
/// make it into any [`TriviaItem`]. This walks every comment the lexer ever
/// saw (carried on `result.tokens`) and re-injects the ones missing from the
/// rendered trivia, each on its own line, immediately before the top-level
/// statement that follows it in the original source.
///
/// Only top-level placement is attempted; a comment dropped inside a
/// function body that also failed to parse falls back to the end of the
/// document. Clean documents never hit this path.
fn reinject_orphan_comments(formatted: String, result: &ParseResult, printer: &Printer) -> String {
    let mut captured: HashSet<usize> = HashSet::new();
    collect_captured_spans(&result.program.leading_trivia, &mut captured);
    collect_captured_spans(&result.program.trailing_trivia, &mut captured);
    for stmt in &result.program.body {
        collect_stmt_spans(stmt, &mut captured);
    }

    let mut orphans: Vec<(Span, bool, String)> = Vec::new();
    for token in &result.tokens {
        for trivia in &token.leading_trivia {
            if !captured.contains(&trivia.span.start) {
                orphans.push((trivia.span, trivia.is_block, trivia.text.clone()));
            }
        }
    }
    if orphans.is_empty() {
        return formatted;
    }
    orphans.sort_by_key(|(span, _, _)| span.start);

    // Re-render the program, splicing orphan comment lines immediately
    // before whichever top-level statement starts after them.
    let mut out = String::new();
    let mut emitted_any = false;
    let mut orphan_iter = orphans.into_iter().peekable();

    printer.render_leading_trivia(&result.program.leading_trivia, 0, &mut out, true, false);
    while let Some((span, is_block, text)) = orphan_iter.peek().cloned() {
        let before_first_stmt = result.program.body.first().map(|s| span.start < s.span.start).unwrap_or(true);
        if !before_first_stmt {
            break;
        }
        render_comment_into(is_block, &text, &mut out);
        out.push('\n');
        orphan_iter.next();
    }

    for (i, stmt) in result.program.body.iter().enumerate() {
        let is_fn = is_fn_like(stmt);
        let prev_is_fn = i > 0 && is_fn_like(&result.program.body[i - 1]);
        let force_blank = emitted_any && (is_fn || prev_is_fn);
        printer.render_leading_trivia(&stmt.trivia.leading, 0, &mut out, !emitted_any, force_blank);

        out.push_str(&indent_str(0));
        printer.render_stmt(stmt, 0, &mut out);
        printer.render_trailing_comment(&stmt.trivia.trailing, stmt.trivia.trailing_is_block, &mut out);
        out.push('\n');
        emitted_any = true;

        let next_start = result.program.body.get(i + 1).map(|s| s.span.start);
        while let Some((span, is_block, text)) = orphan_iter.peek().cloned() {
            let belongs_here = next_start.map(|n| span.start < n).unwrap_or(true);
            if !belongs_here {
                break;
            }
            render_comment_into(is_block, &text, &mut out);
            out.push('\n');
            orphan_iter.next();
        }
    }

    for item in &result.program.trailing_trivia {
        if let TriviaItem::Comment { is_block, text, .. } = item {
            render_comment_into(*is_block, text, &mut out);
            out.push('\n');
        }
    }

    while out.ends_with("\n\n") {
        out.pop();
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn collect_captured_spans(items: &[TriviaItem], out: &mut HashSet<usize>) {
    for item in items {
        if let TriviaItem::Comment { span, .. } = item {
            out.insert(span.start);
        }
    }
}

fn collect_stmt_spans(stmt: &Stmt, out: &mut HashSet<usize>) {
    collect_captured_spans(&stmt.trivia.leading, out);
    if let StmtKind::Export(inner) = &stmt.kind {
        collect_stmt_spans(inner, out);
    }
    if let StmtKind::FnDef { body, .. } = &stmt.kind {
        for s in &body.stmts {
            collect_stmt_spans(s, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn fmt(source: &str) -> String {
        let mut interner = Interner::new();
        let result = parse(source, &mut interner);
        format(&result, &interner, Some(source))
    }

    #[test]
    fn blank_line_runs_clamp_to_two() {
        let output = fmt("x = 1\n\n\n\n\ny = 2");
        assert_eq!(output, "x = 1\n\n\ny = 2\n");
    }

    #[test]
    fn blank_lines_inserted_around_fn_definitions() {
        let output = fmt("let x = 10\nfn f(@a) { return a }");
        assert!(output.contains("\n\nfn f(@a) { return a }"));
    }

    #[test]
    fn forced_blank_lands_before_a_doc_comment_attached_to_fn() {
        let output = fmt("let x = 10\n// doc\nfn f(@a) { return a }");
        assert_eq!(output, "let x = 10\n\n// doc\nfn f(@a) { return a }\n");
    }

    #[test]
    fn positional_call_args_never_emit_synthetic_labels() {
        let output = fmt("result = makeBox(10, 20, 30)");
        assert!(output.contains("makeBox(10, 20, 30)"));
        assert!(!output.contains("$0"));
        assert!(!output.contains("$1"));
        assert!(!output.contains("$2"));
    }

    #[test]
    fn no_leading_blank_line_at_document_start() {
        let output = fmt("\n\nlet x = 1");
        assert!(!output.starts_with('\n'));
    }

    #[test]
    fn single_trailing_newline() {
        let output = fmt("let x = 1\n\n\n\n");
        assert_eq!(output, "let x = 1\n");
    }

    #[test]
    fn format_is_idempotent() {
        let once = fmt("let x = 1\n\n\nfn f(@a) { return a }\nresult = makeBox(10, 20, 30)");
        let mut interner = Interner::new();
        let reparsed = parse(&once, &mut interner);
        let twice = format(&reparsed, &interner, Some(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn long_array_breaks_one_item_per_line() {
        let source = "let pts = [100000, 200000, 300000, 400000, 500000, 600000, 700000, 800000]";
        let output = fmt(source);
        assert!(output.contains("[\n"));
        assert!(output.trim_end().ends_with("]"));
        assert!(output.contains(",\n"));
    }

    #[test]
    fn short_array_stays_single_line() {
        let output = fmt("let pts = [1, 2, 3]");
        assert!(output.contains("[1, 2, 3]"));
    }

    #[test]
    fn leading_comment_preserved_before_statement() {
        let output = fmt("// note\nlet x = 1");
        assert!(output.contains("// note\nlet x = 1"));
    }

    #[test]
    fn trailing_comment_stays_on_same_line() {
        let output = fmt("let x = 1 // note");
        assert!(output.contains("let x = 1 // note"));
    }

    #[test]
    fn unit_suffix_preserved() {
        let output = fmt("let w = 42mm");
        assert!(output.contains("42mm"));
    }
}
