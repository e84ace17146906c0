//! A hand-written walker over [`Program`]/[`Stmt`]/[`Expr`], shared by lint
//! rules that need to inspect every statement or expression regardless of
//! nesting depth (function bodies, `if` branches, blocks).
//!
//! Rather than have each rule re-derive its own recursion over the AST
//! shape, rules call [`walk_program`] with the callbacks they care about;
//! callbacks they don't need can be no-ops.

use crate::ast::expr::{Block, ElseBranch, Expr, ExprKind};
use crate::ast::stmt::{Program, Stmt, StmtKind};

/// Visits every statement and expression in `program`, including those
/// nested inside function bodies and `if`/`else` blocks.
pub fn walk_program<'a>(
    program: &'a Program,
    on_stmt: &mut dyn FnMut(&'a Stmt),
    on_expr: &mut dyn FnMut(&'a Expr),
) {
    for stmt in &program.body {
        walk_stmt(stmt, on_stmt, on_expr);
    }
}

pub fn walk_stmt<'a>(stmt: &'a Stmt, on_stmt: &mut dyn FnMut(&'a Stmt), on_expr: &mut dyn FnMut(&'a Expr)) {
    on_stmt(stmt);
    match &stmt.kind {
        StmtKind::Let { value, .. } => walk_expr(value, on_stmt, on_expr),
        StmtKind::Assign { value, .. } => walk_expr(value, on_stmt, on_expr),
        StmtKind::Return { value: Some(value) } => walk_expr(value, on_stmt, on_expr),
        StmtKind::Return { value: None } => {}
        StmtKind::ExprStmt(expr) => walk_expr(expr, on_stmt, on_expr),
        StmtKind::FnDef { body, .. } => walk_block(body, on_stmt, on_expr),
        StmtKind::Annotation { args, .. } => {
            for arg in args {
                walk_expr(&arg.value, on_stmt, on_expr);
            }
        }
        StmtKind::Export(inner) => walk_stmt(inner, on_stmt, on_expr),
        StmtKind::Import(_) | StmtKind::ExportImport(_) => {}
    }
}

fn walk_block<'a>(block: &'a Block, on_stmt: &mut dyn FnMut(&'a Stmt), on_expr: &mut dyn FnMut(&'a Expr)) {
    for stmt in &block.stmts {
        walk_stmt(stmt, on_stmt, on_expr);
    }
    if let Some(tail) = &block.tail {
        walk_expr(tail, on_stmt, on_expr);
    }
}

pub fn walk_expr<'a>(expr: &'a Expr, on_stmt: &mut dyn FnMut(&'a Stmt), on_expr: &mut dyn FnMut(&'a Expr)) {
    on_expr(expr);
    match &expr.kind {
        ExprKind::Number { .. }
        | ExprKind::Bool(_)
        | ExprKind::Str(_)
        | ExprKind::Nil
        | ExprKind::Var(_)
        | ExprKind::PipeSubst
        | ExprKind::Tag(_) => {}
        ExprKind::Array(items) => {
            for item in items {
                walk_expr(item, on_stmt, on_expr);
            }
        }
        ExprKind::Object(fields) => {
            for (_, value) in fields {
                walk_expr(value, on_stmt, on_expr);
            }
        }
        ExprKind::Call { args, .. } => {
            for arg in args {
                walk_expr(&arg.value, on_stmt, on_expr);
            }
        }
        ExprKind::Pipe { left, right } => {
            walk_expr(left, on_stmt, on_expr);
            walk_expr(right, on_stmt, on_expr);
        }
        ExprKind::Unary { expr, .. } => walk_expr(expr, on_stmt, on_expr),
        ExprKind::Binary { left, right, .. } => {
            walk_expr(left, on_stmt, on_expr);
            walk_expr(right, on_stmt, on_expr);
        }
        ExprKind::Index { base, index } => {
            walk_expr(base, on_stmt, on_expr);
            walk_expr(index, on_stmt, on_expr);
        }
        ExprKind::Range { start, end, .. } => {
            walk_expr(start, on_stmt, on_expr);
            walk_expr(end, on_stmt, on_expr);
        }
        ExprKind::Member { base, .. } => walk_expr(base, on_stmt, on_expr),
        ExprKind::TypeAscription { expr, .. } => walk_expr(expr, on_stmt, on_expr),
        ExprKind::If { cond, then_branch, else_branch } => {
            walk_expr(cond, on_stmt, on_expr);
            walk_block(then_branch, on_stmt, on_expr);
            if let Some(branch) = else_branch {
                match branch.as_ref() {
                    ElseBranch::Block(block) => walk_block(block, on_stmt, on_expr),
                    ElseBranch::If(nested) => walk_expr(nested, on_stmt, on_expr),
                }
            }
        }
        ExprKind::Fn { body, .. } => walk_block(body, on_stmt, on_expr),
    }
}
