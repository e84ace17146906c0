//! The trivia-aware AST produced by the parser.
//!
//! [`Expr`] and [`Stmt`] are sum types with one variant per KCL construct;
//! visitors over them (the lint rules, the formatter, the semantic-token
//! classifier) match on `kind` rather than re-deriving shape from data.

pub mod expr;
pub mod stmt;
pub mod trivia;
pub mod visit;

pub use expr::{Argument, Expr, ExprKind, Param, TypeRef};
pub use stmt::{Program, Stmt, StmtKind};
pub use trivia::{Trivia, TriviaItem};
