use kcl_base::Span;

use crate::ast::expr::{Argument, Expr, Ident, Param, TypeRef};
use crate::ast::expr::Block;
use crate::ast::trivia::{Trivia, TriviaItem};

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub items: Option<Vec<Ident>>,
    pub source: String,
    pub alias: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportImport {
    pub items: Vec<Ident>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Let { name: Ident, value: Expr },
    /// A bare top-level assignment without `let`.
    Assign { name: Ident, value: Expr },
    FnDef { name: Ident, params: Vec<Param>, return_type: Option<TypeRef>, body: Block },
    Return { value: Option<Expr> },
    ExprStmt(Expr),
    Annotation { name: Ident, args: Vec<Argument> },
    Import(Import),
    /// `export` wrapping any other statement.
    Export(Box<Stmt>),
    /// `export` wrapping the re-export shorthand `itemList from STRING`.
    ExportImport(ExportImport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
    pub trivia: Trivia,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span, trivia: Trivia::default() }
    }
}

/// The root of a parsed document: an ordered statement sequence plus any
/// trivia that appeared before the first statement or after the last one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub leading_trivia: Vec<TriviaItem>,
    pub trailing_trivia: Vec<TriviaItem>,
}
