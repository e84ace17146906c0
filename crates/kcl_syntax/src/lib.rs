#![cfg_attr(docsrs, feature(doc_cfg))]

//! # kcl-syntax
//!
//! The front-end pipeline for KCL: a position-preserving lexer and parser
//! that produce a trivia-aware AST, a lint engine that multiplexes rule
//! diagnostics over a parse result, and a formatter that pretty-prints a
//! program back to text while preserving comments and intentional blank
//! lines.
//!
//! # Pipeline
//!
//! ```text
//! source text ─▶ LineIndex + Lexer ─▶ tokens ─▶ Parser ─▶ Program + diagnostics
//!                                                              │
//!                                        ┌─────────────────────┼─────────────────────┐
//!                                        ▼                     ▼                     ▼
//!                                  LintEngine             Formatter           (hover, semantic
//!                                  (diagnostics)        (text edits)           tokens, ...)
//! ```
//!
//! This crate has no knowledge of JSON-RPC, editor transports, or the KCL
//! stdlib catalog; [`kcl_ls`](../kcl_ls/index.html) builds on top of it to
//! expose those as language-server features.
//!
//! # Example
//!
//! ```
//! use kcl_base::Interner;
//! use kcl_syntax::parser::parse;
//!
//! let mut interner = Interner::new();
//! let result = parse("let width = 10mm", &mut interner);
//! assert!(result.success);
//! assert_eq!(result.program.body.len(), 1);
//! ```

pub mod token;
pub mod line_index;
pub mod diagnostic;
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod lint;
pub mod formatter;

pub use diagnostic::{Diagnostic, Range, Severity};
pub use formatter::format;
pub use line_index::{LineIndex, Position};
pub use parser::{parse, ParseResult};
