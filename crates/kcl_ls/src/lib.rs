#![cfg_attr(docsrs, feature(doc_cfg))]

//! # kcl-ls
//!
//! Language server for KCL, built directly on top of [`kcl_syntax`]'s
//! front-end pipeline. Every request handler is a thin translation between
//! `tower-lsp`'s wire types and a [`kcl_syntax::ParseResult`]: the lexer,
//! parser, lint engine and formatter do all the real work.
//!
//! ## Modules
//!
//! - [`server`] - the `tower-lsp` `LanguageServer` implementation
//! - [`state`] - the document table shared across requests
//! - [`document`] - per-document parse state, rebuilt on every edit
//! - [`diagnostics`] - converts parse/lint diagnostics to LSP diagnostics
//! - [`semantic_tokens`] - delta-encoded syntax highlighting
//! - [`hover`] - a thin, stdlib-catalog-free hover (binding/param info only)
//! - [`formatting`] - whole-document formatting as a single `TextEdit`
//!
//! Document edits are full-text (`TextDocumentSyncKind::FULL`): every
//! `did_change` re-lexes and re-parses the entire document rather than
//! patching a range, matching the document manager's full-reparse contract.

pub mod document;
pub mod diagnostics;
pub mod formatting;
pub mod hover;
pub mod semantic_tokens;
pub mod server;
pub mod state;
