#![cfg_attr(docsrs, feature(doc_cfg))]

//! # kcl-base
//!
//! Pure structural atoms shared across the KCL tooling crates.
//!
//! This crate provides the foundational types used throughout the front-end
//! pipeline:
//!
//! - [`Interner`]/[`Symbol`] — string interning for O(1) equality
//! - [`Span`] — source location tracking in byte offsets
//! - [`SpannedError`]/[`Result`] — errors with source positions
//! - [`CancellationToken`] — cooperative cancellation for long-running passes
//!
//! # Design Principles
//!
//! This crate has **no knowledge of KCL grammar or I/O**. It provides only
//! generic, reusable infrastructure that the lexer, parser, lint engine and
//! formatter build upon.
//!
//! # Example
//!
//! ```
//! use kcl_base::{Interner, Span};
//!
//! let mut interner = Interner::new();
//! let hello = interner.intern("hello");
//! let span = Span::new(0, 5);
//!
//! assert_eq!(interner.resolve(hello), "hello");
//! assert_eq!(span.len(), 5);
//! ```

pub mod intern;
pub mod span;
pub mod error;
pub mod cancel;

pub use intern::{Interner, Symbol, SymbolEq};
pub use span::Span;
pub use error::{SpannedError, Result};
pub use cancel::CancellationToken;
