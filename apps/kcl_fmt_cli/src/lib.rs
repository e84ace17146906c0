//! KCL formatter CLI (`kcl-fmt`)
//!
//! Command-line tool that formats a KCL source file and renders the
//! result as colorized terminal text, a standalone syntax-highlighted
//! HTML page, or plain text written to a file.
//!
//! # Commands
//!
//! | Invocation | Description |
//! |------------|-------------|
//! | `kcl-fmt <file>` | Format a file, print colorized to stdout |
//! | `kcl-fmt --html` | Render as a standalone HTML page |
//! | `kcl-fmt -o <path>` | Write the formatted result to a file |
//! | `kcl-fmt` (no file) | Read source from stdin |
//!
//! # Module Structure
//!
//! - [`cli`] - argument parsing and dispatch
//! - [`pipeline`] - parses and formats a source string, surfacing parse
//!   errors as a single message
//! - [`highlight`] - renders a formatted document as ANSI or HTML
//!
//! # Exit Codes
//!
//! `0` on success, `1` on an I/O or parse error.

pub mod cli;
pub mod highlight;
pub mod pipeline;

/// Entry point for the CLI. See [`cli::run_cli`] for details.
pub use cli::run_cli;
