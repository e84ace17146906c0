//! KCL formatter CLI (`kcl-fmt`) - standalone binary
//!
//! Thin wrapper around [`kcl_fmt_cli::run_cli`]. All command logic lives
//! in the library crate for testability.
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - I/O or parse error

use std::process::ExitCode;

fn main() -> ExitCode {
    kcl_fmt_cli::run_cli()
}
