//! Command-line interface for the KCL formatter.
//!
//! This module provides the argument parsing and dispatch logic for the
//! `kcl-fmt` binary. It reads a source file (or stdin), formats it, and
//! writes the result as colorized terminal text, a standalone HTML page,
//! or plain text to a file.
//!
//! # Examples
//!
//! ```bash
//! kcl-fmt part.k                # colorized to stdout
//! kcl-fmt part.k --html -o out.html
//! cat part.k | kcl-fmt          # reads stdin
//! ```

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::highlight;
use crate::pipeline;

/// Command-line interface for the KCL formatter.
#[derive(Parser)]
#[command(name = "kcl-fmt")]
#[command(about = "Formats KCL source files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a KCL source file. Reads from stdin when omitted.
    pub file: Option<PathBuf>,

    /// Render as a standalone syntax-highlighted HTML page.
    #[arg(long)]
    pub html: bool,

    /// Write the result to this path instead of stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

/// Parses arguments and runs the formatter, returning the process exit
/// code: `0` on success, `1` on an I/O or parse error.
pub fn run_cli() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let source = read_source(cli.file.as_deref())?;
    let formatted = pipeline::format_source(&source)?;

    let rendered = if cli.html {
        highlight::render_html(&formatted.text, &formatted.tokens)
    } else if cli.output.is_some() {
        formatted.text.clone()
    } else {
        highlight::render_ansi(&formatted.text, &formatted.tokens)
    };

    match cli.output {
        Some(path) => std::fs::write(&path, rendered)
            .map_err(|e| format!("error: failed to write '{}': {e}", path.display()))?,
        None => {
            print!("{rendered}");
            io::stdout().flush().map_err(|e| format!("error: {e}"))?;
        }
    }
    Ok(())
}

fn read_source(file: Option<&std::path::Path>) -> Result<String, String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("error: failed to read '{}': {e}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(|e| format!("error: {e}"))?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn formats_a_file_and_writes_plain_text_output() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        write!(input, "let   x=1\n").unwrap();
        let output = tempfile::NamedTempFile::new().unwrap();

        let cli = Cli { file: Some(input.path().to_path_buf()), html: false, output: Some(output.path().to_path_buf()) };
        assert!(run(cli).is_ok());

        let written = std::fs::read_to_string(output.path()).unwrap();
        assert!(written.contains("let x = 1"));
    }

    #[test]
    fn reports_an_error_for_a_missing_file() {
        let cli = Cli { file: Some(PathBuf::from("/nonexistent/path/does-not-exist.k")), html: false, output: None };
        assert!(run(cli).is_err());
    }

    #[test]
    fn html_mode_ignores_stdout_output_flag_and_still_wraps_in_html() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        write!(input, "let x = 1\n").unwrap();
        let output = tempfile::NamedTempFile::new().unwrap();

        let cli = Cli { file: Some(input.path().to_path_buf()), html: true, output: Some(output.path().to_path_buf()) };
        assert!(run(cli).is_ok());

        let written = std::fs::read_to_string(output.path()).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
