//! ctxpack - pack a directory tree into a single context document
//!
//! ctxpack provides:
//! - Deterministic, depth-limited, symlink-aware directory traversal
//! - Regex (or literal) exclude patterns
//! - Binary detection and language tagging per file
//! - A Markdown document with collision-free code fences

use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::process::ExitCode;

mod backends;
mod cli;
mod core;
mod flows;
mod logging;

use crate::core::error::{exit_code_for, PackError};

fn main() -> ExitCode {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are reported through clap's error path
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    if let Err(e) = logging::init_logging(cli.log_options()) {
        eprintln!("warning: {:#}", e);
    }

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            if matches!(err.downcast_ref::<PackError>(), Some(PackError::MissingInput)) {
                eprintln!("\n{}", cli::Cli::command().render_usage());
            }
            ExitCode::from(exit_code_for(&err) as u8)
        }
    }
}
