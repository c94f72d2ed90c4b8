//! CLI module - Command-line interface definitions and handler

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::core::error::PackError;
use crate::core::file_reader::BomPolicy;
use crate::core::render::ListFormat;
use crate::flows::pack::{run_pack, PackOptions};
use crate::logging::LogOptions;

/// ctxpack - pack a folder's text files into one fenced Markdown document.
#[derive(Parser, Debug)]
#[command(name = "ctxpack")]
#[command(
    author,
    version,
    about,
    long_about = r#"ctxpack walks a folder, keeps its text files and writes them into a single
document. Each file gets a header with its absolute path followed by a fenced
copy of its content, tagged with a language when the extension is known.

Files are visited depth-first in case-insensitive name order, so the same tree
always produces the same document. Binary files are left out.

Exit codes:
  0  success (or --help/--version)
  1  missing --input or invalid arguments
  2  input path does not exist
  3  input path is not a directory
  4  no eligible files found
  5  the output document could not be written

Examples:
    ctxpack --input src
    ctxpack --input . --exclude "target,\.git,node_modules" --output ctx.md
    ctxpack --input . --max-depth 1 --dry-run
"#
)]
pub struct Cli {
    /// Folder to pack.
    #[arg(
        long,
        value_name = "FOLDER",
        long_help = "Folder to pack (required).\n\n\
Symlinks inside it are resolved against its canonical path."
    )]
    pub input: Option<PathBuf>,

    /// Comma-separated exclude patterns (regular expressions).
    #[arg(
        long,
        value_name = "PATTERNS",
        env = "CTXPACK_EXCLUDE",
        long_help = "Comma-separated list of exclude patterns.\n\n\
Each pattern is a regular expression searched anywhere in both the root-relative\n\
path (with '/' separators) and the absolute path of every entry. A matching\n\
directory is skipped with everything below it. Patterns that are not valid\n\
regular expressions are matched literally.\n\n\
Example: --exclude \"target,\\.lock$,node_modules\""
    )]
    pub exclude: Option<String>,

    /// Destination of the assembled document.
    #[arg(
        long,
        value_name = "FILE",
        default_value = "context.md",
        env = "CTXPACK_OUTPUT",
        long_help = "Destination of the assembled document (defaults to context.md).\n\n\
When the file lies inside the input folder it is never packed into itself."
    )]
    pub output: PathBuf,

    /// List the files that would be packed without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum number of nested directory levels below the input.
    #[arg(
        long,
        value_name = "N",
        long_help = "Maximum number of nested directory levels below the input folder.\n\n\
0 packs only the files directly inside it. If omitted, all depths are walked."
    )]
    pub max_depth: Option<usize>,

    /// Follow symbolic links that stay inside the input folder.
    #[arg(
        long,
        long_help = "Follow symbolic links. Links to directories are only walked when their\n\
target stays inside the input folder and does not loop back to an ancestor.\n\n\
By default symbolic links are skipped."
    )]
    pub follow_symlinks: bool,

    /// Remove a leading byte-order mark from file content.
    #[arg(
        long,
        long_help = "Remove a detected byte-order mark before embedding a file.\n\n\
By default file content is embedded verbatim."
    )]
    pub strip_bom: bool,

    /// Format of the --dry-run listing (text/jsonl/json).
    #[arg(
        long,
        default_value = "text",
        value_parser = ["text", "jsonl", "json"],
        value_name = "FORMAT",
        long_help = "Format of the --dry-run listing.\n\n\
Supported values:\n\
- text (default): one relative path per line\n\
- jsonl: one JSON object per file\n\
- json: a single JSON array"
    )]
    pub list_format: String,

    /// Quiet mode (errors only).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (report every skipped entry).
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            verbose: self.verbose,
            quiet: self.quiet,
            no_color: self.no_color,
        }
    }

    /// Turn the parsed flags into validated pack options
    pub fn pack_options(&self) -> Result<PackOptions, PackError> {
        let input = self.input.clone().ok_or(PackError::MissingInput)?;
        Ok(PackOptions {
            exclude: self.exclude.clone(),
            output: self.output.clone(),
            dry_run: self.dry_run,
            max_depth: self.max_depth,
            follow_symlinks: self.follow_symlinks,
            bom_policy: if self.strip_bom {
                BomPolicy::Strip
            } else {
                BomPolicy::Preserve
            },
            ..PackOptions::new(input)
        })
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let opts = cli.pack_options()?;
    let list_format: ListFormat = cli.list_format.parse().unwrap_or_default();
    run_pack(opts, list_format, cli.quiet)
}
