//! Pack flow - walk a folder and write its text files as one document
//!
//! Validates the input root, compiles exclude rules, walks the tree and
//! either lists the result (dry run) or assembles and writes the document.

use anyhow::Result;
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::backends::walk::walk;
use crate::core::error::PackError;
use crate::core::file_reader::{BomPolicy, FileReadConfig};
use crate::core::matcher::compile;
use crate::core::model::{Diagnostic, DiagnosticCode, FileReference, TraversalContext};
use crate::core::render::{ListFormat, Renderer};
use crate::flows::assemble::build;

/// Default destination for the assembled document
pub const DEFAULT_OUTPUT: &str = "context.md";

/// Validated options for a pack run
#[derive(Debug, Clone)]
pub struct PackOptions {
    pub input: PathBuf,
    /// Comma-separated exclude patterns
    pub exclude: Option<String>,
    pub output: PathBuf,
    pub dry_run: bool,
    pub max_depth: Option<usize>,
    pub follow_symlinks: bool,
    pub bom_policy: BomPolicy,
}

impl PackOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            exclude: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            dry_run: false,
            max_depth: None,
            follow_symlinks: false,
            bom_policy: BomPolicy::default(),
        }
    }
}

/// What a pack run did
#[derive(Debug, Default)]
pub struct PackReport {
    /// Canonical input root
    pub root: PathBuf,
    /// Files selected by the walk, before binary filtering
    pub files: Vec<FileReference>,
    /// Files rendered into the document (zero on a dry run)
    pub included: usize,
    /// Files dropped while assembling (binary or unreadable)
    pub skipped: usize,
    /// Included files that started with a byte-order mark
    pub boms: usize,
    /// Included files decoded with U+FFFD replacements
    pub lossy: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// Size of the written document in bytes
    pub bytes: usize,
    /// Where the document was written, `None` on a dry run
    pub output: Option<PathBuf>,
}

/// Check that `input` exists and is a directory, and canonicalize it
pub fn resolve_root(input: &Path) -> Result<PathBuf, PackError> {
    let meta = fs::metadata(input).map_err(|_| PackError::InputNotFound(input.to_path_buf()))?;
    if !meta.is_dir() {
        return Err(PackError::InputNotDirectory(input.to_path_buf()));
    }
    fs::canonicalize(input).map_err(|_| PackError::InputNotFound(input.to_path_buf()))
}

/// Build the traversal context for a run
fn traversal_context(root: PathBuf, opts: &PackOptions) -> TraversalContext {
    let mut ctx = TraversalContext::new(root)
        .with_max_depth(opts.max_depth)
        .with_follow_symlinks(opts.follow_symlinks)
        .with_rules(compile(opts.exclude.as_deref()));

    // A previous output inside the tree must not be packed into the next one
    if let Ok(output) = fs::canonicalize(&opts.output) {
        ctx = ctx.with_skip_path(output);
    }
    ctx
}

/// Run the pipeline without printing anything
pub fn pack(opts: &PackOptions) -> Result<PackReport, PackError> {
    let root = resolve_root(&opts.input)?;
    let ctx = traversal_context(root.clone(), opts);

    let walked = walk(&ctx);
    let mut report = PackReport {
        root,
        files: walked.files,
        diagnostics: walked.diagnostics,
        ..Default::default()
    };
    if report.files.is_empty() {
        return Err(PackError::NoEligibleFiles(report.root));
    }
    if opts.dry_run {
        return Ok(report);
    }

    let read_config = FileReadConfig {
        bom_policy: opts.bom_policy,
    };
    let assembly = build(&report.files, &read_config);
    report.skipped = assembly.skipped();
    report.included = assembly.included.len();
    report.boms = assembly.boms;
    report.lossy = assembly.lossy;
    report.diagnostics.extend(assembly.diagnostics);
    if report.included == 0 {
        return Err(PackError::NoEligibleFiles(report.root));
    }

    fs::write(&opts.output, assembly.document.as_bytes()).map_err(|source| {
        PackError::WriteFailed {
            path: opts.output.clone(),
            source,
        }
    })?;
    report.bytes = assembly.document.len();
    report.output = Some(opts.output.clone());

    tracing::info!(
        files = report.included,
        skipped = report.skipped,
        boms = report.boms,
        lossy = report.lossy,
        bytes = report.bytes,
        output = %opts.output.display(),
        "document written"
    );
    Ok(report)
}

/// Run the pack command
pub fn run_pack(opts: PackOptions, list_format: ListFormat, quiet: bool) -> Result<()> {
    let report = pack(&opts)?;

    if opts.dry_run {
        let stdout = std::io::stdout();
        Renderer::new(list_format).render_to(&report.files, stdout.lock())?;
        return Ok(());
    }

    if let (false, Some(output)) = (quiet, &report.output) {
        let warnings = report
            .diagnostics
            .iter()
            .filter(|d| !d.code.is_skip() && d.code != DiagnosticCode::LossyConversion)
            .count();
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{} {} files", "Packed".green().bold(), report.included)?;
        if report.skipped > 0 {
            write!(stdout, " ({} skipped)", report.skipped.to_string().yellow())?;
        }
        write!(stdout, " into {}", output.display().to_string().cyan())?;
        if report.lossy > 0 {
            write!(stdout, ", {} not valid UTF-8", report.lossy.to_string().yellow())?;
        }
        if warnings > 0 {
            write!(stdout, ", {} warnings", warnings.to_string().yellow())?;
        }
        writeln!(stdout)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_file(path: &Path, content: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn sample_tree(root: &Path) {
        write_file(&root.join("a.py"), b"print(1)");
        write_file(&root.join("b.bin"), &[0x00, 0x01, 0x02]);
        write_file(&root.join("sub/c.go"), b"package main");
    }

    #[test]
    fn test_resolve_root_missing() {
        let temp = tempdir().unwrap();
        let err = resolve_root(&temp.path().join("nope")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_resolve_root_not_a_directory() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("file.txt");
        write_file(&file, b"x");
        let err = resolve_root(&file).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_pack_writes_document() {
        let input = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        sample_tree(input.path());

        let mut opts = PackOptions::new(input.path());
        opts.output = out_dir.path().join("context.md");
        let report = pack(&opts).unwrap();

        assert_eq!(report.files.len(), 3);
        assert_eq!(report.included, 2);
        assert_eq!(report.skipped, 1);

        let doc = fs::read_to_string(&opts.output).unwrap();
        assert_eq!(doc.len(), report.bytes);
        let a = doc.find("```python\nprint(1)\n```").unwrap();
        let c = doc.find("```go\npackage main\n```").unwrap();
        assert!(a < c);
        assert!(!doc.contains("b.bin"));
    }

    #[test]
    fn test_pack_exclude_directory() {
        let input = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        sample_tree(input.path());

        let mut opts = PackOptions::new(input.path());
        opts.output = out_dir.path().join("context.md");
        opts.exclude = Some("sub".to_string());
        let report = pack(&opts).unwrap();

        assert_eq!(report.included, 1);
        let doc = fs::read_to_string(&opts.output).unwrap();
        assert!(doc.contains("a.py"));
        assert!(!doc.contains("c.go"));
    }

    #[test]
    fn test_pack_empty_dir_writes_nothing() {
        let input = tempdir().unwrap();
        let out_dir = tempdir().unwrap();

        let mut opts = PackOptions::new(input.path());
        opts.output = out_dir.path().join("context.md");
        let err = pack(&opts).unwrap_err();

        assert_eq!(err.exit_code(), 4);
        assert!(!opts.output.exists());
    }

    #[test]
    fn test_pack_only_binaries_is_empty_result() {
        let input = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        write_file(&input.path().join("blob.bin"), &[0x00, 0xFF]);

        let mut opts = PackOptions::new(input.path());
        opts.output = out_dir.path().join("context.md");
        let err = pack(&opts).unwrap_err();

        assert_eq!(err.exit_code(), 4);
        assert!(!opts.output.exists());
    }

    #[test]
    fn test_pack_dry_run_does_not_write() {
        let input = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        sample_tree(input.path());

        let mut opts = PackOptions::new(input.path());
        opts.output = out_dir.path().join("context.md");
        opts.dry_run = true;
        let report = pack(&opts).unwrap();

        assert_eq!(report.files.len(), 3);
        assert!(report.output.is_none());
        assert!(!opts.output.exists());
    }

    #[test]
    fn test_pack_write_failure() {
        let input = tempdir().unwrap();
        sample_tree(input.path());

        let mut opts = PackOptions::new(input.path());
        opts.output = input.path().join("missing-dir").join("context.md");
        let err = pack(&opts).unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_pack_is_reproducible() {
        let input = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        sample_tree(input.path());
        write_file(&input.path().join("Z/deep/x.rs"), b"fn x() {}");
        write_file(&input.path().join("m.md"), b"```\ncode\n```");

        let mut opts = PackOptions::new(input.path());
        opts.output = out_dir.path().join("one.md");
        pack(&opts).unwrap();
        let first = fs::read(&opts.output).unwrap();

        opts.output = out_dir.path().join("two.md");
        pack(&opts).unwrap();
        let second = fs::read(&opts.output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_pack_reports_boms_and_lossy_files() {
        let input = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        write_file(&input.path().join("bom.md"), b"\xEF\xBB\xBF# Title");
        write_file(&input.path().join("latin1.txt"), b"caf\xE9 au lait, plain enough text");

        let mut opts = PackOptions::new(input.path());
        opts.output = out_dir.path().join("context.md");
        let report = pack(&opts).unwrap();

        assert_eq!(report.included, 2);
        assert_eq!(report.boms, 1);
        assert_eq!(report.lossy, 1);
    }

    #[test]
    fn test_pack_skips_previous_output_inside_tree() {
        let input = tempdir().unwrap();
        sample_tree(input.path());

        let mut opts = PackOptions::new(input.path());
        opts.output = input.path().join("context.md");
        let first = pack(&opts).unwrap();
        let second = pack(&opts).unwrap();

        assert_eq!(first.included, second.included);
        assert!(second.files.iter().all(|f| f.relative != "context.md"));
    }
}
