//! Data model shared by the walker, the classifier and the assembler
//!
//! Everything here is plain data: produced once per run, never cached.

use serde::Serialize;
use std::path::PathBuf;

use crate::core::matcher::ExcludeRule;

/// A file selected by the walker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReference {
    /// Absolute path under the resolved root
    pub absolute: PathBuf,

    /// Path relative to the root, using '/' as separator
    pub relative: String,
}

impl FileReference {
    pub fn new(absolute: impl Into<PathBuf>, relative: impl Into<String>) -> Self {
        Self {
            absolute: absolute.into(),
            relative: relative.into(),
        }
    }
}

/// Read-only configuration threaded through every step of a walk
#[derive(Debug, Clone)]
pub struct TraversalContext {
    /// Canonical root directory
    pub root: PathBuf,

    /// Maximum nested directory levels below the root (`None` = unbounded)
    pub max_depth: Option<usize>,

    pub follow_symlinks: bool,

    pub rules: Vec<ExcludeRule>,

    /// Absolute paths that are never emitted (e.g. the output document itself)
    pub skip_paths: Vec<PathBuf>,
}

impl TraversalContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_depth: None,
            follow_symlinks: false,
            rules: Vec::new(),
            skip_paths: Vec::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn with_rules(mut self, rules: Vec<ExcludeRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_skip_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip_paths.push(path.into());
        self
    }
}

/// Encoding announced by a byte-order mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomKind {
    Utf8,
    Utf16Be,
    Utf16Le,
    Utf32Be,
    Utf32Le,
}

impl BomKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BomKind::Utf8 => "utf-8",
            BomKind::Utf16Be => "utf-16be",
            BomKind::Utf16Le => "utf-16le",
            BomKind::Utf32Be => "utf-32be",
            BomKind::Utf32Le => "utf-32le",
        }
    }
}

/// A detected byte-order mark and how many leading bytes it occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bom {
    pub kind: BomKind,
    pub len: usize,
}

/// Outcome of classifying one file's bytes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassificationResult {
    pub is_binary: bool,
    pub bom: Option<Bom>,
    /// Fence language tag; empty when the extension is unmapped
    pub language: String,
}

/// Codes for recoverable problems met during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCode {
    DirUnreadable,
    SymlinkBroken,
    SymlinkOutsideRoot,
    SymlinkCycle,
    FileUnreadable,
    BinaryFile,
    LossyConversion,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::DirUnreadable => "DIR_UNREADABLE",
            DiagnosticCode::SymlinkBroken => "SYMLINK_BROKEN",
            DiagnosticCode::SymlinkOutsideRoot => "SYMLINK_OUTSIDE_ROOT",
            DiagnosticCode::SymlinkCycle => "SYMLINK_CYCLE",
            DiagnosticCode::FileUnreadable => "FILE_UNREADABLE",
            DiagnosticCode::BinaryFile => "BINARY_FILE",
            DiagnosticCode::LossyConversion => "LOSSY_CONVERSION",
        }
    }

    /// Whether the diagnostic means a file was left out of the document
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            DiagnosticCode::FileUnreadable | DiagnosticCode::BinaryFile
        )
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured, non-fatal diagnostic
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub path: PathBuf,
}

impl Diagnostic {
    /// Create the diagnostic and emit it as a log event
    pub fn warn(
        code: DiagnosticCode,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        let diagnostic = Self {
            code,
            message: message.into(),
            path: path.into(),
        };
        tracing::warn!(
            code = %diagnostic.code,
            path = %diagnostic.path.display(),
            "{}",
            diagnostic.message
        );
        diagnostic
    }

    /// Like [`Diagnostic::warn`] but logged at debug level (expected skips)
    pub fn debug(
        code: DiagnosticCode,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        let diagnostic = Self {
            code,
            message: message.into(),
            path: path.into(),
        };
        tracing::debug!(
            code = %diagnostic.code,
            path = %diagnostic.path.display(),
            "{}",
            diagnostic.message
        );
        diagnostic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_reference_serializes_relative_path() {
        let file = FileReference::new("/project/src/main.rs", "src/main.rs");
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["relative"], "src/main.rs");
        assert_eq!(json["absolute"], "/project/src/main.rs");
    }

    #[test]
    fn test_traversal_context_defaults() {
        let ctx = TraversalContext::new("/project");
        assert_eq!(ctx.max_depth, None);
        assert!(!ctx.follow_symlinks);
        assert!(ctx.rules.is_empty());
        assert!(ctx.skip_paths.is_empty());
    }

    #[test]
    fn test_diagnostic_code_as_str() {
        assert_eq!(DiagnosticCode::SymlinkCycle.as_str(), "SYMLINK_CYCLE");
        assert_eq!(DiagnosticCode::BinaryFile.to_string(), "BINARY_FILE");
    }

    #[test]
    fn test_bom_kind_as_str() {
        assert_eq!(BomKind::Utf16Le.as_str(), "utf-16le");
        assert_eq!(BomKind::Utf32Be.as_str(), "utf-32be");
    }
}
