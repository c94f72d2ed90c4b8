//! Reading candidate files for the document
//!
//! Provides consistent handling for:
//! - Unreadable files
//! - Binary files
//! - Non-UTF-8 content
//! - Byte-order marks

use std::fs;
use std::path::Path;

use crate::core::classify::classify;
use crate::core::model::{Bom, Diagnostic, DiagnosticCode};

/// What to do with a detected byte-order mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BomPolicy {
    /// Embed the file bytes verbatim, BOM included
    #[default]
    Preserve,
    /// Drop the BOM bytes before decoding
    Strip,
}

/// Configuration for file reading
#[derive(Debug, Clone, Copy, Default)]
pub struct FileReadConfig {
    pub bom_policy: BomPolicy,
}

/// Result of reading a file
#[derive(Debug, Clone, Default)]
pub struct FileReadResult {
    /// Decoded text, `None` when the file was skipped
    pub content: Option<String>,

    /// Fence language tag (may be empty)
    pub language: String,

    pub bom: Option<Bom>,

    /// Whether invalid UTF-8 was replaced
    pub lossy_conversion: bool,

    pub diagnostics: Vec<Diagnostic>,
}

impl FileReadResult {
    /// Create a successful read result
    pub fn success(content: String, language: impl Into<String>) -> Self {
        Self {
            content: Some(content),
            language: language.into(),
            ..Default::default()
        }
    }

    /// Create a skipped result
    pub fn skipped(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
            ..Default::default()
        }
    }

    fn with_bom(mut self, bom: Option<Bom>) -> Self {
        self.bom = bom;
        self
    }

    fn with_lossy(mut self, diagnostic: Diagnostic) -> Self {
        self.lossy_conversion = true;
        self.diagnostics.push(diagnostic);
        self
    }
}

/// Read, classify and decode one file.
///
/// Never fails: unreadable and binary files come back skipped with a
/// diagnostic attached.
pub fn read_file_with_config(path: &Path, config: &FileReadConfig) -> FileReadResult {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            return FileReadResult::skipped(Diagnostic::warn(
                DiagnosticCode::FileUnreadable,
                path,
                format!("cannot read file: {}", e),
            ));
        }
    };

    let class = classify(&bytes, path);
    if class.is_binary {
        return FileReadResult::skipped(Diagnostic::debug(
            DiagnosticCode::BinaryFile,
            path,
            "skipping binary file",
        ));
    }

    if let Some(bom) = class.bom {
        tracing::debug!(
            path = %path.display(),
            bom = bom.kind.as_str(),
            "byte-order mark detected"
        );
    }
    let body = match (config.bom_policy, class.bom) {
        (BomPolicy::Strip, Some(bom)) => &bytes[bom.len..],
        _ => &bytes[..],
    };

    match std::str::from_utf8(body) {
        Ok(text) => {
            FileReadResult::success(text.to_string(), class.language).with_bom(class.bom)
        }
        Err(_) => {
            let text = String::from_utf8_lossy(body).into_owned();
            FileReadResult::success(text, class.language)
                .with_bom(class.bom)
                .with_lossy(Diagnostic::debug(
                    DiagnosticCode::LossyConversion,
                    path,
                    "invalid UTF-8 replaced with U+FFFD",
                ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::BomKind;
    use tempfile::TempDir;

    fn read_file_safe(path: &Path) -> FileReadResult {
        read_file_with_config(path, &FileReadConfig::default())
    }

    #[test]
    fn test_read_file_success() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("test.py");
        fs::write(&file_path, "print(1)").unwrap();

        let result = read_file_safe(&file_path);
        assert!(result.content.is_some());
        assert_eq!(result.content, Some("print(1)".to_string()));
        assert_eq!(result.language, "python");
        assert!(!result.lossy_conversion);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_read_file_binary() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("binary.py");
        fs::write(&file_path, [0x00, 0x01, 0x02]).unwrap();

        let result = read_file_safe(&file_path);
        assert!(result.content.is_none());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::BinaryFile);
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_file_safe(Path::new("/nonexistent/file.txt"));
        assert!(result.content.is_none());
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::FileUnreadable);
    }

    #[test]
    fn test_read_file_lossy_conversion() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("latin1.txt");
        let mut bytes = b"caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b" au lait, a long enough line of plain text");
        fs::write(&file_path, &bytes).unwrap();

        let result = read_file_safe(&file_path);
        assert!(result.content.is_some());
        assert!(result.lossy_conversion);
        assert!(result.content.unwrap().starts_with("caf\u{FFFD} au lait"));
    }

    #[test]
    fn test_bom_preserved_by_default() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("bom.md");
        fs::write(&file_path, b"\xEF\xBB\xBF# Title\n").unwrap();

        let result = read_file_safe(&file_path);
        assert_eq!(result.bom.map(|b| b.kind), Some(BomKind::Utf8));
        assert_eq!(result.content, Some("\u{FEFF}# Title\n".to_string()));
    }

    #[test]
    fn test_bom_stripped_on_request() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("bom.md");
        fs::write(&file_path, b"\xEF\xBB\xBF# Title\n").unwrap();

        let config = FileReadConfig {
            bom_policy: BomPolicy::Strip,
        };
        let result = read_file_with_config(&file_path, &config);
        assert_eq!(result.bom.map(|b| b.kind), Some(BomKind::Utf8));
        assert_eq!(result.content, Some("# Title\n".to_string()));
    }

    #[test]
    fn test_bom_policy_default() {
        assert_eq!(BomPolicy::default(), BomPolicy::Preserve);
    }
}
