//! Document assembly
//!
//! Renders each walked file as a header block followed by a fenced copy of
//! its content. Files that cannot be read or look binary are left out.

use crate::core::file_reader::{read_file_with_config, FileReadConfig};
use crate::core::model::{Diagnostic, FileReference};

/// Width of the `=` rule around each `FILE:` header
pub const SEPARATOR_WIDTH: usize = 48;

const MIN_FENCE: usize = 3;

/// The assembled document and what went into it
#[derive(Debug, Default)]
pub struct Assembly {
    pub document: String,
    /// Files that made it into the document, in document order
    pub included: Vec<FileReference>,
    /// Included files that carried a byte-order mark
    pub boms: usize,
    /// Included files whose invalid UTF-8 was replaced
    pub lossy: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Assembly {
    pub fn skipped(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.code.is_skip())
            .count()
    }
}

/// Length of the longest run of consecutive backticks in `content`
pub fn longest_backtick_run(content: &str) -> usize {
    content
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0)
}

/// A backtick fence one longer than any run inside `content` (at least three)
pub fn fence_for(content: &str) -> String {
    "`".repeat((longest_backtick_run(content) + 1).max(MIN_FENCE))
}

/// Append one file block to `out`
pub fn render_block(out: &mut String, file: &FileReference, content: &str, language: &str) {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    let fence = fence_for(content);

    out.push_str("\n\n");
    out.push_str(&separator);
    out.push('\n');
    out.push_str("FILE: ");
    out.push_str(&file.absolute.display().to_string());
    out.push('\n');
    out.push_str(&separator);
    out.push_str("\n\n");

    out.push_str(&fence);
    out.push_str(language);
    out.push('\n');
    out.push_str(content);
    out.push('\n');
    out.push_str(&fence);
    out.push_str("\n\n");
}

/// Read every file in order and build the document.
pub fn build(files: &[FileReference], config: &FileReadConfig) -> Assembly {
    let mut assembly = Assembly::default();

    for file in files {
        let read = read_file_with_config(&file.absolute, config);
        assembly.diagnostics.extend(read.diagnostics);

        let Some(content) = read.content else {
            continue;
        };
        if read.bom.is_some() {
            assembly.boms += 1;
        }
        if read.lossy_conversion {
            assembly.lossy += 1;
        }
        render_block(&mut assembly.document, file, &content, &read.language);
        assembly.included.push(file.clone());
    }

    assembly
}
