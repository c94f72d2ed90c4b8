//! Renderer for the dry-run file listing
//!
//! Renders the walked file list as text, jsonl or json.

use crate::core::model::FileReference;
use std::io::Write;

/// Listing format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFormat {
    #[default]
    Text,
    Jsonl,
    Json,
}

impl std::str::FromStr for ListFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ListFormat::Text),
            "jsonl" => Ok(ListFormat::Jsonl),
            "json" => Ok(ListFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Renderer for file listings
pub struct Renderer {
    format: ListFormat,
}

impl Renderer {
    pub fn new(format: ListFormat) -> Self {
        Self { format }
    }

    /// Render a listing to a string (no trailing newline)
    pub fn render(&self, files: &[FileReference]) -> String {
        match self.format {
            ListFormat::Text => Self::render_text(files),
            ListFormat::Jsonl => Self::render_jsonl(files),
            ListFormat::Json => Self::render_json(files),
        }
    }

    /// Render to a writer, one trailing newline included
    pub fn render_to<W: Write>(
        &self,
        files: &[FileReference],
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(files);
        writeln!(writer, "{}", output)
    }

    /// One root-relative path per line
    fn render_text(files: &[FileReference]) -> String {
        files
            .iter()
            .map(|f| f.relative.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(files: &[FileReference]) -> String {
        files
            .iter()
            .filter_map(|f| serde_json::to_string(f).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render as a single JSON array
    fn render_json(files: &[FileReference]) -> String {
        serde_json::to_string_pretty(files).unwrap_or_else(|_| "[]".to_string())
    }
}
