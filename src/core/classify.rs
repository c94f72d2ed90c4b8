//! Content classification
//!
//! Decides whether a buffer is binary, detects a leading byte-order mark and
//! maps file extensions to fence language tags.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

use crate::core::model::{Bom, BomKind, ClassificationResult};

/// Bytes inspected by the statistical binary heuristic
pub const SNIFF_LEN: usize = 8192;

/// Share of suspicious bytes (in percent) above which a sample is binary
const SUSPICIOUS_PERCENT: usize = 10;

/// Leading signatures of common binary formats
const BINARY_SIGNATURES: &[&[u8]] = &[
    b"\x89PNG\r\n\x1a\n",
    b"\xFF\xD8\xFF",
    b"GIF87a",
    b"GIF89a",
    b"%PDF-",
    b"PK\x03\x04",
    b"\x1F\x8B",
    b"\x7FELF",
    b"7z\xBC\xAF\x27\x1C",
    b"BZh",
    b"\xCA\xFE\xBA\xBE",
];

/// Classify a file's bytes. `path` is only used for the language tag.
pub fn classify(bytes: &[u8], path: &Path) -> ClassificationResult {
    ClassificationResult {
        is_binary: is_binary(bytes),
        bom: detect_bom(bytes),
        language: language_for(path).to_string(),
    }
}

/// NUL anywhere, or a binary-looking prefix, marks the buffer as binary.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.contains(&0) || looks_binary(&bytes[..bytes.len().min(SNIFF_LEN)])
}

/// Statistical sniffing over a sample: known magic numbers, or too many
/// control characters and invalid UTF-8 sequences.
fn looks_binary(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    if BINARY_SIGNATURES.iter().any(|sig| sample.starts_with(sig)) {
        return true;
    }

    let mut suspicious = 0usize;
    let mut chunks = sample.utf8_chunks().peekable();
    while let Some(chunk) = chunks.next() {
        suspicious += chunk
            .valid()
            .bytes()
            .filter(|&b| is_suspicious_control(b))
            .count();
        // A multi-byte sequence cut off by the sample boundary is not evidence.
        let cut_at_end = chunks.peek().is_none() && sample.len() == SNIFF_LEN;
        if !cut_at_end {
            suspicious += chunk.invalid().len();
        }
    }

    suspicious * 100 > sample.len() * SUSPICIOUS_PERCENT
}

fn is_suspicious_control(b: u8) -> bool {
    // tab, LF, FF, CR, ESC and backspace show up in real text files
    (b < 0x20 && !matches!(b, b'\t' | b'\n' | 0x0C | b'\r' | 0x1B | 0x08)) || b == 0x7F
}

/// Detect a leading byte-order mark
pub fn detect_bom(bytes: &[u8]) -> Option<Bom> {
    let (kind, len) = match bytes {
        [0xFF, 0xFE, 0x00, 0x00, ..] => (BomKind::Utf32Le, 4),
        [0x00, 0x00, 0xFE, 0xFF, ..] => (BomKind::Utf32Be, 4),
        [0xEF, 0xBB, 0xBF, ..] => (BomKind::Utf8, 3),
        [0xFE, 0xFF, ..] => (BomKind::Utf16Be, 2),
        [0xFF, 0xFE, ..] => (BomKind::Utf16Le, 2),
        _ => return None,
    };
    Some(Bom { kind, len })
}

static LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (".rs", "rust"),
        (".py", "python"),
        (".pyi", "python"),
        (".pyw", "python"),
        (".go", "go"),
        (".js", "javascript"),
        (".mjs", "javascript"),
        (".cjs", "javascript"),
        (".jsx", "jsx"),
        (".ts", "typescript"),
        (".mts", "typescript"),
        (".cts", "typescript"),
        (".tsx", "tsx"),
        (".java", "java"),
        (".kt", "kotlin"),
        (".kts", "kotlin"),
        (".scala", "scala"),
        (".groovy", "groovy"),
        (".gradle", "groovy"),
        (".c", "c"),
        (".h", "c"),
        (".cc", "cpp"),
        (".cpp", "cpp"),
        (".cxx", "cpp"),
        (".hpp", "cpp"),
        (".hh", "cpp"),
        (".hxx", "cpp"),
        (".cs", "csharp"),
        (".fs", "fsharp"),
        (".vb", "vbnet"),
        (".swift", "swift"),
        (".m", "objectivec"),
        (".mm", "objectivec"),
        (".rb", "ruby"),
        (".php", "php"),
        (".pl", "perl"),
        (".pm", "perl"),
        (".lua", "lua"),
        (".r", "r"),
        (".jl", "julia"),
        (".dart", "dart"),
        (".ex", "elixir"),
        (".exs", "elixir"),
        (".erl", "erlang"),
        (".hrl", "erlang"),
        (".hs", "haskell"),
        (".ml", "ocaml"),
        (".mli", "ocaml"),
        (".clj", "clojure"),
        (".cljs", "clojure"),
        (".elm", "elm"),
        (".zig", "zig"),
        (".nim", "nim"),
        (".v", "verilog"),
        (".sv", "systemverilog"),
        (".vhd", "vhdl"),
        (".sh", "bash"),
        (".bash", "bash"),
        (".zsh", "zsh"),
        (".fish", "fish"),
        (".ps1", "powershell"),
        (".bat", "batch"),
        (".cmd", "batch"),
        (".sql", "sql"),
        (".html", "html"),
        (".htm", "html"),
        (".xml", "xml"),
        (".svg", "xml"),
        (".css", "css"),
        (".scss", "scss"),
        (".sass", "sass"),
        (".less", "less"),
        (".vue", "vue"),
        (".svelte", "svelte"),
        (".json", "json"),
        (".jsonc", "jsonc"),
        (".yaml", "yaml"),
        (".yml", "yaml"),
        (".toml", "toml"),
        (".ini", "ini"),
        (".cfg", "ini"),
        (".conf", "ini"),
        (".md", "markdown"),
        (".markdown", "markdown"),
        (".rst", "rst"),
        (".tex", "latex"),
        (".graphql", "graphql"),
        (".gql", "graphql"),
        (".proto", "protobuf"),
        (".tf", "hcl"),
        (".hcl", "hcl"),
        (".dockerfile", "dockerfile"),
        (".mk", "makefile"),
        (".cmake", "cmake"),
        (".diff", "diff"),
        (".patch", "diff"),
        (".csv", "csv"),
        (".txt", "text"),
    ])
});

/// Fence language tag for a path; empty when the extension is unmapped.
pub fn language_for(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            let key = format!(".{}", ext.to_lowercase());
            LANGUAGES.get(key.as_str()).copied()
        })
        .unwrap_or("")
}
