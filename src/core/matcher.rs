//! Exclude patterns
//!
//! `--exclude` takes a comma-separated list of regular expressions. Each one
//! is searched (unanchored) in both the root-relative and the absolute path of
//! an entry. A pattern that does not compile is matched as a literal string.

use regex::Regex;

/// A compiled exclude pattern plus the text it came from
#[derive(Debug, Clone)]
pub struct ExcludeRule {
    source: String,
    regex: Regex,
    literal: bool,
}

impl ExcludeRule {
    /// Compile a single pattern, degrading to an escaped literal on error.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let (regex, literal) = match Regex::new(pattern) {
            Ok(regex) => (regex, false),
            Err(e) => {
                tracing::debug!(pattern, error = %e, "invalid regex, matching as literal");
                (Regex::new(&regex::escape(pattern))?, true)
            }
        };
        Ok(Self {
            source: pattern.to_string(),
            regex,
            literal,
        })
    }

    /// The pattern as the user wrote it (after trimming)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the pattern fell back to literal matching
    pub fn is_literal(&self) -> bool {
        self.literal
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// Compile a comma-separated list of exclude patterns.
///
/// Entries are trimmed and empty ones dropped; `None` yields no rules.
pub fn compile(patterns: Option<&str>) -> Vec<ExcludeRule> {
    let Some(patterns) = patterns else {
        return Vec::new();
    };
    patterns
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter_map(|p| match ExcludeRule::new(p) {
            Ok(rule) => {
                tracing::debug!(
                    pattern = rule.source(),
                    literal = rule.is_literal(),
                    "exclude rule"
                );
                Some(rule)
            }
            Err(e) => {
                tracing::warn!(pattern = p, error = %e, "ignoring exclude pattern");
                None
            }
        })
        .collect()
}

/// True when any rule matches any of the candidate strings
pub fn matches_any(candidates: &[&str], rules: &[ExcludeRule]) -> bool {
    rules
        .iter()
        .any(|rule| candidates.iter().any(|c| rule.is_match(c)))
}
