//! Directory traversal
//!
//! Depth-first, pre-order walk that emits files in case-insensitive name order
//! at every level. Pending directories live on an explicit stack of cursors,
//! so deep trees cannot overflow the call stack while the emission order stays
//! that of the recursive description.

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::matcher::matches_any;
use crate::core::model::{Diagnostic, DiagnosticCode, FileReference, TraversalContext};
use crate::core::paths::{is_within_root, make_relative, normalize_path};

/// Files found by a walk, in emission order, plus recoverable problems
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub files: Vec<FileReference>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A directory whose entries are being visited
struct Cursor {
    entries: std::vec::IntoIter<DirEntry>,
    depth: usize,
    /// Canonical paths of this directory and all of its ancestors
    lineage: Vec<PathBuf>,
}

/// Directory ordering: lower-cased name first, raw name as tie-breaker
pub fn compare_names(a: &OsStr, b: &OsStr) -> Ordering {
    let a = a.to_string_lossy();
    let b = b.to_string_lossy();
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(&b))
}

/// Read the immediate entries of `dir`, sorted
fn list_dir(dir: &Path) -> Result<Vec<DirEntry>, walkdir::Error> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by(|a, b| compare_names(a.file_name(), b.file_name()))
        .into_iter()
        .collect()
}

/// Walk `ctx.root` and collect every eligible file.
pub fn walk(ctx: &TraversalContext) -> WalkOutcome {
    let mut walker = Walker {
        ctx,
        outcome: WalkOutcome::default(),
        stack: Vec::new(),
    };
    walker.enter(ctx.root.clone(), 0, vec![ctx.root.clone()]);
    walker.run();
    walker.outcome
}

struct Walker<'a> {
    ctx: &'a TraversalContext,
    outcome: WalkOutcome,
    stack: Vec<Cursor>,
}

impl Walker<'_> {
    /// Push a cursor for `dir` unless it lies beyond the depth limit.
    fn enter(&mut self, dir: PathBuf, depth: usize, lineage: Vec<PathBuf>) {
        if self.ctx.max_depth.is_some_and(|max| depth > max) {
            return;
        }

        let entries = match list_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.outcome.diagnostics.push(Diagnostic::warn(
                    DiagnosticCode::DirUnreadable,
                    &dir,
                    format!("cannot read directory: {}", e),
                ));
                Vec::new()
            }
        };

        self.stack.push(Cursor {
            entries: entries.into_iter(),
            depth,
            lineage,
        });
    }

    fn run(&mut self) {
        while let Some(cursor) = self.stack.last_mut() {
            let Some(entry) = cursor.entries.next() else {
                self.stack.pop();
                continue;
            };
            let depth = cursor.depth;
            let lineage = cursor.lineage.clone();
            self.visit(entry, depth, lineage);
        }
    }

    fn visit(&mut self, entry: DirEntry, depth: usize, lineage: Vec<PathBuf>) {
        let path = entry.path();
        let Some(relative) = make_relative(path, &self.ctx.root) else {
            return;
        };
        let absolute = normalize_path(path);
        if matches_any(&[relative.as_str(), absolute.as_str()], &self.ctx.rules) {
            tracing::debug!(path = %relative, "excluded");
            return;
        }

        let file_type = entry.file_type();
        if file_type.is_dir() {
            let mut lineage = lineage;
            let parent_real = lineage.last().cloned().unwrap_or_default();
            lineage.push(parent_real.join(entry.file_name()));
            self.enter(path.to_path_buf(), depth + 1, lineage);
        } else if file_type.is_file() {
            self.emit(path, relative);
        } else if file_type.is_symlink() && self.ctx.follow_symlinks {
            self.follow(path, relative, depth, lineage);
        }
    }

    fn follow(&mut self, link: &Path, relative: String, depth: usize, lineage: Vec<PathBuf>) {
        let target = match fs::metadata(link) {
            Ok(meta) => meta,
            Err(e) => {
                self.outcome.diagnostics.push(Diagnostic::warn(
                    DiagnosticCode::SymlinkBroken,
                    link,
                    format!("cannot stat symlink target: {}", e),
                ));
                return;
            }
        };

        if target.is_file() {
            self.emit(link, relative);
            return;
        }
        if !target.is_dir() {
            return;
        }

        let real = match fs::canonicalize(link) {
            Ok(real) => real,
            Err(e) => {
                self.outcome.diagnostics.push(Diagnostic::warn(
                    DiagnosticCode::SymlinkBroken,
                    link,
                    format!("cannot resolve symlink: {}", e),
                ));
                return;
            }
        };
        if !is_within_root(&real, &self.ctx.root) {
            self.outcome.diagnostics.push(Diagnostic::warn(
                DiagnosticCode::SymlinkOutsideRoot,
                link,
                format!("symlink points outside the root: {}", real.display()),
            ));
            return;
        }
        if lineage.contains(&real) {
            self.outcome.diagnostics.push(Diagnostic::warn(
                DiagnosticCode::SymlinkCycle,
                link,
                format!("symlink loops back to {}", real.display()),
            ));
            return;
        }

        let mut lineage = lineage;
        lineage.push(real);
        self.enter(link.to_path_buf(), depth + 1, lineage);
    }

    fn emit(&mut self, path: &Path, relative: String) {
        if self.ctx.skip_paths.iter().any(|skip| skip == path) {
            tracing::debug!(path = %relative, "skipping output document");
            return;
        }
        self.outcome
            .files
            .push(FileReference::new(path.to_path_buf(), relative));
    }
}
