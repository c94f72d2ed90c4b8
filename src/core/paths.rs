//! Path normalization utilities
//!
//! Relative paths are always rendered with '/' as separator so that exclude
//! patterns and listings behave the same on every platform.

use std::path::{Component, Path};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
///
/// Returns `None` when `path` is not under `root` or when the remainder would
/// contain a `..` segment.
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    let rest = path.strip_prefix(root).ok()?;
    if rest
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return None;
    }
    Some(normalize_path(rest))
}

/// Whether `path` lies inside `root` (or is `root` itself).
///
/// Both paths are expected to be canonical. Containment is decided per path
/// component, so `/data2` is not inside `/data`.
pub fn is_within_root(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        let path = Path::new("src/main.rs");
        assert_eq!(normalize_path(path), "src/main.rs");
    }

    #[test]
    fn test_normalize_path_nested() {
        let path = Path::new("a/b/c/d.rs");
        assert_eq!(normalize_path(path), "a/b/c/d.rs");
    }

    #[test]
    fn test_make_relative() {
        let root = Path::new("/project");
        let path = Path::new("/project/src/main.rs");
        assert_eq!(make_relative(path, root), Some("src/main.rs".to_string()));
    }

    #[test]
    fn test_make_relative_not_under_root() {
        let root = Path::new("/project");
        let path = Path::new("/other/file.rs");
        assert_eq!(make_relative(path, root), None);
    }

    #[test]
    fn test_make_relative_same_as_root() {
        let root = Path::new("/project");
        assert_eq!(make_relative(root, root), Some("".to_string()));
    }

    #[test]
    fn test_make_relative_rejects_parent_segments() {
        let root = Path::new("/project");
        let path = Path::new("/project/../etc/passwd");
        assert_eq!(make_relative(path, root), None);
    }

    #[test]
    fn test_is_within_root() {
        assert!(is_within_root(Path::new("/data/sub/x"), Path::new("/data")));
        assert!(is_within_root(Path::new("/data"), Path::new("/data")));
    }

    #[test]
    fn test_is_within_root_sibling_with_shared_prefix() {
        assert!(!is_within_root(Path::new("/data2/x"), Path::new("/data")));
        assert!(!is_within_root(Path::new("/dat"), Path::new("/data")));
    }

    #[test]
    fn test_is_within_root_real_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let subdir = root.join("subdir");
        std::fs::create_dir(&subdir).unwrap();

        assert!(is_within_root(&subdir.canonicalize().unwrap(), &root));

        let other = tempfile::tempdir().unwrap();
        assert!(!is_within_root(&other.path().canonicalize().unwrap(), &root));
    }
}
