//! Lexical path normalization.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `base` when relative, then collapse `.` and `..`
/// components without touching the filesystem.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Normalizes a path by resolving "." and ".." components without requiring
/// the path to exist. A ".." at the root stays at the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.components()
        .fold(PathBuf::new(), |mut acc, component| match component {
            Component::CurDir => acc,
            Component::ParentDir => {
                acc.pop();
                acc
            }
            _ => {
                acc.push(component);
                acc
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_dots() {
        assert_eq!(
            normalize_path(Path::new("/home/user/./project/../other")),
            PathBuf::from("/home/user/other")
        );
    }

    #[test]
    fn test_normalize_stops_at_root() {
        assert_eq!(normalize_path(Path::new("/../../etc")), PathBuf::from("/etc"));
    }

    #[test]
    fn test_resolve_relative_against_base() {
        assert_eq!(
            resolve_against(Path::new("/home/user/project"), Path::new("../../etc")),
            PathBuf::from("/home/etc")
        );
        assert_eq!(
            resolve_against(Path::new("/home/user/project"), Path::new("/var/tmp")),
            PathBuf::from("/var/tmp")
        );
    }
}
