//! Path containment for externally supplied paths.
//!
//! [`PathValidator`] accepts a candidate path only if it resolves to a
//! location inside one of its authorized base paths. Every other component
//! that touches the filesystem on behalf of a caller-supplied path goes
//! through it first.
//!
//! # Checks, in order
//!
//! 1. Raw input: empty strings, NUL bytes and shell metacharacters
//!    ([`FORBIDDEN_PATH_CHARS`]) are rejected as `invalidInput`.
//! 2. Resolution: relative input is joined onto the working directory and
//!    `.`/`..` are collapsed lexically.
//! 3. Membership: the result must equal or descend from a base path,
//!    compared component-wise. Failure is `pathTraversal`.
//! 4. Symlinks: when the path exists, its canonical form must also sit inside
//!    the canonical form of a base path.
//!
//! Rejections never carry the attempted path or the base path list in their
//! message. Both are written to the `log` stream and kept in
//! [`ValidationError::details`].
//!
//! ```rust
//! use stackshift_core::security::PathValidator;
//! use stackshift_core::ErrorKind;
//!
//! let validator = PathValidator::new("/home/user/project");
//! let dir = validator.validate_directory("src/../docs").unwrap();
//! assert_eq!(dir, std::path::PathBuf::from("/home/user/project/docs"));
//!
//! let err = validator.validate_directory("../../etc").unwrap_err();
//! assert_eq!(err.kind, ErrorKind::PathTraversal);
//! ```

pub mod normalize;

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{debug, warn};

use crate::error::{ErrorKind, ValidationError};
use normalize::{normalize_path, resolve_against};

/// Environment variable that widens the authorized set with the system temp
/// directory. Only [`PathValidator::from_env`] reads it.
pub const TEST_MODE_ENV: &str = "STACKSHIFT_TEST_MODE";

/// Characters that are never accepted in a path or filename.
pub const FORBIDDEN_PATH_CHARS: &[char] = &[
    ';', '&', '|', '`', '$', '(', ')', '{', '}', '[', ']', '<', '>', '\\', '!', '\'', '"', '\n',
    '\r',
];

/// Validates paths against a set of authorized base paths.
#[derive(Debug, Clone)]
pub struct PathValidator {
    working_directory: PathBuf,
    allowed_base_paths: Vec<PathBuf>,
}

impl PathValidator {
    /// Creates a validator whose only authorized base path is the working
    /// directory. A relative working directory is made absolute against the
    /// process current directory. If that fails it stays relative and
    /// [`is_allowed`](Self::is_allowed) rejects everything.
    pub fn new(working_directory: impl AsRef<Path>) -> Self {
        let working_directory = working_directory.as_ref();
        let working_directory = match std::path::absolute(working_directory) {
            Ok(absolute) => normalize_path(&absolute),
            Err(e) => {
                warn!("cannot make {} absolute: {e}", working_directory.display());
                normalize_path(working_directory)
            }
        };
        Self {
            allowed_base_paths: vec![working_directory.clone()],
            working_directory,
        }
    }

    /// Creates a validator honouring [`TEST_MODE_ENV`].
    pub fn from_env(working_directory: impl AsRef<Path>) -> Self {
        let test_mode = env::var(TEST_MODE_ENV)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self::new(working_directory).with_test_mode(test_mode)
    }

    /// Adds an authorized base path, resolved against the working directory.
    pub fn with_base_path(mut self, path: impl AsRef<Path>) -> Self {
        let resolved = resolve_against(&self.working_directory, path.as_ref());
        if !self.allowed_base_paths.contains(&resolved) {
            self.allowed_base_paths.push(resolved);
        }
        self
    }

    /// Adds several authorized base paths.
    pub fn with_base_paths<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths
            .into_iter()
            .fold(self, |validator, path| validator.with_base_path(path))
    }

    /// Adds the system temp directory when `enabled`.
    pub fn with_test_mode(self, enabled: bool) -> Self {
        if enabled {
            debug!("test mode enabled, authorizing the temp directory");
            self.with_base_path(env::temp_dir())
        } else {
            self
        }
    }

    /// The directory relative input is resolved against.
    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    pub(crate) fn allowed_base_paths(&self) -> &[PathBuf] {
        &self.allowed_base_paths
    }

    /// Validate a directory path given as text and return it absolute and
    /// normalized.
    pub fn validate_directory(&self, input: &str) -> Result<PathBuf, ValidationError> {
        check_raw_input(input, "Directory path")?;
        let resolved = resolve_against(&self.working_directory, Path::new(input));
        self.ensure_contained(&resolved, input)?;
        Ok(resolved)
    }

    /// Validate an already typed path. Non UTF-8 paths are rejected.
    pub fn validate_path(&self, path: &Path) -> Result<PathBuf, ValidationError> {
        let text = path.to_str().ok_or_else(|| {
            ValidationError::invalid_input("Path is not valid UTF-8")
                .with_details(format!("{}", path.display()))
        })?;
        self.validate_directory(text)
    }

    /// Validate `directory`, join a single-component `filename`, and check
    /// the composed path is still inside the authorized set.
    pub fn validate_file_path(
        &self,
        directory: &str,
        filename: &str,
    ) -> Result<PathBuf, ValidationError> {
        let dir = self.validate_directory(directory)?;
        validate_filename(filename)?;
        let composed = normalize_path(&dir.join(filename));
        self.ensure_contained(&composed, filename)?;
        Ok(composed)
    }

    /// True if the already resolved `path` lies inside an authorized base.
    /// Relative paths and relative bases never match.
    pub fn is_allowed(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);
        normalized.is_absolute()
            && self
                .allowed_base_paths
                .iter()
                .any(|base| base.is_absolute() && normalized.starts_with(base))
    }

    fn ensure_contained(&self, resolved: &Path, input: &str) -> Result<(), ValidationError> {
        if !self.is_allowed(resolved) {
            let escape = if input.starts_with("..") {
                "parent-directory escape"
            } else {
                "outside allowed base paths"
            };
            return Err(self.traversal(resolved, escape));
        }
        self.ensure_no_symlink_escape(resolved)
    }

    fn ensure_no_symlink_escape(&self, resolved: &Path) -> Result<(), ValidationError> {
        let Ok(canonical) = fs::canonicalize(resolved) else {
            return Ok(());
        };
        let inside = self.allowed_base_paths.iter().any(|base| {
            let base = fs::canonicalize(base).unwrap_or_else(|_| base.clone());
            canonical.starts_with(&base)
        });
        if inside {
            Ok(())
        } else {
            Err(self.traversal(&canonical, "symlink escape"))
        }
    }

    fn traversal(&self, attempted: &Path, reason: &str) -> ValidationError {
        let details = format!(
            "{reason}: attempted {}, allowed {:?}",
            attempted.display(),
            self.allowed_base_paths()
        );
        warn!("path validation rejected input: {details}");
        ValidationError::new(ErrorKind::PathTraversal).with_details(details)
    }
}

/// Validate that `filename` is a single, plain path component.
pub fn validate_filename(filename: &str) -> Result<(), ValidationError> {
    check_raw_input(filename, "Filename")?;
    let mut components = Path::new(filename).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_normal || filename.contains('/') {
        return Err(ValidationError::invalid_input(
            "Filename must be a single path component",
        )
        .with_details(format!("rejected filename {filename:?}")));
    }
    Ok(())
}

fn check_raw_input(input: &str, what: &str) -> Result<(), ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::invalid_input(format!("{what} must not be empty")).finish());
    }
    if input.contains('\0') || input.contains(FORBIDDEN_PATH_CHARS) {
        return Err(
            ValidationError::invalid_input(format!("{what} contains invalid characters"))
                .with_details(format!("rejected input {input:?}")),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_validator() -> PathValidator {
        PathValidator::new("/home/user/project")
    }

    #[test]
    fn test_parent_escape_is_traversal() {
        let err = project_validator()
            .validate_directory("../../etc")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PathTraversal);
        assert!(!err.message.contains("/home/user/project"));
        assert!(!err.user_message().contains("etc"));
    }

    #[test]
    fn test_absolute_outside_is_traversal() {
        let err = project_validator()
            .validate_directory("/var/lib")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PathTraversal);
    }

    #[test]
    fn test_sibling_with_shared_prefix_is_rejected() {
        let err = project_validator()
            .validate_directory("/home/user/project2")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PathTraversal);
    }

    #[test]
    fn test_inside_paths_are_normalized_and_idempotent() {
        let validator = project_validator();
        let first = validator.validate_directory("src/./lib/../bin").unwrap();
        assert_eq!(first, PathBuf::from("/home/user/project/src/bin"));

        let again = validator.validate_directory(first.to_str().unwrap()).unwrap();
        assert_eq!(again, first);

        let root = validator.validate_directory(".").unwrap();
        assert_eq!(root, PathBuf::from("/home/user/project"));
    }

    #[test]
    fn test_dotdot_that_stays_inside_is_accepted() {
        let dir = project_validator()
            .validate_directory("src/../docs")
            .unwrap();
        assert_eq!(dir, PathBuf::from("/home/user/project/docs"));
    }

    #[test]
    fn test_metacharacters_are_rejected_even_inside() {
        let validator = project_validator();
        for input in [
            "src;rm -rf",
            "a&b",
            "a|b",
            "a`b`",
            "$HOME",
            "a(b)",
            "a{b}",
            "a[0]",
            "a<b",
            "a>b",
            "a\\b",
            "a!b",
            "it's",
            "say \"hi\"",
            "line\nbreak",
            "carriage\rreturn",
        ] {
            let err = validator.validate_directory(input).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidInput, "input {input:?}");
        }
    }

    #[test]
    fn test_empty_and_nul_are_rejected() {
        let validator = project_validator();
        assert_eq!(
            validator.validate_directory("").unwrap_err().kind,
            ErrorKind::InvalidInput
        );
        assert_eq!(
            validator.validate_directory("a\0b").unwrap_err().kind,
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_relative_working_directory_is_made_absolute() {
        let validator = PathValidator::new(".");
        assert!(validator.working_directory().is_absolute());
        assert_eq!(
            validator.working_directory(),
            normalize_path(&env::current_dir().unwrap())
        );

        let depth = validator.working_directory().components().count();
        let escape = vec![".."; depth].join("/");
        let err = validator.validate_directory(&format!("{escape}/etc")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PathTraversal);
    }

    #[test]
    fn test_relative_paths_are_never_allowed() {
        let validator = project_validator();
        assert!(!validator.is_allowed(Path::new("src")));
        assert!(!validator.is_allowed(Path::new("")));
        assert!(validator.is_allowed(Path::new("/home/user/project/src")));
    }

    #[test]
    fn test_additional_base_paths_are_authorized() {
        let validator = project_validator().with_base_paths(["/srv/fixtures"]);
        assert!(validator.validate_directory("/srv/fixtures/case-1").is_ok());
        assert!(validator.validate_directory("/srv/other").is_err());
    }

    #[test]
    fn test_test_mode_adds_temp_dir() {
        let temp = env::temp_dir();
        let plain = project_validator();
        assert!(!plain.is_allowed(&temp.join("x")));

        let widened = project_validator().with_test_mode(true);
        assert!(widened.is_allowed(&temp.join("x")));
        assert_eq!(widened.allowed_base_paths().len(), 2);
    }

    #[test]
    fn test_file_path_joins_and_rechecks() {
        let validator = project_validator();
        let path = validator
            .validate_file_path("docs", ".stackshift-state.json")
            .unwrap();
        assert_eq!(
            path,
            PathBuf::from("/home/user/project/docs/.stackshift-state.json")
        );
    }

    #[test]
    fn test_file_path_rejects_separators_and_dots() {
        let validator = project_validator();
        for name in ["../secret", "a/b", "..", ".", "", "a\\b"] {
            let err = validator.validate_file_path(".", name).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidInput, "filename {name:?}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_is_traversal() {
        let outside = tempfile::TempDir::new().expect("outside dir");
        let workspace = tempfile::TempDir::new().expect("workspace dir");
        let link = workspace.path().join("escape");
        std::os::unix::fs::symlink(outside.path(), &link).expect("symlink");

        let validator = PathValidator::new(workspace.path());
        let err = validator.validate_directory("escape").unwrap_err();
        assert_eq!(err.kind, ErrorKind::PathTraversal);

        let real = workspace.path().join("real");
        fs::create_dir(&real).expect("mkdir");
        assert!(validator.validate_directory("real").is_ok());
    }
}
