//! Error types for the state store.
//!
//! Two layers: [`ValidationError`] carries the closed set of security and
//! validation failures ([`ErrorKind`]), and [`StoreError`] wraps it together
//! with the plumbing failures (I/O outside the taxonomy, serialization,
//! background task joins).
//!
//! Neither type ever renders a filesystem path through `Display`. Paths and
//! authorized base paths are kept in [`ValidationError::details`] and in the
//! `log` stream only.

use std::fmt;
use std::io;
use std::path::PathBuf;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hint appended to every externally visible validation message.
pub const REMEDIATION_HINT: &str = "Ensure you are running from your project root.";

/// Closed taxonomy of validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Path resolves outside every authorized base path
    PathTraversal,
    /// File exceeds the read ceiling
    FileTooLarge,
    /// Document could not be parsed or has the wrong shape
    InvalidStructure,
    /// Caller supplied an unacceptable value
    InvalidInput,
    /// File or directory does not exist
    NotFound,
    /// Operating system refused access
    PermissionDenied,
}

impl ErrorKind {
    /// Stable camelCase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::PathTraversal => "pathTraversal",
            ErrorKind::FileTooLarge => "fileTooLarge",
            ErrorKind::InvalidStructure => "invalidStructure",
            ErrorKind::InvalidInput => "invalidInput",
            ErrorKind::NotFound => "notFound",
            ErrorKind::PermissionDenied => "permissionDenied",
        }
    }

    /// Default message for the kind, safe for external display.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::PathTraversal => "Access denied: path is outside the allowed workspace",
            ErrorKind::FileTooLarge => "File is too large to read safely",
            ErrorKind::InvalidStructure => "File contents are not a valid document",
            ErrorKind::InvalidInput => "Invalid input",
            ErrorKind::NotFound => "File or directory not found",
            ErrorKind::PermissionDenied => "Permission denied",
        }
    }

    /// Kinds the state store must surface instead of falling back to defaults.
    pub fn is_security_relevant(&self) -> bool {
        matches!(
            self,
            ErrorKind::PathTraversal | ErrorKind::FileTooLarge | ErrorKind::PermissionDenied
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified validation failure.
///
/// `message` may cross the external interface boundary; `details` is for the
/// local diagnostic stream only.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub message: String,
    pub details: Option<String>,
    pub timestamp: Timestamp,
}

/// Builder for creating validation errors with optional context.
pub struct ValidationErrorBuilder {
    kind: ErrorKind,
    message: Option<String>,
}

impl ValidationErrorBuilder {
    /// Create a new builder for the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Override the external message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Build the error with internal diagnostic details.
    pub fn with_details(self, details: impl Into<String>) -> ValidationError {
        self.build(Some(details.into()))
    }

    /// Build the error without details.
    pub fn finish(self) -> ValidationError {
        self.build(None)
    }

    fn build(self, details: Option<String>) -> ValidationError {
        ValidationError {
            kind: self.kind,
            message: self
                .message
                .unwrap_or_else(|| self.kind.default_message().to_string()),
            details,
            timestamp: Timestamp::now(),
        }
    }
}

impl ValidationError {
    /// Creates a builder for a validation error of `kind`.
    pub fn new(kind: ErrorKind) -> ValidationErrorBuilder {
        ValidationErrorBuilder::new(kind)
    }

    /// Shorthand for an `invalidInput` error with a specific message.
    pub fn invalid_input(message: impl Into<String>) -> ValidationErrorBuilder {
        ValidationErrorBuilder::new(ErrorKind::InvalidInput).with_message(message)
    }

    /// Message suitable for an external caller: kind description plus the
    /// remediation hint. Never contains paths.
    pub fn user_message(&self) -> String {
        format!("{}. {}", self.message, REMEDIATION_HINT)
    }

    /// Classify an I/O error, returning `None` for errors outside the taxonomy.
    pub fn from_io(err: &io::Error, details: impl Into<String>) -> Option<Self> {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => return None,
        };
        Some(Self::new(kind).with_details(format!("{}: {err}", details.into())))
    }
}

/// Comprehensive error type for all store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Classified validation failure
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// File system errors that are not part of the validation taxonomy
    #[error("File system error: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Background blocking task failed to complete
    #[error("Background task failed: {message}")]
    Task { message: String },
}

impl StoreError {
    /// Map an I/O error at `path` into the taxonomy where possible.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match ValidationError::from_io(&source, path.display().to_string()) {
            Some(validation) => StoreError::Validation(validation),
            None => StoreError::FileSystem { path, source },
        }
    }

    /// The validation kind, if this is a classified failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            StoreError::Validation(err) => Some(err.kind),
            _ => None,
        }
    }

    /// True for kinds that must never be swallowed into a default.
    pub fn is_security_relevant(&self) -> bool {
        self.kind().is_some_and(|kind| kind.is_security_relevant())
    }

    /// Message suitable for an external caller.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Validation(err) => err.user_message(),
            other => format!("{other}. {REMEDIATION_HINT}"),
        }
    }
}

/// Extension trait for mapping I/O results with the path they concern.
pub trait IoResultExt<T> {
    /// Map the error through [`StoreError::io`].
    fn at_path(self, path: &std::path::Path) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, io::Error> {
    fn at_path(self, path: &std::path::Path) -> Result<T> {
        self.map_err(|e| StoreError::io(path, e))
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
