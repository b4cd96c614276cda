//! Bounded reads, sanitized JSON parsing and atomic writes.
//!
//! Every persistent document in the store goes through these primitives:
//!
//! - [`read_bounded`] stats before reading and refuses files above
//!   [`MAX_FILE_SIZE`].
//! - [`read_json_safe`] parses and then strips [`FORBIDDEN_KEYS`] from every
//!   object in the document.
//! - [`write_atomic`] writes a randomly named sibling temp file and renames it
//!   over the destination, so readers see either the old or the new content.
//!   An existing destination keeps its permissions.
//! - [`write_json_atomic`] strips [`FORBIDDEN_KEYS`] again before writing, so
//!   no document on disk ever carries them.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ErrorKind, IoResultExt, Result, StoreError, ValidationError};

/// Read ceiling for any document (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Keys that never survive a parse.
pub const FORBIDDEN_KEYS: &[&str] = &["__proto__", "constructor", "prototype"];

/// Read a whole file, refusing anything larger than [`MAX_FILE_SIZE`].
pub fn read_bounded(path: &Path) -> Result<Vec<u8>> {
    read_bounded_with_limit(path, MAX_FILE_SIZE)
}

/// Read a whole file, refusing anything larger than `limit` bytes.
///
/// The size is checked from metadata before the file is opened. The read is
/// also capped at `limit + 1` bytes so a file that grows in between is still
/// rejected.
pub fn read_bounded_with_limit(path: &Path, limit: u64) -> Result<Vec<u8>> {
    let metadata = fs::metadata(path).at_path(path)?;
    if !metadata.is_file() {
        return Err(ValidationError::invalid_input("Path is not a regular file")
            .with_details(format!("{} is not a regular file", path.display()))
            .into());
    }
    if metadata.len() > limit {
        return Err(too_large(path, metadata.len(), limit));
    }

    let file = File::open(path).at_path(path)?;
    let capacity = usize::try_from(metadata.len()).unwrap_or(0);
    let mut buf = Vec::with_capacity(capacity);
    file.take(limit + 1).read_to_end(&mut buf).at_path(path)?;
    if buf.len() as u64 > limit {
        return Err(too_large(path, buf.len() as u64, limit));
    }
    Ok(buf)
}

/// Read and parse a JSON document, then strip [`FORBIDDEN_KEYS`].
pub fn read_json_safe(path: &Path) -> Result<Value> {
    let bytes = read_bounded(path)?;
    let mut value: Value = serde_json::from_slice(&bytes).map_err(|e| {
        ValidationError::new(ErrorKind::InvalidStructure)
            .with_details(format!("{}: {e}", path.display()))
    })?;
    let removed = strip_forbidden_keys(&mut value);
    if removed > 0 {
        debug!("stripped {removed} forbidden key(s) from {}", path.display());
    }
    Ok(value)
}

/// Remove [`FORBIDDEN_KEYS`] from every object in `value`, returning how many
/// entries were dropped.
pub fn strip_forbidden_keys(value: &mut Value) -> usize {
    match value {
        Value::Object(map) => {
            let before = map.len();
            map.retain(|key, _| !FORBIDDEN_KEYS.contains(&key.as_str()));
            let mut removed = before - map.len();
            for nested in map.values_mut() {
                removed += strip_forbidden_keys(nested);
            }
            removed
        }
        Value::Array(items) => items.iter_mut().map(strip_forbidden_keys).sum(),
        _ => 0,
    }
}

/// Atomically replace `path` with `contents` (temp file + rename).
///
/// The parent directory must already exist. On failure the temp file is
/// removed and the destination keeps its previous content, or stays absent.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let (dir, file_name) = match (path.parent(), path.file_name()) {
        (Some(dir), Some(name)) if !dir.as_os_str().is_empty() => (dir, name),
        _ => {
            return Err(ValidationError::invalid_input("Path has no parent directory")
                .with_details(format!("cannot write atomically to {}", path.display()))
                .into())
        }
    };

    let prefix = format!(".{}.", file_name.to_string_lossy());
    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .at_path(dir)?;
    temp.write_all(contents).at_path(temp.path())?;
    // tempfile creates 0600; keep whatever mode the file being replaced had.
    if let Some(existing) = fs::metadata(path).ok().filter(|m| m.is_file()) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .at_path(temp.path())?;
    }
    temp.as_file().sync_all().at_path(temp.path())?;
    temp.persist(path)
        .map_err(|err| StoreError::io(path, err.error))?;
    debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Serialize `value`, strip [`FORBIDDEN_KEYS`], and write it atomically as
/// pretty JSON with a trailing newline.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut document = serde_json::to_value(value)?;
    let removed = strip_forbidden_keys(&mut document);
    if removed > 0 {
        warn!("dropped {removed} forbidden key(s) before writing {}", path.display());
    }
    let mut buf = serde_json::to_string_pretty(&document)?;
    buf.push('\n');
    write_atomic(path, buf.as_bytes())
}

/// Remove `path` if present. Returns whether a file was removed.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

fn too_large(path: &Path, size: u64, limit: u64) -> StoreError {
    ValidationError::new(ErrorKind::FileTooLarge)
        .with_details(format!(
            "{} is {size} bytes, limit is {limit}",
            path.display()
        ))
        .into()
}
