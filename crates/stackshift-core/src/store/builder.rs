//! Builder for creating and configuring StateStore instances.

use std::path::{Path, PathBuf};

use log::debug;

use super::{StateStore, STATE_FILE_NAME};
use crate::{
    error::{ErrorKind, Result, ValidationError},
    security::PathValidator,
};

/// Builder for creating and configuring StateStore instances.
#[derive(Debug, Clone)]
pub struct StateStoreBuilder {
    working_directory: PathBuf,
    directory: Option<String>,
    validator: Option<PathValidator>,
}

impl StateStoreBuilder {
    /// Creates a new builder. Relative directories are resolved against
    /// `working_directory`, which is also the default authorized base.
    pub fn new(working_directory: impl AsRef<Path>) -> Self {
        Self {
            working_directory: working_directory.as_ref().to_path_buf(),
            directory: None,
            validator: None,
        }
    }

    /// Sets the directory whose state is managed, as supplied by the caller.
    ///
    /// If not specified, the working directory itself is used.
    pub fn with_directory<S: Into<String>>(mut self, directory: Option<S>) -> Self {
        if let Some(directory) = directory {
            self.directory = Some(directory.into());
        }
        self
    }

    /// Use a preconfigured validator instead of one scoped to the working
    /// directory.
    pub fn with_validator(mut self, validator: PathValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Builds the configured store.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the directory escapes the authorized
    /// base paths, contains forbidden characters, or does not exist.
    pub fn build(self) -> Result<StateStore> {
        let validator = self
            .validator
            .unwrap_or_else(|| PathValidator::new(&self.working_directory));
        let input = self.directory.as_deref().unwrap_or(".");

        let directory = validator.validate_directory(input)?;
        if !directory.is_dir() {
            return Err(ValidationError::new(ErrorKind::NotFound)
                .with_message("Directory not found")
                .with_details(format!("{} is not a directory", directory.display()))
                .into());
        }
        let state_path = validator.validate_file_path(input, STATE_FILE_NAME)?;

        debug!("state store bound to {}", state_path.display());
        Ok(StateStore::new(directory, state_path))
    }
}
