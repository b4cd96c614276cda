//! Session operations for the BatchSessionRegistry.

use std::collections::BTreeMap;

use log::info;
use serde_json::Value;

use super::{persistence, BatchSessionRegistry, SESSION_FILE_NAME};
use crate::{
    blocking::run_blocking,
    error::{ErrorKind, Result, ValidationError},
    file_io::remove_if_exists,
    models::BatchSession,
};

impl BatchSessionRegistry {
    /// Find the session governing `start_dir`, walking upward until a session
    /// file, a repository root or the filesystem root is reached.
    ///
    /// Only `start_dir` is checked against the validator. The ancestors the
    /// walk reads may lie outside the authorized base paths, and
    /// [`mark_processed`](Self::mark_processed) and
    /// [`record_answers`](Self::record_answers) write back to the session file
    /// in whichever root the walk discovered.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use stackshift_core::{security::PathValidator, BatchSessionRegistry};
    /// # async {
    /// let registry = BatchSessionRegistry::new(PathValidator::new("/work/batch"));
    /// if let Some(session) = registry.find("repo-a/sub").await? {
    ///     println!("{} of {} done", session.processed_repos.len(), session.total_repos);
    /// }
    /// # Result::<(), stackshift_core::StoreError>::Ok(())
    /// # };
    /// ```
    pub async fn find(&self, start_dir: &str) -> Result<Option<BatchSession>> {
        let start = self.validator.validate_directory(start_dir)?;
        let marker = self.marker.clone();
        run_blocking(move || persistence::find_session(&start, marker.as_ref())).await
    }

    /// Start a new session rooted at `root`, replacing any earlier session
    /// stored there.
    pub async fn create(
        &self,
        root: &str,
        total_repos: u32,
        batch_size: u32,
        answers: BTreeMap<String, Value>,
    ) -> Result<BatchSession> {
        self.validator.validate_file_path(root, SESSION_FILE_NAME)?;
        let root = self.validator.validate_directory(root)?;
        let session = BatchSession::new(root, total_repos, batch_size, answers)?;

        run_blocking(move || {
            persistence::write_session(&session)?;
            info!(
                "started batch session {} in {} ({} repos, batches of {})",
                session.session_id,
                session.batch_root_directory.display(),
                session.total_repos,
                session.batch_size
            );
            Ok(session)
        })
        .await
    }

    /// Record `repo` as processed in the session governing `start_dir`.
    ///
    /// Returns `None` when no session is found. Marking an already processed
    /// repository leaves the file untouched. The write goes to the discovered
    /// batch root, see [`find`](Self::find).
    pub async fn mark_processed(
        &self,
        repo: &str,
        start_dir: &str,
    ) -> Result<Option<BatchSession>> {
        let start = self.validator.validate_directory(start_dir)?;
        let marker = self.marker.clone();
        let repo = repo.to_string();

        run_blocking(move || {
            let Some(mut session) = persistence::find_session(&start, marker.as_ref())? else {
                return Ok(None);
            };
            if session.mark_processed(&repo)? {
                persistence::write_session(&session)?;
            }
            Ok(Some(session))
        })
        .await
    }

    /// Add answers for keys the session has not recorded yet.
    ///
    /// Fails with `notFound` when no session governs `start_dir`. The write goes
    /// to the discovered batch root, see [`find`](Self::find).
    pub async fn record_answers(
        &self,
        start_dir: &str,
        answers: BTreeMap<String, Value>,
    ) -> Result<BatchSession> {
        let start = self.validator.validate_directory(start_dir)?;
        let marker = self.marker.clone();

        run_blocking(move || {
            let Some(mut session) = persistence::find_session(&start, marker.as_ref())? else {
                return Err(ValidationError::new(ErrorKind::NotFound)
                    .with_message("No batch session found")
                    .with_details(format!("no session above {}", start.display()))
                    .into());
            };
            if !session.record_answers(answers).is_empty() {
                persistence::write_session(&session)?;
            }
            Ok(session)
        })
        .await
    }

    /// Remove the session file stored directly in `dir`. Does not walk.
    pub async fn clear(&self, dir: &str) -> Result<bool> {
        let path = self.validator.validate_file_path(dir, SESSION_FILE_NAME)?;
        let removed = run_blocking(move || remove_if_exists(&path)).await?;
        if removed {
            info!("cleared batch session");
        }
        Ok(removed)
    }
}
