//! Batch session document.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::WorkflowConfig;
use crate::error::ValidationError;
use crate::file_io::{strip_forbidden_keys, FORBIDDEN_KEYS};

/// Shared configuration and progress ledger for a batch of sibling working
/// directories (`<root>/.stackshift-batch-session.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSession {
    pub session_id: Uuid,

    pub started_at: Timestamp,

    /// Absolute, normalized directory holding the session file
    pub batch_root_directory: PathBuf,

    pub total_repos: u32,

    pub batch_size: u32,

    /// Previously collected answers, write-once per key
    #[serde(default)]
    pub answers: BTreeMap<String, Value>,

    /// Identifiers of completed units, in completion order
    #[serde(default)]
    pub processed_repos: Vec<String>,
}

impl BatchSession {
    /// Start a new session rooted at `root`.
    pub fn new(
        root: PathBuf,
        total_repos: u32,
        batch_size: u32,
        answers: BTreeMap<String, Value>,
    ) -> Result<Self, ValidationError> {
        if total_repos == 0 {
            return Err(ValidationError::invalid_input("totalRepos must be at least 1").finish());
        }
        if batch_size == 0 {
            return Err(ValidationError::invalid_input("batchSize must be at least 1").finish());
        }
        Ok(Self {
            session_id: Uuid::new_v4(),
            started_at: Timestamp::now(),
            batch_root_directory: root,
            total_repos,
            batch_size,
            answers: sanitize_answers(answers),
            processed_repos: Vec::new(),
        })
    }

    /// Check the session against the directory its file was found in.
    /// Returns one message per violation.
    pub fn validate(&self, location: &Path) -> Vec<String> {
        let mut errors = Vec::new();
        if self.batch_root_directory != location {
            errors.push(format!(
                "batchRootDirectory {} does not match file location {}",
                self.batch_root_directory.display(),
                location.display()
            ));
        }
        if self.total_repos == 0 {
            errors.push("totalRepos must be at least 1".to_string());
        }
        if self.batch_size == 0 {
            errors.push("batchSize must be at least 1".to_string());
        }

        let mut seen = HashSet::new();
        for repo in &self.processed_repos {
            if !seen.insert(repo.as_str()) {
                errors.push(format!("processedRepos contains '{repo}' twice"));
            }
        }
        if self.processed_repos.len() > self.total_repos as usize {
            errors.push(format!(
                "processedRepos has {} entries but totalRepos is {}",
                self.processed_repos.len(),
                self.total_repos
            ));
        }
        errors
    }

    /// True if `repo` is already in the ledger.
    pub fn is_processed(&self, repo: &str) -> bool {
        self.processed_repos.iter().any(|done| done == repo)
    }

    /// Append `repo` to the ledger. Returns `false` if it was already there.
    pub fn mark_processed(&mut self, repo: &str) -> Result<bool, ValidationError> {
        let repo = repo.trim();
        if repo.is_empty() {
            return Err(ValidationError::invalid_input("Repository id must not be empty").finish());
        }
        if self.is_processed(repo) {
            return Ok(false);
        }
        if self.remaining() == 0 {
            return Err(ValidationError::invalid_input(format!(
                "Batch already processed all {} repositories",
                self.total_repos
            ))
            .finish());
        }
        self.processed_repos.push(repo.to_string());
        Ok(true)
    }

    /// Add answers for keys not answered yet. Returns the keys that were added.
    pub fn record_answers(&mut self, answers: BTreeMap<String, Value>) -> Vec<String> {
        let mut added = Vec::new();
        for (key, value) in sanitize_answers(answers) {
            if !self.answers.contains_key(&key) {
                self.answers.insert(key.clone(), value);
                added.push(key);
            }
        }
        added
    }

    /// Units still to be processed.
    pub fn remaining(&self) -> u32 {
        let processed = u32::try_from(self.processed_repos.len()).unwrap_or(u32::MAX);
        self.total_repos.saturating_sub(processed)
    }

    /// True once every unit has been processed.
    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Typed view of the answers, for seeding a descendant workflow.
    pub fn config(&self) -> WorkflowConfig {
        WorkflowConfig::from_answers(&self.answers)
    }
}

fn sanitize_answers(mut answers: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    answers.retain(|key, _| !FORBIDDEN_KEYS.contains(&key.as_str()));
    for value in answers.values_mut() {
        strip_forbidden_keys(value);
    }
    answers
}
