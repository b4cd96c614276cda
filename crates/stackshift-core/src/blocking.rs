//! Bridge from the async API to blocking filesystem work.

use tokio::task;

use crate::error::{Result, StoreError};

/// Run `f` on the blocking thread pool and flatten the join error into
/// [`StoreError::Task`].
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Task {
            message: format!("Task join error: {e}"),
        })?
}
