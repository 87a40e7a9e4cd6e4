//! Bounded worker pool for blocking generation calls.
//!
//! Jobs are spawned as soon as they are submitted; each one waits for a
//! permit, then runs on tokio's blocking thread pool. The caller keeps the
//! returned handles in submission order and awaits them in that order, so
//! results line up with their inputs whatever order they complete in.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use super::GenerationError;

/// Fixed-capacity pool, created once at startup and shared by reference.
#[derive(Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl WorkerPool {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Submit a blocking job. Must be called from within a tokio runtime.
    ///
    /// Submitted jobs are never cancelled: dropping the handle detaches it.
    pub fn submit<T, F>(&self, job: F) -> PendingTask<T>
    where
        F: FnOnce() -> Result<T, GenerationError> + Send + 'static,
        T: Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let handle = tokio::spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| GenerationError::WorkerFailed(e.to_string()))?;
            tokio::task::spawn_blocking(job)
                .await
                .map_err(|e| GenerationError::WorkerFailed(e.to_string()))?
        });
        PendingTask { handle }
    }

    /// Submit every job before awaiting any, then collect results in input order.
    ///
    /// The first failure in input order is returned; jobs after it keep
    /// running to completion in the background.
    pub async fn run_ordered<T, F, I>(&self, jobs: I) -> Result<Vec<T>, GenerationError>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Result<T, GenerationError> + Send + 'static,
        T: Send + 'static,
    {
        let pending: Vec<PendingTask<T>> = jobs.into_iter().map(|job| self.submit(job)).collect();

        let mut results = Vec::with_capacity(pending.len());
        for task in pending {
            results.push(task.wait().await?);
        }
        Ok(results)
    }
}

/// Handle to a submitted job.
pub struct PendingTask<T> {
    handle: JoinHandle<Result<T, GenerationError>>,
}

impl<T> PendingTask<T> {
    /// Wait for the job's result. A panicking job surfaces as `WorkerFailed`.
    pub async fn wait(self) -> Result<T, GenerationError> {
        self.handle
            .await
            .map_err(|e| GenerationError::WorkerFailed(e.to_string()))?
    }
}
