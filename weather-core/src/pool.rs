//! Bounded pool for root lookups.
//!
//! Root lookups (location key, geocoding) each hold a worker while they run.
//! Dependent lookups run as plain continuations and never take one.

use std::sync::{Arc, LazyLock};

use tokio::sync::Semaphore;

/// Number of root lookups allowed to run at once, process-wide.
pub const ROOT_LOOKUP_WORKERS: usize = 2;

static SHARED: LazyLock<WorkerPool> = LazyLock::new(|| WorkerPool::new(ROOT_LOOKUP_WORKERS));

#[derive(Debug, Clone)]
pub struct WorkerPool {
    workers: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        Self {
            workers: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// The process-wide pool. Created on first use, lives until exit.
    pub fn shared() -> &'static WorkerPool {
        &SHARED
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn idle_workers(&self) -> usize {
        self.workers.available_permits()
    }

    /// Wait for a free worker, then drive `task` to completion on it.
    pub async fn run<F>(&self, task: F) -> F::Output
    where
        F: Future,
    {
        // `workers` is never closed, so acquiring cannot fail.
        let _worker = self.workers.acquire().await.ok();
        task.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::{Instant, sleep};

    #[test]
    fn shared_pool_has_two_workers() {
        assert_eq!(WorkerPool::shared().size(), ROOT_LOOKUP_WORKERS);
        assert_eq!(ROOT_LOOKUP_WORKERS, 2);
    }

    #[tokio::test]
    async fn worker_is_released_after_task() {
        let pool = WorkerPool::new(2);
        let out = pool.run(async { 7 }).await;

        assert_eq!(out, 7);
        assert_eq!(pool.idle_workers(), 2);
    }

    #[tokio::test]
    async fn running_task_holds_one_worker() {
        let pool = WorkerPool::new(2);

        let idle_inside = pool.run(async { pool.idle_workers() }).await;

        assert_eq!(idle_inside, 1);
        assert_eq!(pool.idle_workers(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn third_task_waits_for_a_free_worker() {
        let pool = WorkerPool::new(2);
        let start = Instant::now();

        let task = || pool.run(async { sleep(Duration::from_millis(100)).await });
        tokio::join!(task(), task(), task());

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(250));
    }
}
