//! Background worker pool for attribute computation
//!
//! A small fixed-size pool of threads that execute queued computations in
//! submission order. One pool per binder: cancelling a binder discards its
//! queued work without affecting the other binders.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Configuration for a binder's worker pool.
#[derive(Debug, Clone)]
pub struct BinderConfig {
    /// Number of worker threads. Default: 2.
    pub num_workers: usize,

    /// Maximum time a worker will wait for a task before checking shutdown.
    /// Default: 5ms.
    pub poll_interval: Duration,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            num_workers: 2,
            poll_interval: Duration::from_millis(5),
        }
    }
}

impl BinderConfig {
    /// Create a configuration with the given number of workers.
    pub fn new(num_workers: usize) -> Self {
        Self {
            num_workers: num_workers.max(1),
            poll_interval: Duration::from_millis(5),
        }
    }

    /// Set the poll interval for idle workers.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// A queued unit of background work.
pub(crate) type Task = Box<dyn FnOnce() + Send>;

/// Fixed-size pool of worker threads draining a FIFO task queue.
///
/// Workers poll the queue and sleep briefly when it is empty. Tasks that
/// have already been picked up run to completion; `cancel_pending` only
/// discards tasks still waiting in the queue (in-flight work is voided at
/// the result-delivery layer instead).
pub(crate) struct WorkerPool {
    queue: Arc<Mutex<VecDeque<Task>>>,
    shutdown: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Create and start a new worker pool.
    pub(crate) fn new(config: &BinderConfig) -> Self {
        let queue: Arc<Mutex<VecDeque<Task>>> = Arc::new(Mutex::new(VecDeque::new()));
        let shutdown = Arc::new(AtomicBool::new(false));
        let mut workers = Vec::with_capacity(config.num_workers.max(1));

        for id in 0..config.num_workers.max(1) {
            let queue = Arc::clone(&queue);
            let shutdown = Arc::clone(&shutdown);
            let poll_interval = config.poll_interval;

            let handle = thread::Builder::new()
                .name(format!("medley-bind-worker-{}", id))
                .spawn(move || loop {
                    if shutdown.load(Ordering::Acquire) {
                        break;
                    }

                    let task = queue.lock().unwrap().pop_front();
                    match task {
                        Some(task) => task(),
                        None => thread::sleep(poll_interval),
                    }
                })
                .expect("Failed to spawn binder worker thread");

            workers.push(handle);
        }

        Self {
            queue,
            shutdown,
            workers,
        }
    }

    /// Queue a task for execution.
    pub(crate) fn submit(&self, task: Task) {
        self.queue.lock().unwrap().push_back(task);
    }

    /// Discard every task still waiting in the queue.
    ///
    /// Returns the number of tasks discarded.
    pub(crate) fn cancel_pending(&self) -> usize {
        let mut queue = self.queue.lock().unwrap();
        let dropped = queue.len();
        queue.clear();
        dropped
    }

    /// Signal shutdown and wait for every worker to exit.
    #[cfg(test)]
    pub(crate) fn shutdown(mut self) {
        self.shutdown.store(true, Ordering::Release);
        for worker in self.workers.drain(..) {
            worker.join().expect("Binder worker thread panicked");
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Queued tasks are dropped; each worker finishes its current task
        // and exits.
        self.queue.lock().unwrap().clear();
        self.shutdown.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_config_default() {
        let config = BinderConfig::default();
        assert_eq!(config.num_workers, 2);
        assert_eq!(config.poll_interval, Duration::from_millis(5));
    }

    #[test]
    fn test_config_builder() {
        let config = BinderConfig::new(4).with_poll_interval(Duration::from_millis(1));
        assert_eq!(config.num_workers, 4);
        assert_eq!(config.poll_interval, Duration::from_millis(1));
    }

    #[test]
    fn test_config_clamps_zero_workers() {
        let config = BinderConfig::new(0);
        assert_eq!(config.num_workers, 1);
    }

    #[test]
    fn test_pool_executes_tasks() {
        let pool = WorkerPool::new(&BinderConfig::new(2));
        let executed = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let executed = Arc::clone(&executed);
            pool.submit(Box::new(move || {
                executed.fetch_add(1, Ordering::SeqCst);
            }));
        }

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while executed.load(Ordering::SeqCst) < 5 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }

        assert_eq!(executed.load(Ordering::SeqCst), 5);
        pool.shutdown();
    }

    #[test]
    fn test_cancel_pending_discards_queued_tasks() {
        // Single worker occupied by a slow task; everything queued behind
        // it must be discardable.
        let pool = WorkerPool::new(&BinderConfig::new(1));
        let executed = Arc::new(AtomicUsize::new(0));

        pool.submit(Box::new(|| thread::sleep(Duration::from_millis(100))));
        thread::sleep(Duration::from_millis(30)); // let the worker pick it up

        for _ in 0..4 {
            let executed = Arc::clone(&executed);
            pool.submit(Box::new(move || {
                executed.fetch_add(1, Ordering::SeqCst);
            }));
        }

        let dropped = pool.cancel_pending();
        assert_eq!(dropped, 4);

        thread::sleep(Duration::from_millis(150));
        assert_eq!(executed.load(Ordering::SeqCst), 0);

        pool.shutdown();
    }
}
