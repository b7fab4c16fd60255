//! Worker thread pool over a blocking work queue.
//!
//! Workers pull tasks until the queue is finished and drained, so
//! every task submitted before `finish()` runs exactly once.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

/// A polymorphic unit of work for the pool.
pub trait Task: Send {
    fn run(&mut self);
}

// Plain closures work as tasks too (handy in tests and one-off jobs).
impl<F: FnMut() + Send> Task for F {
    fn run(&mut self) {
        self()
    }
}

/// Thread-safe FIFO of tasks guarded by one mutex and one condvar.
///
/// `next_task` parks the caller until a task arrives or the queue is
/// finished; after `finish()`, remaining tasks are still drained
/// before `next_task` starts returning None.
pub struct WorkQueue {
    inner: Mutex<QueueState>,
    available: Condvar,
}

struct QueueState {
    tasks: VecDeque<Box<dyn Task>>,
    finished: bool,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                finished: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Queue a task. A no-op once the queue is finished.
    pub fn add_task(&self, task: Box<dyn Task>) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if !state.finished {
            state.tasks.push_back(task);
            self.available.notify_one();
        }
    }

    /// Take the next task, blocking while the queue is open and
    /// empty. Returns None once the queue is finished and drained,
    /// the signal for a worker to exit.
    pub fn next_task(&self) -> Option<Box<dyn Task>> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        // Condvar waits wake spuriously; always re-check the predicate
        while state.tasks.is_empty() && !state.finished {
            state = self
                .available
                .wait(state)
                .unwrap_or_else(|e| e.into_inner());
        }
        state.tasks.pop_front()
    }

    /// Mark the queue finished and wake every blocked consumer.
    pub fn finish(&self) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.finished = true;
        self.available.notify_all();
    }

    /// Number of tasks currently queued.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .tasks
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed set of worker threads draining a shared [`WorkQueue`].
pub struct ThreadPool {
    queue: Arc<WorkQueue>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawn `num_threads` workers (at least one).
    pub fn new(num_threads: usize) -> Self {
        let num_threads = num_threads.max(1);
        let queue = Arc::new(WorkQueue::new());
        log::debug!("Starting thread pool with {} workers", num_threads);

        let workers = (0..num_threads)
            .map(|id| {
                let queue = Arc::clone(&queue);
                thread::Builder::new()
                    .name(format!("render-worker-{id}"))
                    .spawn(move || {
                        while let Some(mut task) = queue.next_task() {
                            task.run();
                        }
                        log::trace!("Worker {} exiting", id);
                    })
                    .unwrap_or_else(|e| panic!("failed to spawn worker thread: {e}"))
            })
            .collect();

        Self { queue, workers }
    }

    /// Spawn one worker per available hardware thread.
    pub fn with_available_parallelism() -> Self {
        let threads = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self::new(threads)
    }

    /// Submit a task for execution.
    pub fn add_task(&self, task: Box<dyn Task>) {
        self.queue.add_task(task);
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.workers.len()
    }

    /// Finish the queue, run every remaining task, and wait for all
    /// workers to exit.
    pub fn join(mut self) {
        self.queue.finish();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::error!("Worker thread panicked");
            }
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.queue.finish();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingTask {
        counter: Arc<AtomicUsize>,
    }

    impl Task for CountingTask {
        fn run(&mut self) {
            self.counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_queue_fifo_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let queue = WorkQueue::new();
        for i in 0..3 {
            let order = Arc::clone(&order);
            queue.add_task(Box::new(move || order.lock().unwrap().push(i)));
        }
        queue.finish();
        while let Some(mut task) = queue.next_task() {
            task.run();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_queue_drains_after_finish() {
        let counter = Arc::new(AtomicUsize::new(0));
        let queue = WorkQueue::new();
        queue.add_task(Box::new(CountingTask {
            counter: Arc::clone(&counter),
        }));
        queue.finish();

        // Task queued before finish still comes out
        let mut task = queue.next_task().expect("queued task survives finish");
        task.run();
        assert_eq!(counter.load(Ordering::Relaxed), 1);
        assert!(queue.next_task().is_none());

        // Add after finish is ignored
        queue.add_task(Box::new(CountingTask {
            counter: Arc::clone(&counter),
        }));
        assert!(queue.next_task().is_none());
        assert_eq!(counter.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_next_task_blocks_until_add() {
        let queue = Arc::new(WorkQueue::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                if let Some(mut task) = queue.next_task() {
                    task.run();
                }
            })
        };
        thread::sleep(Duration::from_millis(50));
        queue.add_task(Box::new(CountingTask {
            counter: Arc::clone(&counter),
        }));
        queue.finish();
        consumer.join().unwrap();
        assert_eq!(counter.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_pool_runs_every_task_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pool = ThreadPool::new(4);
        for _ in 0..1000 {
            pool.add_task(Box::new(CountingTask {
                counter: Arc::clone(&counter),
            }));
        }
        pool.join();
        assert_eq!(counter.load(Ordering::Relaxed), 1000);
    }

    #[test]
    fn test_pool_single_thread() {
        // num_threads = 0 is clamped to 1
        let pool = ThreadPool::new(0);
        assert_eq!(pool.num_threads(), 1);
        let counter = Arc::new(AtomicUsize::new(0));
        pool.add_task(Box::new(CountingTask {
            counter: Arc::clone(&counter),
        }));
        pool.join();
        assert_eq!(counter.load(Ordering::Relaxed), 1);
    }
}
