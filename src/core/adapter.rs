//! Dispatcher-side pairing of an appender with its queue and worker

use crate::core::appender::Appender;
use crate::core::bounded_queue::{BoundedQueue, Enqueue};
use crate::core::level::LogLevel;
use crate::core::metrics::PipelineMetrics;
use crate::core::record::LogRecord;
use crate::core::worker::{AppenderWorker, WorkerTimings};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default capacity of each appender's private queue
pub const DEFAULT_APPENDER_QUEUE_SIZE: usize = 50_000;

/// How long the dispatcher waits for space on a full appender queue before
/// rejecting the record
const APPENDER_QUEUE_POLL: Duration = Duration::from_millis(10);

/// Owns one appender's queue and worker thread. The appender itself lives
/// on the worker thread; the adapter keeps only its name and a copy of its
/// level for dispatch-time filtering.
pub(crate) struct AppenderAdapter {
    name: String,
    level: LogLevel,
    queue: Arc<BoundedQueue<LogRecord>>,
    terminated: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
    consecutive_fail_count: u64,
}

impl AppenderAdapter {
    pub(crate) fn start(
        appender: Box<dyn Appender + Send>,
        queue_capacity: usize,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        let name = appender.name().to_string();
        let level = appender.level();
        let queue = Arc::new(BoundedQueue::new(queue_capacity, APPENDER_QUEUE_POLL));
        let terminated = Arc::new(AtomicBool::new(false));
        let worker_queue = Arc::clone(&queue);
        let worker_terminated = Arc::clone(&terminated);
        let worker = thread::spawn(move || {
            AppenderWorker::new(
                appender,
                worker_queue,
                worker_terminated,
                metrics,
                WorkerTimings::default(),
            )
            .run()
        });
        Self {
            name,
            level,
            queue,
            terminated,
            worker: Some(worker),
            consecutive_fail_count: 0,
        }
    }

    /// Hand the adapter its own copy of the record, so the dispatcher can
    /// release the original regardless of this sink's fate.
    pub(crate) fn enqueue(&mut self, record: &LogRecord) -> Enqueue {
        match self.queue.enqueue(record.clone()) {
            Enqueue::Accepted => {
                self.consecutive_fail_count = 0;
                Enqueue::Accepted
            }
            Enqueue::Rejected => {
                self.consecutive_fail_count += 1;
                Enqueue::Rejected
            }
        }
    }

    /// Drop one record from the head of the queue (`DiscardOlder` overflow
    /// action). Returns whether anything was queued to discard.
    pub(crate) fn discard_oldest(&self) -> bool {
        self.queue.try_dequeue().is_some()
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn level(&self) -> LogLevel {
        self.level
    }

    #[allow(dead_code)]
    pub(crate) fn consecutive_fail_count(&self) -> u64 {
        self.consecutive_fail_count
    }
}

impl Drop for AppenderAdapter {
    /// Termination is signaled before the queue shutdown so the woken worker
    /// observes it immediately; the shutdown guarantees the worker cannot
    /// stay blocked in dequeue. The join waits for drain and teardown.
    fn drop(&mut self) {
        self.terminated.store(true, Ordering::Release);
        self.queue.shutdown();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                eprintln!("[FANLOG ERROR] appender '{}' worker panicked", self.name);
            }
        }
    }
}
