//! Central fan-out dispatcher
//!
//! A single thread consumes the main queue and offers each record to every
//! adapter whose level filter accepts it, cloning per adapter. Overflow at
//! an adapter queue is routed through the events handler, which picks the
//! overflow action.

use crate::core::adapter::AppenderAdapter;
use crate::core::bounded_queue::{BoundedQueue, Dequeue, Enqueue};
use crate::core::metrics::PipelineMetrics;
use crate::core::record::LogRecord;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default capacity of the main queue
pub const DEFAULT_MAIN_QUEUE_SIZE: usize = 50_000;

/// Producer-side wait on a full main queue, and the dispatcher's idle poll
const MAIN_QUEUE_POLL: Duration = Duration::from_millis(500);

/// Why the events handler was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowReason {
    QueueFull,
}

/// What to do with a record rejected by a full appender queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Default)]
pub enum OverflowAction {
    /// Drop the incoming record
    #[default]
    SkipNewest,
    /// Drop one queued record from the head of the appender's queue and
    /// re-enqueue the incoming record in the freed slot. Net effect: the
    /// oldest queued record is lost instead of the newest.
    DiscardOlder,
}

/// Callback consulted when an appender's queue rejects a record.
///
/// Runs synchronously on the dispatcher thread. The handler must not call
/// back into the same writer's `log`: with a full main queue that deadlocks
/// the pipeline. Re-entrant use is undefined.
pub trait EventsHandler: Send + Sync {
    fn on_appender_error(
        &self,
        appender_name: &str,
        failed_record: &LogRecord,
        reason: OverflowReason,
        action: &mut OverflowAction,
    );
}

pub(crate) struct Dispatcher {
    main_queue: Arc<BoundedQueue<LogRecord>>,
    terminated: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Dispatcher {
    pub(crate) fn start(
        main_queue_capacity: usize,
        adapters: Arc<Mutex<Vec<AppenderAdapter>>>,
        events_handler: Option<Arc<dyn EventsHandler>>,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        let main_queue = Arc::new(BoundedQueue::new(main_queue_capacity, MAIN_QUEUE_POLL));
        let terminated = Arc::new(AtomicBool::new(false));
        let loop_queue = Arc::clone(&main_queue);
        let loop_terminated = Arc::clone(&terminated);
        let handle = thread::spawn(move || {
            run_loop(loop_queue, adapters, events_handler, loop_terminated, metrics);
        });
        Self {
            main_queue,
            terminated,
            handle: Some(handle),
        }
    }

    pub(crate) fn main_queue(&self) -> &Arc<BoundedQueue<LogRecord>> {
        &self.main_queue
    }

    pub(crate) fn terminated_flag(&self) -> &Arc<AtomicBool> {
        &self.terminated
    }

    /// Signal termination and wait for the dispatcher to drain the main
    /// queue and tear down all adapters. Returns `false` when the timeout
    /// expires first (a stuck sink); the thread is left detached in that
    /// case so shutdown never deadlocks.
    pub(crate) fn shutdown(&mut self, timeout: Duration) -> bool {
        self.terminated.store(true, Ordering::Release);
        let Some(handle) = self.handle.take() else {
            return true;
        };
        let start = Instant::now();
        loop {
            if handle.is_finished() {
                let clean = handle.join().is_ok();
                if !clean {
                    eprintln!("[FANLOG ERROR] dispatcher thread panicked during shutdown");
                }
                self.main_queue.shutdown();
                return clean;
            }
            if start.elapsed() >= timeout {
                eprintln!(
                    "[FANLOG WARNING] dispatcher did not drain within {:?}; queued records may be lost",
                    timeout
                );
                self.handle = Some(handle);
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

fn run_loop(
    main_queue: Arc<BoundedQueue<LogRecord>>,
    adapters: Arc<Mutex<Vec<AppenderAdapter>>>,
    events_handler: Option<Arc<dyn EventsHandler>>,
    terminated: Arc<AtomicBool>,
    metrics: Arc<PipelineMetrics>,
) {
    loop {
        match main_queue.dequeue(main_queue.poll_interval()) {
            Dequeue::Signaled(record) => {
                fan_out(&record, &adapters, events_handler.as_deref(), &metrics);
            }
            // termination is only honored when idle, so producers can keep
            // enqueueing through a graceful-shutdown window until the queue
            // naturally empties
            Dequeue::Timeout => {
                if terminated.load(Ordering::Acquire) {
                    break;
                }
            }
            Dequeue::Shutdown => break,
        }
    }
    // tears each adapter down in registration order
    adapters.lock().clear();
}

fn fan_out(
    record: &LogRecord,
    adapters: &Mutex<Vec<AppenderAdapter>>,
    events_handler: Option<&dyn EventsHandler>,
    metrics: &PipelineMetrics,
) {
    let mut adapters = adapters.lock();
    for adapter in adapters.iter_mut() {
        if record.level < adapter.level() {
            continue;
        }
        match adapter.enqueue(record) {
            Enqueue::Accepted => {
                metrics.record_dispatched();
            }
            Enqueue::Rejected => {
                metrics.record_adapter_rejection();
                let mut action = OverflowAction::default();
                if let Some(handler) = events_handler {
                    handler.on_appender_error(
                        adapter.name(),
                        record,
                        OverflowReason::QueueFull,
                        &mut action,
                    );
                }
                if action == OverflowAction::DiscardOlder {
                    if adapter.discard_oldest() {
                        metrics.record_discarded();
                    }
                    // refill the freed slot with the rejected record; the
                    // dispatcher is this queue's only producer, so the slot
                    // cannot be taken in between
                    if adapter.enqueue(record) == Enqueue::Accepted {
                        metrics.record_dispatched();
                    }
                }
            }
        }
    }
}
