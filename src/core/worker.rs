//! Per-appender worker thread
//!
//! Each appender is driven by one dedicated thread running a small lifecycle
//! state machine: set the sink up (with bounded retries), consume its queue,
//! and on write failure back off through a cooldown before asking the sink
//! to restart. Teardown runs on every exit path.

use crate::core::appender::Appender;
use crate::core::bounded_queue::{BoundedQueue, Dequeue};
use crate::core::metrics::PipelineMetrics;
use crate::core::record::LogRecord;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Consecutive setup failures tolerated before the worker gives up on fast
/// retries and falls back to the cooldown/restart path.
pub(crate) const SETUP_RETRY_LIMIT: u32 = 10;

/// Timing knobs of the state machine. Production uses the defaults; unit
/// tests inject millisecond-scale values.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WorkerTimings {
    /// Pause between consecutive setup attempts
    pub setup_retry_delay: Duration,
    /// Minimum time since the last failure before a restart is attempted
    pub restart_cooldown: Duration,
    /// Poll granularity while waiting out the cooldown
    pub fail_poll: Duration,
}

impl Default for WorkerTimings {
    fn default() -> Self {
        Self {
            setup_retry_delay: Duration::from_secs(1),
            restart_cooldown: Duration::from_secs(5),
            fail_poll: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    BeforeSetup,
    Running,
    WaitAfterFail,
    ToRestart,
}

pub(crate) struct AppenderWorker {
    appender: Box<dyn Appender + Send>,
    queue: Arc<BoundedQueue<LogRecord>>,
    terminated: Arc<AtomicBool>,
    metrics: Arc<PipelineMetrics>,
    timings: WorkerTimings,
    state: WorkerState,
    setup_failures: u32,
    last_error_at: Option<Instant>,
}

impl AppenderWorker {
    pub(crate) fn new(
        appender: Box<dyn Appender + Send>,
        queue: Arc<BoundedQueue<LogRecord>>,
        terminated: Arc<AtomicBool>,
        metrics: Arc<PipelineMetrics>,
        timings: WorkerTimings,
    ) -> Self {
        Self {
            appender,
            queue,
            terminated,
            metrics,
            timings,
            state: WorkerState::BeforeSetup,
            setup_failures: 0,
            last_error_at: None,
        }
    }

    fn terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }

    /// A healthy worker drains outstanding records before exiting; a worker
    /// stuck in `WaitAfterFail` exits as soon as termination is requested,
    /// dropping whatever is still queued.
    pub(crate) fn run(mut self) {
        while !self.terminated() || !self.queue.is_empty() {
            match self.state {
                WorkerState::BeforeSetup => self.run_setup(),
                WorkerState::Running => self.run_consume(),
                WorkerState::WaitAfterFail => {
                    if self.terminated() {
                        let lost = self.queue.len();
                        if lost > 0 {
                            eprintln!(
                                "[FANLOG WARNING] appender '{}' terminated while failing; {} queued records lost",
                                self.appender.name(),
                                lost
                            );
                        }
                        break;
                    }
                    self.run_cooldown();
                }
                WorkerState::ToRestart => self.run_restart(),
            }
        }
        if let Err(err) = self.appender.teardown() {
            eprintln!(
                "[FANLOG ERROR] appender '{}' teardown failed: {}",
                self.appender.name(),
                err
            );
        }
    }

    fn run_setup(&mut self) {
        match self.appender.setup() {
            Ok(()) => {
                self.setup_failures = 0;
                self.state = WorkerState::Running;
            }
            Err(err) => {
                self.setup_failures += 1;
                eprintln!(
                    "[FANLOG ERROR] appender '{}' setup failed (attempt {}): {}",
                    self.appender.name(),
                    self.setup_failures,
                    err
                );
                if self.setup_failures >= SETUP_RETRY_LIMIT {
                    self.mark_failed();
                } else {
                    thread::sleep(self.timings.setup_retry_delay);
                }
            }
        }
    }

    fn run_consume(&mut self) {
        match self.queue.dequeue(self.queue.poll_interval()) {
            Dequeue::Signaled(record) => {
                // Panic isolation: a panicking sink is treated like a failed
                // write, it must not take the worker thread down.
                let appender = &mut self.appender;
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    appender.write(&record)
                }));
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        self.metrics.record_write_failure();
                        eprintln!(
                            "[FANLOG ERROR] appender '{}' write failed: {}",
                            self.appender.name(),
                            err
                        );
                        // the record that failed is lost; only the sink state
                        // is recovered
                        self.mark_failed();
                    }
                    Err(panic_info) => {
                        let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                            s.to_string()
                        } else if let Some(s) = panic_info.downcast_ref::<String>() {
                            s.clone()
                        } else {
                            "unknown panic".to_string()
                        };
                        self.metrics.record_write_failure();
                        eprintln!(
                            "[FANLOG CRITICAL] appender '{}' panicked during write: {}",
                            self.appender.name(),
                            panic_msg
                        );
                        self.mark_failed();
                    }
                }
            }
            Dequeue::Timeout | Dequeue::Shutdown => {}
        }
    }

    fn run_cooldown(&mut self) {
        thread::sleep(self.timings.fail_poll);
        let cooled = self
            .last_error_at
            .map_or(true, |at| at.elapsed() >= self.timings.restart_cooldown);
        if cooled {
            self.state = WorkerState::ToRestart;
        }
    }

    fn run_restart(&mut self) {
        if self.appender.try_restart() {
            self.metrics.record_restart();
            self.last_error_at = None;
            self.state = WorkerState::Running;
        } else {
            self.mark_failed();
        }
    }

    fn mark_failed(&mut self) {
        self.last_error_at = Some(Instant::now());
        self.state = WorkerState::WaitAfterFail;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{LoggerError, Result};
    use crate::core::level::LogLevel;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicU32;

    #[derive(Default)]
    struct SinkProbe {
        setup_calls: AtomicU32,
        write_calls: AtomicU32,
        restart_calls: AtomicU32,
        teardown_calls: AtomicU32,
        written: Mutex<Vec<String>>,
    }

    impl SinkProbe {
        fn setup_calls(&self) -> u32 {
            self.setup_calls.load(Ordering::Relaxed)
        }
        fn write_calls(&self) -> u32 {
            self.write_calls.load(Ordering::Relaxed)
        }
        fn restart_calls(&self) -> u32 {
            self.restart_calls.load(Ordering::Relaxed)
        }
        fn teardown_calls(&self) -> u32 {
            self.teardown_calls.load(Ordering::Relaxed)
        }
        fn written(&self) -> Vec<String> {
            self.written.lock().clone()
        }
    }

    struct TestSink {
        probe: Arc<SinkProbe>,
        level: LogLevel,
        fail_setup: bool,
        fail_writes_remaining: u32,
        fail_all_writes: bool,
        panic_writes_remaining: u32,
        restart_succeeds: bool,
    }

    impl TestSink {
        fn new(probe: Arc<SinkProbe>) -> Self {
            Self {
                probe,
                level: LogLevel::Debug,
                fail_setup: false,
                fail_writes_remaining: 0,
                fail_all_writes: false,
                panic_writes_remaining: 0,
                restart_succeeds: false,
            }
        }
    }

    impl Appender for TestSink {
        fn setup(&mut self) -> Result<()> {
            self.probe.setup_calls.fetch_add(1, Ordering::Relaxed);
            if self.fail_setup {
                Err(LoggerError::other("setup refused"))
            } else {
                Ok(())
            }
        }

        fn write(&mut self, record: &LogRecord) -> Result<()> {
            self.probe.write_calls.fetch_add(1, Ordering::Relaxed);
            if self.panic_writes_remaining > 0 {
                self.panic_writes_remaining -= 1;
                panic!("sink exploded");
            }
            if self.fail_writes_remaining > 0 {
                self.fail_writes_remaining -= 1;
                return Err(LoggerError::other("write refused"));
            }
            if self.fail_all_writes {
                return Err(LoggerError::other("write refused"));
            }
            self.probe.written.lock().push(record.message.clone());
            Ok(())
        }

        fn teardown(&mut self) -> Result<()> {
            self.probe.teardown_calls.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        fn try_restart(&mut self) -> bool {
            self.probe.restart_calls.fetch_add(1, Ordering::Relaxed);
            self.restart_succeeds
        }

        fn level(&self) -> LogLevel {
            self.level
        }

        fn set_level(&mut self, level: LogLevel) {
            self.level = level;
        }

        fn name(&self) -> &str {
            "probe"
        }
    }

    fn test_queue() -> Arc<BoundedQueue<LogRecord>> {
        Arc::new(BoundedQueue::new(16, Duration::from_millis(5)))
    }

    fn fast_timings() -> WorkerTimings {
        WorkerTimings {
            setup_retry_delay: Duration::from_millis(2),
            restart_cooldown: Duration::from_millis(40),
            fail_poll: Duration::from_millis(5),
        }
    }

    fn record(message: &str) -> LogRecord {
        LogRecord::new(LogLevel::Info, message, "test")
    }

    fn spawn_worker(
        sink: TestSink,
        queue: Arc<BoundedQueue<LogRecord>>,
        timings: WorkerTimings,
    ) -> (Arc<AtomicBool>, thread::JoinHandle<()>) {
        let terminated = Arc::new(AtomicBool::new(false));
        let worker = AppenderWorker::new(
            Box::new(sink),
            Arc::clone(&queue),
            Arc::clone(&terminated),
            Arc::new(PipelineMetrics::new()),
            timings,
        );
        (terminated, thread::spawn(move || worker.run()))
    }

    #[test]
    fn test_drains_queue_then_tears_down() {
        let probe = Arc::new(SinkProbe::default());
        let queue = test_queue();
        for i in 0..3 {
            queue.enqueue(record(&format!("m{}", i)));
        }
        let terminated = Arc::new(AtomicBool::new(true));
        queue.shutdown();
        let worker = AppenderWorker::new(
            Box::new(TestSink::new(Arc::clone(&probe))),
            Arc::clone(&queue),
            terminated,
            Arc::new(PipelineMetrics::new()),
            fast_timings(),
        );
        worker.run();

        assert_eq!(probe.written(), vec!["m0", "m1", "m2"]);
        assert_eq!(probe.teardown_calls(), 1);
    }

    #[test]
    fn test_setup_retries_stop_at_limit() {
        let probe = Arc::new(SinkProbe::default());
        let queue = test_queue();
        let mut sink = TestSink::new(Arc::clone(&probe));
        sink.fail_setup = true;
        // cooldown far in the future keeps the worker parked in WaitAfterFail
        let timings = WorkerTimings {
            restart_cooldown: Duration::from_secs(60),
            ..fast_timings()
        };
        let (terminated, handle) = spawn_worker(sink, Arc::clone(&queue), timings);

        thread::sleep(Duration::from_millis(150));
        assert_eq!(probe.setup_calls(), SETUP_RETRY_LIMIT);
        assert_eq!(probe.restart_calls(), 0);

        terminated.store(true, Ordering::Release);
        queue.shutdown();
        handle.join().unwrap();
        assert_eq!(probe.setup_calls(), SETUP_RETRY_LIMIT);
        assert_eq!(probe.teardown_calls(), 1);
    }

    #[test]
    fn test_restart_after_cooldown_resumes_consumption() {
        let probe = Arc::new(SinkProbe::default());
        let queue = test_queue();
        queue.enqueue(record("lost"));
        queue.enqueue(record("kept"));
        let mut sink = TestSink::new(Arc::clone(&probe));
        sink.fail_writes_remaining = 1;
        sink.restart_succeeds = true;
        let (terminated, handle) = spawn_worker(sink, Arc::clone(&queue), fast_timings());

        thread::sleep(Duration::from_millis(200));
        terminated.store(true, Ordering::Release);
        queue.shutdown();
        handle.join().unwrap();

        // the failing write consumed "lost"; the restart recovered "kept"
        assert_eq!(probe.restart_calls(), 1);
        assert_eq!(probe.write_calls(), 2);
        assert_eq!(probe.written(), vec!["kept"]);
        assert_eq!(probe.teardown_calls(), 1);
    }

    #[test]
    fn test_restart_paced_by_cooldown_window() {
        let probe = Arc::new(SinkProbe::default());
        let queue = test_queue();
        queue.enqueue(record("boom"));
        let mut sink = TestSink::new(Arc::clone(&probe));
        sink.fail_all_writes = true;
        let timings = WorkerTimings {
            restart_cooldown: Duration::from_millis(200),
            fail_poll: Duration::from_millis(10),
            ..fast_timings()
        };
        let (terminated, handle) = spawn_worker(sink, Arc::clone(&queue), timings);

        thread::sleep(Duration::from_millis(100));
        assert_eq!(probe.restart_calls(), 0, "restart before cooldown elapsed");
        thread::sleep(Duration::from_millis(250));
        let calls = probe.restart_calls();
        assert!(
            (1..=2).contains(&calls),
            "expected one restart per window, got {}",
            calls
        );

        terminated.store(true, Ordering::Release);
        queue.shutdown();
        handle.join().unwrap();
    }

    #[test]
    fn test_panicking_sink_does_not_kill_worker() {
        let probe = Arc::new(SinkProbe::default());
        let queue = test_queue();
        queue.enqueue(record("lost"));
        queue.enqueue(record("kept"));
        let mut sink = TestSink::new(Arc::clone(&probe));
        sink.panic_writes_remaining = 1;
        sink.restart_succeeds = true;
        let (terminated, handle) = spawn_worker(sink, Arc::clone(&queue), fast_timings());

        thread::sleep(Duration::from_millis(200));
        terminated.store(true, Ordering::Release);
        queue.shutdown();
        handle.join().expect("worker survived the sink panic");

        assert_eq!(probe.restart_calls(), 1);
        assert_eq!(probe.written(), vec!["kept"]);
        assert_eq!(probe.teardown_calls(), 1);
    }

    #[test]
    fn test_failing_worker_drops_queue_on_terminate() {
        let probe = Arc::new(SinkProbe::default());
        let queue = test_queue();
        for i in 0..3 {
            queue.enqueue(record(&format!("m{}", i)));
        }
        let mut sink = TestSink::new(Arc::clone(&probe));
        sink.fail_all_writes = true;
        let timings = WorkerTimings {
            restart_cooldown: Duration::from_secs(60),
            ..fast_timings()
        };
        let (terminated, handle) = spawn_worker(sink, Arc::clone(&queue), timings);

        thread::sleep(Duration::from_millis(50));
        terminated.store(true, Ordering::Release);
        queue.shutdown();
        handle.join().unwrap();

        // one write attempt failed; the two remaining records were dropped
        assert_eq!(probe.write_calls(), 1);
        assert_eq!(probe.written(), Vec::<String>::new());
        assert_eq!(probe.teardown_calls(), 1);
        assert_eq!(queue.len(), 2);
    }
}
