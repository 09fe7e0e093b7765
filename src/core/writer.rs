//! Producer-side façade
//!
//! `LogWriter` is the only type producers touch: it gates records on the
//! enabled flag and the computed minimum level, stamps them, and hands them
//! to the main queue. Everything downstream runs on the dispatcher and
//! worker threads it owns.

use crate::core::adapter::{AppenderAdapter, DEFAULT_APPENDER_QUEUE_SIZE};
use crate::core::appender::Appender;
use crate::core::bounded_queue::{BoundedQueue, Enqueue};
use crate::core::dispatcher::{Dispatcher, EventsHandler, DEFAULT_MAIN_QUEUE_SIZE};
use crate::core::error::{LoggerError, Result};
use crate::core::level::LogLevel;
use crate::core::metrics::PipelineMetrics;
use crate::core::record::LogRecord;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How long a dropped writer waits for the pipeline to drain. Call
/// `shutdown()` yourself to pick a different bound.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct LogWriter {
    enabled: AtomicBool,
    min_level: RwLock<LogLevel>,
    adapters: Arc<Mutex<Vec<AppenderAdapter>>>,
    appender_queue_capacity: usize,
    main_queue: Arc<BoundedQueue<LogRecord>>,
    terminated: Arc<AtomicBool>,
    dispatcher: Dispatcher,
    metrics: Arc<PipelineMetrics>,
}

impl LogWriter {
    /// Build a writer from parallel appender and level lists, assigning each
    /// appender its filter level. The lists must have equal length.
    pub fn with_appenders(
        appenders: Vec<Box<dyn Appender + Send>>,
        levels: Vec<LogLevel>,
        events_handler: Option<Arc<dyn EventsHandler>>,
    ) -> Result<Self> {
        if appenders.len() != levels.len() {
            return Err(LoggerError::config(
                "LogWriter",
                format!("{} appenders but {} levels", appenders.len(), levels.len()),
            ));
        }
        let mut builder = LogWriterBuilder::new();
        for (appender, level) in appenders.into_iter().zip(levels) {
            builder = builder.boxed_appender_with_level(appender, level);
        }
        if let Some(handler) = events_handler {
            builder = builder.events_handler(handler);
        }
        Ok(builder.build())
    }

    #[must_use]
    pub fn builder() -> LogWriterBuilder {
        LogWriterBuilder::new()
    }

    /// Create a record and hand it to the main queue.
    ///
    /// Records below the computed minimum level (nothing downstream would
    /// accept them) and records logged while disabled are silently ignored.
    /// A full main queue rejects after at most its poll interval.
    pub fn log(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        tag: impl Into<String>,
    ) -> Result<()> {
        if self.terminated.load(Ordering::Acquire) {
            return Err(LoggerError::Stopped);
        }
        if !self.enabled.load(Ordering::Relaxed) || level < *self.min_level.read() {
            return Ok(());
        }
        let record = LogRecord::new(level, message, tag);
        match self.main_queue.enqueue(record) {
            Enqueue::Accepted => {
                self.metrics.record_accepted();
                Ok(())
            }
            Enqueue::Rejected => {
                self.metrics.record_rejected();
                Err(LoggerError::MainQueueFull {
                    capacity: self.main_queue.capacity(),
                })
            }
        }
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>, tag: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, message, tag)
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>, tag: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, message, tag)
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>, tag: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warning, message, tag)
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>, tag: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Error, message, tag)
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>, tag: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Fatal, message, tag)
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Minimum of the per-appender levels; `Fatal` when no appenders are
    /// registered. Records below it are rejected at the producer because no
    /// sink could consume them.
    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    /// Register an appender at runtime. Its worker starts immediately and
    /// it receives records from the next dispatch on.
    pub fn add_appender(&self, appender: Box<dyn Appender + Send>) {
        let adapter = AppenderAdapter::start(
            appender,
            self.appender_queue_capacity,
            Arc::clone(&self.metrics),
        );
        self.adapters.lock().push(adapter);
        self.recompute_min_level();
    }

    /// Remove the first appender with the given name. The removed adapter
    /// is torn down: its queue is drained by a healthy worker (or dropped by
    /// a failing one), the worker is joined, and `teardown` runs.
    pub fn del_appender(&self, name: &str) -> bool {
        let removed = {
            let mut adapters = self.adapters.lock();
            adapters
                .iter()
                .position(|adapter| adapter.name() == name)
                .map(|index| adapters.remove(index))
        };
        match removed {
            Some(adapter) => {
                drop(adapter);
                self.recompute_min_level();
                true
            }
            None => false,
        }
    }

    pub fn appenders_count(&self) -> usize {
        self.adapters.lock().len()
    }

    /// Snapshot of the registered appender names, taken under a short lock.
    pub fn appender_names(&self) -> Vec<String> {
        self.adapters
            .lock()
            .iter()
            .map(|adapter| adapter.name().to_string())
            .collect()
    }

    /// Snapshot of the pipeline counters.
    pub fn metrics(&self) -> PipelineMetrics {
        self.metrics.as_ref().clone()
    }

    /// Gracefully shut the pipeline down: the dispatcher drains the main
    /// queue, then tears every adapter down (each drains its own queue and
    /// runs `teardown`). Returns `false` if that does not finish within
    /// `timeout`: a sink stuck in `write` cannot be cancelled, only
    /// abandoned.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        self.dispatcher.shutdown(timeout)
    }

    fn recompute_min_level(&self) {
        let min = self
            .adapters
            .lock()
            .iter()
            .map(|adapter| adapter.level())
            .min()
            .unwrap_or(LogLevel::Fatal);
        *self.min_level.write() = min;
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        if !self.dispatcher.shutdown(DEFAULT_SHUTDOWN_TIMEOUT) {
            eprintln!("[FANLOG WARNING] log writer dropped before the pipeline finished draining");
        }
        let rejected = self.metrics.rejected();
        if rejected > 0 {
            eprintln!(
                "[FANLOG WARNING] log writer shutting down with {} rejected records",
                rejected
            );
        }
    }
}

/// Assembles a `LogWriter` step by step
///
/// # Example
/// ```no_run
/// use fanlog::prelude::*;
///
/// let writer = LogWriter::builder()
///     .appender_with_level(ConsoleAppender::new(), LogLevel::Info)
///     .appender_with_level(FileAppender::new("app.log"), LogLevel::Warning)
///     .build();
/// ```
pub struct LogWriterBuilder {
    appenders: Vec<(Box<dyn Appender + Send>, Option<LogLevel>)>,
    events_handler: Option<Arc<dyn EventsHandler>>,
    main_queue_capacity: usize,
    appender_queue_capacity: usize,
}

impl LogWriterBuilder {
    pub fn new() -> Self {
        Self {
            appenders: Vec::new(),
            events_handler: None,
            main_queue_capacity: DEFAULT_MAIN_QUEUE_SIZE,
            appender_queue_capacity: DEFAULT_APPENDER_QUEUE_SIZE,
        }
    }

    /// Add an appender, keeping the level it already carries.
    #[must_use]
    pub fn appender<A: Appender + Send + 'static>(mut self, appender: A) -> Self {
        self.appenders.push((Box::new(appender), None));
        self
    }

    /// Add an appender and assign its filter level.
    #[must_use]
    pub fn appender_with_level<A: Appender + Send + 'static>(
        mut self,
        appender: A,
        level: LogLevel,
    ) -> Self {
        self.appenders.push((Box::new(appender), Some(level)));
        self
    }

    #[must_use]
    pub fn boxed_appender_with_level(
        mut self,
        appender: Box<dyn Appender + Send>,
        level: LogLevel,
    ) -> Self {
        self.appenders.push((appender, Some(level)));
        self
    }

    /// Install the overflow events handler.
    #[must_use]
    pub fn events_handler(mut self, handler: Arc<dyn EventsHandler>) -> Self {
        self.events_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn main_queue_capacity(mut self, capacity: usize) -> Self {
        self.main_queue_capacity = capacity;
        self
    }

    #[must_use]
    pub fn appender_queue_capacity(mut self, capacity: usize) -> Self {
        self.appender_queue_capacity = capacity;
        self
    }

    /// Start the worker threads and the dispatcher, and hand back the
    /// running writer.
    pub fn build(self) -> LogWriter {
        let metrics = Arc::new(PipelineMetrics::new());
        let mut adapters = Vec::with_capacity(self.appenders.len());
        for (mut appender, level) in self.appenders {
            if let Some(level) = level {
                appender.set_level(level);
            }
            adapters.push(AppenderAdapter::start(
                appender,
                self.appender_queue_capacity,
                Arc::clone(&metrics),
            ));
        }
        let min_level = adapters
            .iter()
            .map(|adapter| adapter.level())
            .min()
            .unwrap_or(LogLevel::Fatal);
        let adapters = Arc::new(Mutex::new(adapters));
        let dispatcher = Dispatcher::start(
            self.main_queue_capacity,
            Arc::clone(&adapters),
            self.events_handler,
            Arc::clone(&metrics),
        );
        LogWriter {
            enabled: AtomicBool::new(true),
            min_level: RwLock::new(min_level),
            adapters,
            appender_queue_capacity: self.appender_queue_capacity,
            main_queue: Arc::clone(dispatcher.main_queue()),
            terminated: Arc::clone(dispatcher.terminated_flag()),
            dispatcher,
            metrics,
        }
    }
}

impl Default for LogWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
