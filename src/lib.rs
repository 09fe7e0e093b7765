//! # fanlog
//!
//! An asynchronous, multi-sink logging pipeline. Producer threads hand
//! records to a single dispatcher through a bounded main queue; the
//! dispatcher fans each record out to per-appender worker threads, each
//! with its own bounded queue and failure/restart lifecycle.
//!
//! ## Features
//!
//! - **Never blocks the producer**: `log` waits at most the main queue's
//!   poll interval, then fails with `MainQueueFull`
//! - **One thread per appender**: a slow or failing sink cannot stall the
//!   others
//! - **Policy-driven overflow**: a full appender queue consults the events
//!   handler, which picks `SkipNewest` or `DiscardOlder`
//! - **Clean shutdown**: in-flight records are drained without deadlocking
//!   on a broken sink

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender};
    pub use crate::core::{
        Appender, EventsHandler, JsonRenderer, LogLevel, LogRecord, LogWriter, LogWriterBuilder,
        LoggerError, OverflowAction, OverflowReason, PipelineMetrics, Renderer, Result,
        TextRenderer, DEFAULT_APPENDER_QUEUE_SIZE, DEFAULT_MAIN_QUEUE_SIZE,
        DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender};
pub use crate::core::{
    Appender, BoundedQueue, Dequeue, Enqueue, EventsHandler, JsonRenderer, LogLevel, LogRecord,
    LogWriter, LogWriterBuilder, LoggerError, OverflowAction, OverflowReason, PipelineMetrics,
    Renderer, Result, TextRenderer, DEFAULT_APPENDER_QUEUE_SIZE, DEFAULT_MAIN_QUEUE_SIZE,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
