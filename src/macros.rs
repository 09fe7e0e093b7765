//! Formatting sugar over [`LogWriter::log`](crate::LogWriter::log).
//!
//! Each macro takes the writer, the record tag, and `format!`-style
//! arguments, and hands the rendered message to the writer at the matching
//! level.
//!
//! # Examples
//!
//! ```no_run
//! use fanlog::prelude::*;
//! use fanlog::info;
//!
//! let writer = LogWriter::builder()
//!     .appender_with_level(ConsoleAppender::new(), LogLevel::Debug)
//!     .build();
//!
//! let _ = info!(writer, "boot", "Server started");
//!
//! let port = 4100;
//! let _ = info!(writer, "net", "listening on {}", port);
//! ```

/// Format a message and hand it to the writer at an explicit level.
///
/// Evaluates to the writer's `Result`, so callers can observe
/// `MainQueueFull`.
///
/// ```no_run
/// # use fanlog::prelude::*;
/// # let writer = LogWriter::builder().build();
/// use fanlog::log;
/// let _ = log!(writer, LogLevel::Error, "http", "error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($writer:expr, $level:expr, $tag:expr, $($arg:tt)+) => {
        $writer.log($level, format!($($arg)+), $tag)
    };
}

/// [`log!`] at `Debug`.
#[macro_export]
macro_rules! debug {
    ($writer:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Debug, $tag, $($arg)+)
    };
}

/// [`log!`] at `Info`.
#[macro_export]
macro_rules! info {
    ($writer:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Info, $tag, $($arg)+)
    };
}

/// [`log!`] at `Warning`.
#[macro_export]
macro_rules! warn {
    ($writer:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Warning, $tag, $($arg)+)
    };
}

/// [`log!`] at `Error`.
#[macro_export]
macro_rules! error {
    ($writer:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Error, $tag, $($arg)+)
    };
}

/// [`log!`] at `Fatal`.
#[macro_export]
macro_rules! fatal {
    ($writer:expr, $tag:expr, $($arg:tt)+) => {
        $crate::log!($writer, $crate::LogLevel::Fatal, $tag, $($arg)+)
    };
}
