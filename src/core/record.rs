//! Log record value object

use crate::core::level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

// Thread-local cache for the producing thread's id, so record creation does
// not allocate a fresh id string on every call.
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

fn producing_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

/// One log event. Immutable after creation; cloned by the dispatcher once
/// per appender so per-appender lifetimes stay independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub tag: String,
    pub timestamp: DateTime<Utc>,
    pub thread_id: String,
}

impl LogRecord {
    /// Escapes newlines, carriage returns, and tabs so one record always
    /// renders as one line and a message cannot fake additional log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    /// Create a record, capturing the current wall-clock instant and the
    /// producing thread's id.
    pub fn new(level: LogLevel, message: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(&message.into()),
            tag: tag.into(),
            timestamp: Utc::now(),
            thread_id: producing_thread_id(),
        }
    }

    /// Fully-specified constructor. The message is taken as-is; callers own
    /// sanitization when building records this way.
    pub fn from_parts(
        level: LogLevel,
        message: impl Into<String>,
        tag: impl Into<String>,
        timestamp: DateTime<Utc>,
        thread_id: impl Into<String>,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            tag: tag.into(),
            timestamp,
            thread_id: thread_id.into(),
        }
    }

    pub fn level_as_string(&self) -> &'static str {
        self.level.as_str()
    }
}
