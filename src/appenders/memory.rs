//! In-memory appender
//!
//! Captures records into a shared vector. Mainly a test and demo sink, but
//! also useful as a ring-0 capture target when wiring a new pipeline up.

use crate::core::{Appender, LogLevel, LogRecord, Result};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct MemoryAppender {
    records: Arc<Mutex<Vec<LogRecord>>>,
    level: LogLevel,
    name: String,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::with_name("memory")
    }

    /// A custom name distinguishes instances when several are registered.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            level: LogLevel::Debug,
            name: name.into(),
        }
    }

    /// Handle to the captured records; stays valid after the appender moves
    /// onto its worker thread.
    pub fn records(&self) -> Arc<Mutex<Vec<LogRecord>>> {
        Arc::clone(&self.records)
    }
}

impl Default for MemoryAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for MemoryAppender {
    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    fn write(&mut self, record: &LogRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        Ok(())
    }

    fn try_restart(&mut self) -> bool {
        true
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn name(&self) -> &str {
        &self.name
    }
}
