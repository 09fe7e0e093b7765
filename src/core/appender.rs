//! Appender capability consumed by the pipeline

use crate::core::error::Result;
use crate::core::level::LogLevel;
use crate::core::record::LogRecord;

/// Contract a log sink implements to participate in the pipeline.
///
/// Thread affinity: after construction an appender is accessed by exactly
/// one worker thread, so implementations need no internal locking.
///
/// Any method may fail; the worker state machine classifies failures and
/// drives setup retries, cooldown, and restart attempts. `teardown` runs on
/// every worker exit path.
pub trait Appender: Send {
    fn setup(&mut self) -> Result<()>;

    fn write(&mut self, record: &LogRecord) -> Result<()>;

    fn teardown(&mut self) -> Result<()>;

    /// Attempted after the failure cooldown. Returning `true` puts the
    /// worker back into its running state.
    fn try_restart(&mut self) -> bool {
        false
    }

    /// Minimum level this appender accepts; records below it are never
    /// enqueued for this sink.
    fn level(&self) -> LogLevel;

    fn set_level(&mut self, level: LogLevel);

    /// Stable name reported to the events handler on overflow.
    fn name(&self) -> &str;
}
