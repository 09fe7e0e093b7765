//! Record rendering capability
//!
//! Appenders delegate line formatting to a renderer; the pipeline core never
//! inspects rendered output. Renderers run on the appender's worker thread.

use crate::core::error::Result;
use crate::core::record::LogRecord;

pub trait Renderer: Send {
    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        Ok(())
    }

    fn render(&self, record: &LogRecord) -> String;
}

/// Bracketed single-line text format:
/// `[2025-01-08 10:30:45.123] [WARNING] [ThreadId(2)] message [tag]`
pub struct TextRenderer {
    include_thread_id: bool,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            include_thread_id: true,
        }
    }

    #[must_use]
    pub fn with_thread_id(mut self, include: bool) -> Self {
        self.include_thread_id = include;
        self
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TextRenderer {
    fn render(&self, record: &LogRecord) -> String {
        let timestamp = record.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        if self.include_thread_id {
            format!(
                "[{}] [{:<7}] [{}] {} [{}]",
                timestamp,
                record.level.as_str(),
                record.thread_id,
                record.message,
                record.tag
            )
        } else {
            format!(
                "[{}] [{:<7}] {} [{}]",
                timestamp,
                record.level.as_str(),
                record.message,
                record.tag
            )
        }
    }
}

/// One JSON object per record.
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, record: &LogRecord) -> String {
        serde_json::to_string(record)
            .unwrap_or_else(|err| format!("{{\"render_error\":\"{}\"}}", err))
    }
}
