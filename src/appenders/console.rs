//! Colored console sink

use crate::core::{Appender, LogLevel, LogRecord, Result};
use colored::Colorize;

pub struct ConsoleAppender {
    use_colors: bool,
    level: LogLevel,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            level: LogLevel::Debug,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            level: LogLevel::Debug,
        }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    fn write(&mut self, record: &LogRecord) -> Result<()> {
        use std::io::Write;

        let mut level = format!("{:<7}", record.level.as_str());
        if self.use_colors {
            level = level.color(record.level.color_code()).to_string();
        }
        let line = format!(
            "[{}] [{}] [{}] {} [{}]",
            record.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            record.thread_id,
            record.message,
            record.tag
        );

        // Error and Fatal land on stderr
        if record.level >= LogLevel::Error {
            writeln!(std::io::stderr(), "{}", line)?;
        } else {
            writeln!(std::io::stdout(), "{}", line)?;
        }
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        use std::io::Write;
        // either stream may still hold buffered output
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn try_restart(&mut self) -> bool {
        // no state to rebuild
        true
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn name(&self) -> &str {
        "console"
    }
}
