//! Buffered file sink

use crate::core::renderer::{Renderer, TextRenderer};
use crate::core::{Appender, LogLevel, LogRecord, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub struct FileAppender {
    path: PathBuf,
    renderer: Box<dyn Renderer + Send>,
    writer: Option<BufWriter<File>>,
    level: LogLevel,
}

impl FileAppender {
    /// The file is opened in `setup`, on the worker thread, not here.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            renderer: Box::new(TextRenderer::new()),
            writer: None,
            level: LogLevel::Debug,
        }
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer + Send>) -> Self {
        self.renderer = renderer;
        self
    }

    fn open(&mut self) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }
}

impl Appender for FileAppender {
    fn setup(&mut self) -> Result<()> {
        self.renderer.setup()?;
        self.open()
    }

    fn write(&mut self, record: &LogRecord) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::appender("file", "write", "file not opened"))?;

        let mut line = self.renderer.render(record);
        line.push('\n');
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        self.renderer.teardown()?;
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn try_restart(&mut self) -> bool {
        self.writer = None;
        self.open().is_ok()
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // covers drops that never went through teardown
        if let Some(ref mut writer) = self.writer {
            let _ = writer.flush();
        }
    }
}
