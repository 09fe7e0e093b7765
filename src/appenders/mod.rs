//! Concrete sinks shipped with the pipeline

pub mod console;
pub mod file;
pub mod memory;

pub use console::ConsoleAppender;
pub use file::FileAppender;
pub use memory::MemoryAppender;

// Re-export the capability trait next to its implementations
pub use crate::core::Appender;
