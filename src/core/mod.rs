//! Pipeline building blocks

pub mod appender;
pub mod bounded_queue;
pub mod dispatcher;
pub mod error;
pub mod layout;
pub mod level;
pub mod metrics;
pub mod record;
pub mod renderer;
pub mod writer;

pub(crate) mod adapter;
pub(crate) mod worker;

pub use adapter::DEFAULT_APPENDER_QUEUE_SIZE;
pub use appender::Appender;
pub use bounded_queue::{BoundedQueue, Dequeue, Enqueue};
pub use dispatcher::{EventsHandler, OverflowAction, OverflowReason, DEFAULT_MAIN_QUEUE_SIZE};
pub use error::{LoggerError, Result};
pub use layout::to_positional_layout;
pub use level::LogLevel;
pub use metrics::PipelineMetrics;
pub use record::LogRecord;
pub use renderer::{JsonRenderer, Renderer, TextRenderer};
pub use writer::{LogWriter, LogWriterBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
