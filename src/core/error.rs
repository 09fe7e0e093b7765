//! Failure values surfaced by the pipeline

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// The main queue rejected a record; the producer decides how to react.
    #[error("main queue full: {capacity} records buffered")]
    MainQueueFull { capacity: usize },

    /// The writer has been shut down and no longer accepts records.
    #[error("log writer already stopped")]
    Stopped,

    /// Build- or parse-time misconfiguration.
    #[error("invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// An appender operation failed; absorbed by the worker state machine.
    #[error("appender '{appender}' failed while {operation}: {message}")]
    AppenderFailure {
        appender: String,
        operation: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn appender(
        appender: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LoggerError::AppenderFailure {
            appender: appender.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
