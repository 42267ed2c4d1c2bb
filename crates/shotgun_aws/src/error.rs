use std::fmt;

use shotgun_core::message::SchemaError;

/// A failed network call (listing, send, receive, delete, attribute
/// query, task list, or task launch). Propagated to the immediate caller
/// with no internal retry; retry policy belongs to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    operation: &'static str,
    message: String,
}

impl TransportError {
    pub fn new(operation: &'static str, source: impl fmt::Display) -> Self {
        Self {
            operation,
            message: source.to_string(),
        }
    }

    pub fn operation(&self) -> &str {
        self.operation
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.message)
    }
}

impl std::error::Error for TransportError {}

/// Failure classification for the replicator worker loop. Every variant
/// is fatal to the worker process; the host translates it into a
/// non-zero exit status at the outermost boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    Transport(TransportError),
    Schema(SchemaError),
    Copy(String),
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::Transport(error) => error.fmt(f),
            WorkerError::Schema(error) => write!(f, "malformed queue message: {error}"),
            WorkerError::Copy(message) => write!(f, "copy operation failed: {message}"),
        }
    }
}

impl std::error::Error for WorkerError {}

impl From<TransportError> for WorkerError {
    fn from(error: TransportError) -> Self {
        WorkerError::Transport(error)
    }
}

impl From<SchemaError> for WorkerError {
    fn from(error: SchemaError) -> Self {
        WorkerError::Schema(error)
    }
}
