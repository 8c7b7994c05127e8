use thiserror::Error;

/// Boxed error type returned by job handlers.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// A recovered panic, normalized into a reportable error.
///
/// Carries the rendered panic message and the call stack captured at the
/// recovery boundary. Ordinary handler errors stay as they are and report
/// with an empty backtrace instead.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct WorkerError {
    message: String,
    backtrace: Vec<String>,
}

impl WorkerError {
    pub fn new(message: impl Into<String>, backtrace: Vec<String>) -> Self {
        WorkerError {
            message: message.into(),
            backtrace,
        }
    }

    pub fn backtrace(&self) -> &[String] {
        &self.backtrace
    }
}
