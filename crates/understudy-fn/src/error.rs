//! Errors raised by mocked callables.

use serde_json::Value;
use thiserror::Error;

/// Error produced by an [`Implementation`](crate::Implementation).
///
/// A mocked callable has no exceptions to throw; it returns this instead and
/// callers propagate it with `?`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("{0}")]
    Thrown(String),
}

impl CallError {
    pub fn thrown(message: impl Into<String>) -> Self { Self::Thrown(message.into()) }
}

pub type CallResult = std::result::Result<Value, CallError>;
