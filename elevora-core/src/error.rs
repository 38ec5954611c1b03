//! Error types for Elevora core.

use std::{error::Error, fmt, io};

/// Error type for Elevora core operations.
#[derive(Debug)]
pub enum AuditError {
    /// The document has no category scores to summarize.
    EmptyInput,
    /// An underlying I/O error.
    Io(io::Error),
    /// The document could not be parsed.
    Parse(serde_json::Error),
    /// A catch-all error with a message.
    Other(String),
}

impl AuditError {
    /// Whether this is the "no data to summarize" condition.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyInput)
    }
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "no data to summarize: audit has no category scores"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Parse(err) => write!(f, "invalid audit document: {err}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for AuditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::EmptyInput | Self::Other(_) => None,
        }
    }
}

impl From<io::Error> for AuditError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Convenience result type for Elevora core.
pub type Result<T> = std::result::Result<T, AuditError>;
