//! Error types for record store operations.

use std::io;
use thiserror::Error;

/// Result type for record store operations.
pub type RecordResult<T> = Result<T, RecordError>;

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No record exists under the given name.
    #[error("record {namespace}/{name} not found")]
    NotFound {
        /// Namespace that was searched.
        namespace: String,
        /// Name of the missing record.
        name: String,
    },

    /// A record with the same name already exists.
    #[error("record {namespace}/{name} already exists")]
    AlreadyExists {
        /// Namespace of the conflicting record.
        namespace: String,
        /// Name of the conflicting record.
        name: String,
    },

    /// The record body exceeds the store's per-record capacity.
    #[error("record too large: {size} bytes exceeds limit of {max} bytes")]
    TooLarge {
        /// Size of the rejected body.
        size: usize,
        /// Maximum accepted body size.
        max: usize,
    },

    /// The record has neither a name nor a name prefix.
    #[error("record name or generate_name must be set")]
    MissingName,

    /// The calling context was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// The calling context's deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// A stored record could not be decoded.
    #[error("record corrupted: {0}")]
    Corrupted(String),

    /// A fault raised by a fault-injecting store.
    #[error("injected fault on {operation}")]
    Injected {
        /// The operation that was failed.
        operation: &'static str,
    },
}

impl RecordError {
    /// Creates a not found error.
    pub fn not_found(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Creates an already exists error.
    pub fn already_exists(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Returns whether this error reports a cancelled or expired context.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// Returns whether this error reports a missing record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_classification() {
        assert!(RecordError::Cancelled.is_cancelled());
        assert!(RecordError::DeadlineExceeded.is_cancelled());
        assert!(!RecordError::MissingName.is_cancelled());
    }

    #[test]
    fn not_found_display() {
        let err = RecordError::not_found("default", "segment-abcde");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "record default/segment-abcde not found");
    }
}
