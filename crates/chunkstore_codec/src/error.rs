//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while splitting or joining segments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to serialize a value.
    #[error("encoding failed: {message}")]
    Encode {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to deserialize the joined bytes into the target type.
    #[error("decoding failed: {message}")]
    Decode {
        /// Description of the decoding error.
        message: String,
    },

    /// Failed to decode one segment from the segment source.
    #[error("failed to read segment: {message}")]
    Read {
        /// Description of the read error.
        message: String,
    },

    /// Failed to write a segment to the sink.
    #[error("failed to write segment {position}: {message}")]
    Write {
        /// Position of the segment being written.
        position: u64,
        /// Description of the write error.
        message: String,
    },

    /// The same position was delivered twice.
    #[error("duplicate segment at position {position}")]
    DuplicateSegment {
        /// The repeated position.
        position: u64,
    },

    /// A position below the highest one seen was never delivered.
    #[error("incomplete segment stream: position {missing} of {len} missing")]
    IncompleteStream {
        /// The first missing position.
        missing: u64,
        /// Number of slots implied by the highest position seen, or the
        /// expected total when one is known.
        len: u64,
    },

    /// A position lies at or past the number of segments expected.
    #[error("segment position {position} outside expected total of {total}")]
    PositionOutOfRange {
        /// The offending position.
        position: u64,
        /// Number of segments expected.
        total: u64,
    },

    /// The segment source held no segments.
    #[error("no segments to join")]
    NothingToJoin,

    /// A segment size of zero was configured.
    #[error("segment size must be at least 1 byte")]
    InvalidSegmentSize,
}

impl CodecError {
    /// Create an encoding error.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Create a decoding error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a segment read error.
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    /// Returns whether this error reports a bad segment set (duplicate,
    /// missing, or no segments) rather than an encoding problem.
    #[must_use]
    pub fn is_reconstruction(&self) -> bool {
        matches!(
            self,
            Self::DuplicateSegment { .. }
                | Self::IncompleteStream { .. }
                | Self::PositionOutOfRange { .. }
                | Self::NothingToJoin
        )
    }

    /// Returns whether the segment set may still be completed by a write
    /// in progress.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::IncompleteStream { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstruction_classification() {
        assert!(CodecError::DuplicateSegment { position: 3 }.is_reconstruction());
        assert!(CodecError::NothingToJoin.is_reconstruction());
        assert!(CodecError::PositionOutOfRange { position: 3, total: 3 }.is_reconstruction());
        assert!(CodecError::IncompleteStream { missing: 1, len: 4 }.is_incomplete());
        assert!(!CodecError::encode("boom").is_reconstruction());
        assert!(!CodecError::DuplicateSegment { position: 0 }.is_incomplete());
    }

    #[test]
    fn messages_name_the_position() {
        let err = CodecError::DuplicateSegment { position: 7 };
        assert_eq!(err.to_string(), "duplicate segment at position 7");
        let err = CodecError::IncompleteStream { missing: 2, len: 5 };
        assert_eq!(
            err.to_string(),
            "incomplete segment stream: position 2 of 5 missing"
        );
    }
}
