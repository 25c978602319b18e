//! Error types for chunkstore core.

use chunkstore_codec::CodecError;
use chunkstore_records::RecordError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Coarse classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Serializing or deserializing the logical value failed.
    Encoding,
    /// The stored segment set is duplicated, incomplete, or empty.
    Reconstruction,
    /// A record store call failed.
    Backend,
    /// The calling context was cancelled or its deadline passed.
    Cancelled,
    /// A precondition failed or the object already exists.
    Conflict,
    /// Nothing is stored under the key.
    NotFound,
    /// The operation is not implemented by this store.
    Unsupported,
}

/// Errors that can occur in chunkstore core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Record store error.
    #[error("record store error: {0}")]
    Records(#[from] RecordError),

    /// Segment codec error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The object to create already carries a version.
    #[error("resourceVersion should not be set on objects to be created")]
    VersionSet,

    /// An object is already stored under the key.
    #[error("resource {key} already exists")]
    AlreadyExists {
        /// The conflicting key.
        key: String,
    },

    /// No records are stored under the key.
    #[error("resource {key} not found")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// The records under a key do not form a valid segment set.
    #[error("stored segments of {key} are corrupted: {source}")]
    Corrupted {
        /// The key whose records are corrupted.
        key: String,
        /// The reconstruction failure.
        #[source]
        source: CodecError,
    },

    /// A record lacks the marker that orders it within its set.
    #[error("record {record} of {key} has no valid {marker} marker")]
    MissingMarker {
        /// The correlation key.
        key: String,
        /// Name of the offending record.
        record: String,
        /// Name of the missing marker.
        marker: &'static str,
    },

    /// Records of one object disagree on how many segments it has.
    #[error("record {record} of {key} declares {found} segments, expected {expected}")]
    InconsistentTotal {
        /// The correlation key.
        key: String,
        /// Name of the offending record.
        record: String,
        /// Total declared by the first record listed.
        expected: u64,
        /// Total declared by the offending record.
        found: u64,
    },

    /// Splitting the object produced no segments.
    #[error("failed to partition {key}")]
    PartitionFailed {
        /// The key being created.
        key: String,
    },

    /// Creating one segment record failed; earlier segments were rolled back.
    #[error("failed to create segment {position} of {total} for {key}: {source}")]
    CreateFailed {
        /// The key being created.
        key: String,
        /// Position of the segment whose create failed.
        position: u64,
        /// Total number of segments.
        total: u64,
        /// The triggering record store error.
        #[source]
        source: RecordError,
        /// Names of created records the rollback could not delete.
        unreclaimed: Vec<String>,
    },

    /// A stream write was given no bytes.
    #[error("no bytes to write")]
    NothingToWrite,

    /// A stream has no records.
    #[error("no elements of stream {key} found")]
    StreamEmpty {
        /// The stream's correlation key.
        key: String,
    },

    /// The operation is not implemented by this store.
    #[error("unsupported operation: {operation}")]
    Unsupported {
        /// Name of the operation.
        operation: &'static str,
    },
}

impl CoreError {
    /// Creates an unsupported operation error.
    pub fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    /// Classifies this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Records(e) | Self::CreateFailed { source: e, .. } => {
                if e.is_cancelled() {
                    ErrorKind::Cancelled
                } else {
                    ErrorKind::Backend
                }
            }
            Self::Codec(e) if e.is_reconstruction() => ErrorKind::Reconstruction,
            Self::Codec(_) | Self::PartitionFailed { .. } => ErrorKind::Encoding,
            Self::Corrupted { .. }
            | Self::MissingMarker { .. }
            | Self::InconsistentTotal { .. }
            | Self::StreamEmpty { .. } => ErrorKind::Reconstruction,
            Self::VersionSet | Self::AlreadyExists { .. } | Self::NothingToWrite => {
                ErrorKind::Conflict
            }
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }

    /// Returns whether the failure reports cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }

    /// Returns whether the failure may resolve on its own, such as a segment
    /// set that a concurrent create has not finished writing.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Corrupted { source, .. } => source.is_incomplete(),
            Self::Codec(e) => e.is_incomplete(),
            _ => false,
        }
    }
}
