//! Object store configuration.

use chunkstore_codec::DEFAULT_SEGMENT_SIZE;

/// Configuration for a [`crate::ChunkedObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Namespace every segment record is created in.
    pub namespace: String,

    /// Maximum bytes of serialized object per segment record.
    pub segment_size: usize,

    /// Prefix for generated segment record names.
    pub record_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            segment_size: DEFAULT_SEGMENT_SIZE, // 512 KiB
            record_prefix: "segment-".to_string(),
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the segment size.
    #[must_use]
    pub const fn segment_size(mut self, size: usize) -> Self {
        self.segment_size = size;
        self
    }

    /// Sets the prefix for generated record names.
    #[must_use]
    pub fn record_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.record_prefix = prefix.into();
        self
    }
}
