//! Core type definitions and record marker conventions.

use chunkstore_records::{Record, Selector};
use std::fmt;

/// Label carrying the correlation key shared by every segment record of one
/// object.
pub const KEY_LABEL: &str = "chunkstore.io/key";

/// Label carrying the correlation key shared by every record of one stream.
///
/// Distinct from [`KEY_LABEL`] so a stream and an object may share a key.
pub const STREAM_KEY_LABEL: &str = "chunkstore.io/stream";

/// Annotation carrying a segment record's position within its object.
pub const POSITION_ANNOTATION: &str = "chunkstore.io/position";

/// Annotation carrying the number of segments its object was split into.
pub const TOTAL_ANNOTATION: &str = "chunkstore.io/total";

/// Annotation carrying a stream record's sequence within its stream.
pub const SEQUENCE_ANNOTATION: &str = "chunkstore.io/sequence";

/// Sequence number ordering the records of a stream.
///
/// Assigned by the writing stream, never taken from the store, so read order
/// does not depend on listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    /// Creates a new sequence number.
    #[must_use]
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Returns the raw sequence value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next sequence number.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq:{}", self.0)
    }
}

/// Selects every segment record of the object `key` in `namespace`.
#[must_use]
pub fn key_selector(namespace: &str, key: &str) -> Selector {
    Selector::namespace(namespace).with_label(KEY_LABEL, key)
}

/// Selects every record of the stream `key` in `namespace`.
#[must_use]
pub fn stream_selector(namespace: &str, key: &str) -> Selector {
    Selector::namespace(namespace).with_label(STREAM_KEY_LABEL, key)
}

/// Reads a numeric marker annotation from a record.
#[must_use]
pub fn marker(record: &Record, annotation: &str) -> Option<u64> {
    record.annotation(annotation)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_number_next() {
        let s1 = SequenceNumber::new(5);
        let s2 = s1.next();
        assert_eq!(s2.as_u64(), 6);
        assert!(s1 < s2);
    }

    #[test]
    fn sequence_number_display() {
        assert_eq!(format!("{}", SequenceNumber::new(42)), "seq:42");
    }

    #[test]
    fn marker_parsing() {
        let record = Record::named("default", "a", vec![])
            .with_annotation(POSITION_ANNOTATION, "12")
            .with_annotation(SEQUENCE_ANNOTATION, "twelve");
        assert_eq!(marker(&record, POSITION_ANNOTATION), Some(12));
        assert_eq!(marker(&record, SEQUENCE_ANNOTATION), None);
        assert_eq!(marker(&record, "missing"), None);
    }

    #[test]
    fn key_selector_matches_only_its_key() {
        let record = Record::named("default", "a", vec![]).with_label(KEY_LABEL, "widgets/a");
        assert!(key_selector("default", "widgets/a").matches(&record));
        assert!(!key_selector("default", "widgets/b").matches(&record));
        assert!(!key_selector("other", "widgets/a").matches(&record));
    }

    #[test]
    fn stream_and_object_selectors_are_disjoint() {
        let segment = Record::named("default", "a", vec![]).with_label(KEY_LABEL, "shared");
        let chunk = Record::named("default", "b", vec![]).with_label(STREAM_KEY_LABEL, "shared");
        assert!(key_selector("default", "shared").matches(&segment));
        assert!(!key_selector("default", "shared").matches(&chunk));
        assert!(stream_selector("default", "shared").matches(&chunk));
        assert!(!stream_selector("default", "shared").matches(&segment));
    }
}
