//! # chunkstore codec
//!
//! Splits serialized values into ordered, size-bounded segments and joins
//! them back.
//!
//! This crate is pure data transformation; it knows nothing about record
//! stores. It guarantees:
//! - Every segment but the last holds exactly `segment_size` bytes
//! - Segments are self-framing CBOR items, decodable without a count
//! - Joining accepts any delivery order
//! - Joining rejects duplicated positions and gaps instead of guessing
//!
//! ## Usage
//!
//! ```
//! use chunkstore_codec::{join_segments, SegmentCodec};
//!
//! let codec = SegmentCodec::new(3).unwrap();
//! let mut segments = codec.partition(b"Hello, world!").unwrap();
//! segments.reverse();
//!
//! let joined = join_segments(segments.into_iter().map(Ok)).unwrap();
//! assert_eq!(joined, b"Hello, world!");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod error;
mod segment;
mod wire;

pub use codec::{decode_value, encode_value, SegmentCodec, DEFAULT_SEGMENT_SIZE};
pub use error::{CodecError, CodecResult};
pub use segment::{join_segments, join_segments_with_total, Segment, SegmentSet, MAX_SEGMENTS};
pub use wire::{SegmentReader, SegmentWriter};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn split_join_roundtrip(
            data in prop::collection::vec(any::<u8>(), 1..2048),
            size in 1usize..300,
        ) {
            let codec = SegmentCodec::new(size).unwrap();
            let mut wire = Vec::new();
            let count = codec.split_bytes(&data, &mut wire).unwrap();
            prop_assert_eq!(count, codec.segment_count(data.len()));
            prop_assert_eq!(codec.join_bytes(wire.as_slice()).unwrap(), data);
        }

        #[test]
        fn segments_respect_size_bound(
            data in prop::collection::vec(any::<u8>(), 1..1024),
            size in 1usize..100,
        ) {
            let segments = SegmentCodec::new(size).unwrap().partition(&data).unwrap();
            let (last, rest) = segments.split_last().unwrap();
            prop_assert!(rest.iter().all(|s| s.data.len() == size));
            prop_assert!(!last.data.is_empty() && last.data.len() <= size);
        }
    }
}
