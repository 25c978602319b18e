//! The segment codec: split values into segments and join them back.

use crate::error::{CodecError, CodecResult};
use crate::segment::{join_segments, Segment, MAX_SEGMENTS};
use crate::wire::{SegmentReader, SegmentWriter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};
use std::num::NonZeroUsize;

/// Default segment size (512 KiB), leaving headroom under a 1 MiB record cap.
pub const DEFAULT_SEGMENT_SIZE: usize = 512 * 1024;

/// Serialize a value to CBOR bytes.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode_value<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
    let mut bytes = Vec::new();
    ciborium::into_writer(value, &mut bytes).map_err(|e| CodecError::encode(e.to_string()))?;
    Ok(bytes)
}

/// Deserialize a value from CBOR bytes.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if the bytes do not hold a `T`.
pub fn decode_value<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    ciborium::from_reader(bytes).map_err(|e| CodecError::decode(e.to_string()))
}

/// Splits serialized values into fixed-size segments and joins them back.
///
/// Every segment holds exactly `segment_size` bytes except the last, which
/// holds the remainder. Positions are assigned `0, 1, 2, ...` in byte order.
///
/// # Example
///
/// ```rust
/// use chunkstore_codec::SegmentCodec;
///
/// let codec = SegmentCodec::new(3).unwrap();
/// let mut wire = Vec::new();
/// assert_eq!(codec.split_bytes(b"Hello, world!", &mut wire).unwrap(), 5);
/// assert_eq!(codec.join_bytes(wire.as_slice()).unwrap(), b"Hello, world!");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentCodec {
    segment_size: NonZeroUsize,
}

impl Default for SegmentCodec {
    fn default() -> Self {
        Self {
            segment_size: NonZeroUsize::new(DEFAULT_SEGMENT_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl SegmentCodec {
    /// Creates a codec with the given segment size.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidSegmentSize`] if `segment_size` is zero.
    pub fn new(segment_size: usize) -> CodecResult<Self> {
        NonZeroUsize::new(segment_size)
            .map(|segment_size| Self { segment_size })
            .ok_or(CodecError::InvalidSegmentSize)
    }

    /// Returns the configured segment size.
    #[must_use]
    pub fn segment_size(&self) -> usize {
        self.segment_size.get()
    }

    /// Number of segments `len` bytes split into.
    #[must_use]
    pub fn segment_count(&self, len: usize) -> usize {
        len.div_ceil(self.segment_size.get())
    }

    /// Partitions `data` into ordered segments. Empty input yields none.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if `data` would need more than
    /// [`MAX_SEGMENTS`] segments.
    pub fn partition(&self, data: &[u8]) -> CodecResult<Vec<Segment>> {
        let count = self.segment_count(data.len());
        if count as u64 > MAX_SEGMENTS {
            return Err(CodecError::encode(format!(
                "{} bytes need {count} segments, limit is {MAX_SEGMENTS}",
                data.len()
            )));
        }
        Ok(data
            .chunks(self.segment_size.get())
            .enumerate()
            .map(|(position, chunk)| Segment::new(position as u64, chunk.to_vec()))
            .collect())
    }

    /// Partitions `data` and writes every segment, in position order, to
    /// `sink` in the segment wire format.
    ///
    /// Returns the number of segments written; empty input writes nothing.
    /// On error, partially written output is the caller's to discard.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Write`] if the sink fails.
    pub fn split_bytes<W: Write>(&self, data: &[u8], sink: W) -> CodecResult<usize> {
        let mut writer = SegmentWriter::new(sink);
        for segment in self.partition(data)? {
            writer.write(&segment)?;
        }
        let written = writer.written();
        writer.finish()?;
        Ok(written)
    }

    /// Serializes `value` and splits the bytes into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if serialization fails and
    /// [`CodecError::Write`] if the sink fails.
    pub fn split<T: Serialize + ?Sized, W: Write>(&self, value: &T, sink: W) -> CodecResult<usize> {
        self.split_bytes(&encode_value(value)?, sink)
    }

    /// Decodes segments from `source` until it is exhausted and joins them,
    /// in any delivery order, into the original bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Read`] for a malformed segment,
    /// [`CodecError::DuplicateSegment`], [`CodecError::IncompleteStream`],
    /// or [`CodecError::NothingToJoin`].
    pub fn join_bytes<R: Read>(&self, source: R) -> CodecResult<Vec<u8>> {
        join_segments(SegmentReader::new(source))
    }

    /// Joins segments from `source` and deserializes the result.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`SegmentCodec::join_bytes`] and
    /// [`CodecError::Decode`].
    pub fn join<T: DeserializeOwned, R: Read>(&self, source: R) -> CodecResult<T> {
        decode_value(&self.join_bytes(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Widget {
        name: String,
        sizes: Vec<u32>,
    }

    #[test]
    fn zero_segment_size_is_rejected() {
        assert_eq!(SegmentCodec::new(0).unwrap_err(), CodecError::InvalidSegmentSize);
    }

    #[test]
    fn default_segment_size() {
        assert_eq!(SegmentCodec::default().segment_size(), DEFAULT_SEGMENT_SIZE);
    }

    #[test]
    fn hello_world_partitions_into_five() {
        let codec = SegmentCodec::new(3).unwrap();
        let segments = codec.partition(b"Hello, world!").unwrap();

        let expected: [&[u8]; 5] = [b"Hel", b"lo,", b" wo", b"rld", b"!"];
        assert_eq!(segments.len(), expected.len());
        for (i, (segment, data)) in segments.iter().zip(expected).enumerate() {
            assert_eq!(segment.position, i as u64);
            assert_eq!(segment.data, data);
        }
    }

    #[test]
    fn hello_world_joins_in_reverse_order() {
        let codec = SegmentCodec::new(3).unwrap();
        let mut wire = SegmentWriter::new(Vec::new());
        for segment in codec.partition(b"Hello, world!").unwrap().iter().rev() {
            wire.write(segment).unwrap();
        }
        let bytes = wire.finish().unwrap();
        assert_eq!(codec.join_bytes(bytes.as_slice()).unwrap(), b"Hello, world!");
    }

    #[test]
    fn exact_multiple_has_no_trailing_segment() {
        let codec = SegmentCodec::new(4).unwrap();
        let segments = codec.partition(&[7u8; 12]).unwrap();
        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| s.data.len() == 4));
        assert_eq!(codec.segment_count(12), 3);
        assert_eq!(codec.segment_count(13), 4);
    }

    #[test]
    fn payload_smaller_than_one_segment() {
        let codec = SegmentCodec::new(1024).unwrap();
        let segments = codec.partition(b"tiny").unwrap();
        assert_eq!(segments, vec![Segment::new(0, b"tiny".to_vec())]);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let codec = SegmentCodec::new(3).unwrap();
        let mut wire = Vec::new();
        assert_eq!(codec.split_bytes(b"", &mut wire).unwrap(), 0);
        assert!(wire.is_empty());
        assert_eq!(
            codec.join_bytes(wire.as_slice()).unwrap_err(),
            CodecError::NothingToJoin
        );
    }

    #[test]
    fn typed_roundtrip() {
        let codec = SegmentCodec::new(5).unwrap();
        let widget = Widget {
            name: "sprocket".to_string(),
            sizes: (0..64).collect(),
        };

        let mut wire = Vec::new();
        let count = codec.split(&widget, &mut wire).unwrap();
        assert!(count > 1);

        let joined: Widget = codec.join(wire.as_slice()).unwrap();
        assert_eq!(joined, widget);
    }

    #[test]
    fn wrong_target_type_is_a_decode_error() {
        let codec = SegmentCodec::new(2).unwrap();
        let mut wire = Vec::new();
        codec.split("just a string", &mut wire).unwrap();

        let result: CodecResult<Widget> = codec.join(wire.as_slice());
        assert!(matches!(result, Err(CodecError::Decode { .. })));
    }

    #[test]
    fn duplicated_wire_segment_is_rejected() {
        let codec = SegmentCodec::new(2).unwrap();
        let mut wire = Vec::new();
        codec.split_bytes(b"abcdef", &mut wire).unwrap();
        let copy = wire.clone();
        wire.extend_from_slice(&copy);

        assert_eq!(
            codec.join_bytes(wire.as_slice()).unwrap_err(),
            CodecError::DuplicateSegment { position: 0 }
        );
    }

    #[test]
    fn failing_sink_reports_position() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let codec = SegmentCodec::new(2).unwrap();
        let err = codec.split_bytes(b"abcd", Broken).unwrap_err();
        assert!(matches!(err, CodecError::Write { position: 0, .. }));
    }
}
