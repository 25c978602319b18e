//! Segments and the reconstruction buffer.

use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Serialize};

/// Maximum number of segments one value may be split into.
/// This bounds the slot allocation a single hostile position can cause.
pub const MAX_SEGMENTS: u64 = 16 * 1024 * 1024;

/// A position-tagged fragment of a serialized value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Zero-based position of this fragment.
    pub position: u64,
    /// Fragment bytes.
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

impl Segment {
    /// Creates a segment.
    #[must_use]
    pub fn new(position: u64, data: Vec<u8>) -> Self {
        Self { position, data }
    }
}

/// Growable buffer of optional segment slots used during reconstruction.
///
/// Segments may arrive in any order. Inserting position `p` into a set of
/// length `L`:
///
/// - `p == L` appends
/// - `p > L` grows the set to `p + 1` with empty slots, then fills `p`
/// - `p < L` fills slot `p`, or fails if it is already filled
///
/// A filled slot is never overwritten.
///
/// A set built with [`SegmentSet::with_total`] also knows how many segments
/// to expect, so a missing tail is reported like any other gap.
#[derive(Debug, Default)]
pub struct SegmentSet {
    slots: Vec<Option<Vec<u8>>>,
    filled: usize,
    bytes: usize,
    total: Option<usize>,
}

impl SegmentSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set that expects exactly `total` segments.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Read`] if `total` is zero or above
    /// [`MAX_SEGMENTS`].
    pub fn with_total(total: u64) -> CodecResult<Self> {
        match usize::try_from(total) {
            Ok(expected) if total > 0 && total <= MAX_SEGMENTS => Ok(Self {
                total: Some(expected),
                ..Self::default()
            }),
            _ => Err(CodecError::read(format!("segment total {total} out of range"))),
        }
    }

    /// Number of slots, filled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.total.unwrap_or(self.slots.len())
    }

    /// Returns `true` if no segment has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Returns `true` if every slot is filled and at least one exists.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.filled > 0 && self.filled == self.len()
    }

    /// Inserts a segment.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DuplicateSegment`] if the position is already
    /// filled and [`CodecError::PositionOutOfRange`] if it lies past the
    /// expected total.
    pub fn insert(&mut self, segment: Segment) -> CodecResult<()> {
        let index = match usize::try_from(segment.position) {
            Ok(index) if segment.position < MAX_SEGMENTS => index,
            _ => {
                return Err(CodecError::read(format!(
                    "segment position {} out of range",
                    segment.position
                )))
            }
        };
        if let Some(total) = self.total {
            if index >= total {
                return Err(CodecError::PositionOutOfRange {
                    position: segment.position,
                    total: total as u64,
                });
            }
        }

        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }

        let slot = &mut self.slots[index];
        if slot.is_some() {
            return Err(CodecError::DuplicateSegment {
                position: segment.position,
            });
        }

        self.bytes += segment.data.len();
        self.filled += 1;
        *slot = Some(segment.data);
        Ok(())
    }

    /// Consumes the set and concatenates all segment data in position order.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NothingToJoin`] if the set is empty and
    /// [`CodecError::IncompleteStream`] naming the first empty slot if any
    /// position was skipped, including positions up to the expected total.
    pub fn finish(mut self) -> CodecResult<Vec<u8>> {
        if self.is_empty() {
            return Err(CodecError::NothingToJoin);
        }
        if let Some(total) = self.total {
            self.slots.resize_with(total, || None);
        }

        let len = self.slots.len() as u64;
        let mut data = Vec::with_capacity(self.bytes);
        for (position, slot) in self.slots.into_iter().enumerate() {
            match slot {
                Some(bytes) => data.extend_from_slice(&bytes),
                None => {
                    return Err(CodecError::IncompleteStream {
                        missing: position as u64,
                        len,
                    })
                }
            }
        }
        Ok(data)
    }
}

/// Joins a sequence of segments, in any order, into the original bytes.
///
/// Stops at the first error produced by the source.
///
/// # Errors
///
/// Propagates source errors and returns the reconstruction errors of
/// [`SegmentSet::insert`] and [`SegmentSet::finish`].
pub fn join_segments<I>(segments: I) -> CodecResult<Vec<u8>>
where
    I: IntoIterator<Item = CodecResult<Segment>>,
{
    let mut set = SegmentSet::new();
    for segment in segments {
        set.insert(segment?)?;
    }
    set.finish()
}

/// Joins exactly `total` segments, in any order, into the original bytes.
///
/// Unlike [`join_segments`], a set whose trailing segments are missing fails
/// with [`CodecError::IncompleteStream`].
///
/// # Errors
///
/// As [`join_segments`], plus the errors of [`SegmentSet::with_total`].
pub fn join_segments_with_total<I>(segments: I, total: u64) -> CodecResult<Vec<u8>>
where
    I: IntoIterator<Item = CodecResult<Segment>>,
{
    let mut set = SegmentSet::with_total(total)?;
    for segment in segments {
        set.insert(segment?)?;
    }
    set.finish()
}
