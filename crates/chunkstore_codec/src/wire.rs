//! Self-framing segment wire format.
//!
//! A segment stream is a plain concatenation of CBOR maps:
//!
//! ```text
//! | {"position": uint, "data": bstr} | {"position": uint, "data": bstr} | ...
//! ```
//!
//! Every item carries its own length information, so a stream can be decoded
//! one segment at a time without a leading count. End of input is detected
//! before a segment starts; input that ends inside a segment is a read error.

use crate::error::{CodecError, CodecResult};
use crate::segment::Segment;
use std::io::{BufRead, BufReader, Read, Write};

/// Writes segments to a sink in the segment wire format.
#[derive(Debug)]
pub struct SegmentWriter<W> {
    sink: W,
    written: usize,
}

impl<W: Write> SegmentWriter<W> {
    /// Creates a writer over `sink`.
    pub fn new(sink: W) -> Self {
        Self { sink, written: 0 }
    }

    /// Encodes one segment.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Write`] if the sink fails.
    pub fn write(&mut self, segment: &Segment) -> CodecResult<()> {
        ciborium::into_writer(segment, &mut self.sink).map_err(|e| CodecError::Write {
            position: segment.position,
            message: e.to_string(),
        })?;
        self.written += 1;
        Ok(())
    }

    /// Number of segments written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes the sink and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Write`] if the flush fails.
    pub fn finish(mut self) -> CodecResult<W> {
        self.sink.flush().map_err(|e| CodecError::Write {
            position: self.written as u64,
            message: e.to_string(),
        })?;
        Ok(self.sink)
    }
}

/// Decodes segments lazily from a source in the segment wire format.
///
/// The iterator is finite and not restartable:
/// - `Some(Ok(segment))` for each decoded segment
/// - `None` once the source is cleanly exhausted
/// - `Some(Err(..))` on a malformed or truncated segment, after which it
///   yields `None`
#[derive(Debug)]
pub struct SegmentReader<R> {
    source: R,
    finished: bool,
}

impl<R: Read> SegmentReader<BufReader<R>> {
    /// Creates a reader over an unbuffered source.
    pub fn new(source: R) -> Self {
        Self::from_buffered(BufReader::new(source))
    }
}

impl<R: BufRead> SegmentReader<R> {
    /// Creates a reader over an already buffered source.
    pub fn from_buffered(source: R) -> Self {
        Self {
            source,
            finished: false,
        }
    }

    fn read_next(&mut self) -> CodecResult<Option<Segment>> {
        let at_end = self
            .source
            .fill_buf()
            .map_err(|e| CodecError::read(e.to_string()))?
            .is_empty();
        if at_end {
            return Ok(None);
        }
        ciborium::from_reader(&mut self.source)
            .map(Some)
            .map_err(|e| CodecError::read(e.to_string()))
    }
}

impl<R: BufRead> Iterator for SegmentReader<R> {
    type Item = CodecResult<Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_next() {
            Ok(Some(segment)) => Some(Ok(segment)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
