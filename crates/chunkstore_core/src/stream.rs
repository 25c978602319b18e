//! Byte streams spread across many backing records.
//!
//! Each write creates one record carrying the payload verbatim. Reads drain
//! the records of a key in sequence order, crossing record boundaries
//! transparently.

use crate::error::{CoreError, CoreResult};
use crate::types::{marker, stream_selector, SequenceNumber, SEQUENCE_ANNOTATION, STREAM_KEY_LABEL};
use chunkstore_records::{Context, Record, RecordError, RecordStore};
use std::io;
use tracing::debug;

/// Prefix for generated stream record names.
pub const STREAM_RECORD_PREFIX: &str = "stream-";

/// Read position within a stream's cached records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamCursor {
    /// Index of the current record.
    pub record: usize,
    /// Byte offset within the current record.
    pub offset: usize,
}

/// An append-only byte stream stored as one record per write.
///
/// Read and write are independent: an instance used for reading snapshots
/// the stream on its first read and never sees later writes.
#[derive(Debug)]
pub struct ChunkStream<S> {
    store: S,
    namespace: String,
    key: String,
    next_sequence: Option<SequenceNumber>,
    records: Option<Vec<Record>>,
    cursor: StreamCursor,
}

impl<S: RecordStore> ChunkStream<S> {
    /// Creates a stream over the records of `key` in `namespace`.
    pub fn new(store: S, namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            key: key.into(),
            next_sequence: None,
            records: None,
            cursor: StreamCursor::default(),
        }
    }

    /// Returns the stream's correlation key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stream's namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the current read position.
    pub fn cursor(&self) -> StreamCursor {
        self.cursor
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Appends `payload` as one new record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NothingToWrite`] for an empty payload, or the
    /// record store's error.
    pub fn write(&mut self, ctx: &Context, payload: &[u8]) -> CoreResult<usize> {
        if payload.is_empty() {
            return Err(CoreError::NothingToWrite);
        }

        let sequence = match self.next_sequence {
            Some(seq) => seq,
            None => self.resume_sequence(ctx)?,
        };

        let record = Record::generated(&self.namespace, STREAM_RECORD_PREFIX, payload.to_vec())
            .with_label(STREAM_KEY_LABEL, &self.key)
            .with_annotation(SEQUENCE_ANNOTATION, sequence.as_u64().to_string());
        let created = self.store.create(ctx, record)?;
        debug!(
            key = %self.key,
            %sequence,
            name = %created.meta.name,
            len = payload.len(),
            "appended stream record"
        );

        self.next_sequence = Some(sequence.next());
        Ok(payload.len())
    }

    /// Fills `buf` from the stream and returns the number of bytes read.
    ///
    /// Returns 0 only at the end of the stream or when `buf` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StreamEmpty`] if the key has no records,
    /// [`CoreError::MissingMarker`] if a record has no sequence, or the
    /// record store's listing error.
    pub fn read(&mut self, ctx: &Context, buf: &mut [u8]) -> CoreResult<usize> {
        if self.records.is_none() {
            self.records = Some(self.load(ctx)?);
        }
        let Some(records) = self.records.as_deref() else {
            return Ok(0);
        };

        let mut filled = 0;
        while filled < buf.len() {
            let Some(record) = records.get(self.cursor.record) else {
                break;
            };
            let remaining = &record.data[self.cursor.offset.min(record.data.len())..];
            if remaining.is_empty() {
                self.cursor.record += 1;
                self.cursor.offset = 0;
                continue;
            }

            let n = remaining.len().min(buf.len() - filled);
            buf[filled..filled + n].copy_from_slice(&remaining[..n]);
            filled += n;
            self.cursor.offset += n;
        }
        Ok(filled)
    }

    /// Lists the stream's records ordered by sequence.
    fn load(&self, ctx: &Context) -> CoreResult<Vec<Record>> {
        let records = self.store.list(ctx, &stream_selector(&self.namespace, &self.key))?;
        if records.is_empty() {
            return Err(CoreError::StreamEmpty {
                key: self.key.clone(),
            });
        }

        let mut ordered = Vec::with_capacity(records.len());
        for record in records {
            let Some(seq) = marker(&record, SEQUENCE_ANNOTATION) else {
                return Err(CoreError::MissingMarker {
                    key: self.key.clone(),
                    record: record.meta.name,
                    marker: SEQUENCE_ANNOTATION,
                });
            };
            ordered.push((seq, record));
        }
        ordered.sort_by_key(|(seq, _)| *seq);

        debug!(key = %self.key, records = ordered.len(), "loaded stream");
        Ok(ordered.into_iter().map(|(_, record)| record).collect())
    }

    /// Finds the first sequence after every record already in the stream.
    fn resume_sequence(&self, ctx: &Context) -> CoreResult<SequenceNumber> {
        let records = self.store.list(ctx, &stream_selector(&self.namespace, &self.key))?;
        let next = records
            .iter()
            .filter_map(|record| marker(record, SEQUENCE_ANNOTATION))
            .max()
            .map_or(SequenceNumber::default(), |last| SequenceNumber::new(last).next());
        Ok(next)
    }
}

// Cancellation must not map to `Interrupted`: `read_to_end` and `io::copy`
// retry that kind forever.
fn to_io(err: CoreError) -> io::Error {
    let kind = match &err {
        CoreError::NothingToWrite => io::ErrorKind::InvalidInput,
        CoreError::StreamEmpty { .. } => io::ErrorKind::NotFound,
        CoreError::Records(RecordError::DeadlineExceeded) => io::ErrorKind::TimedOut,
        _ => io::ErrorKind::Other,
    };
    io::Error::new(kind, err)
}

impl<S: RecordStore> io::Read for ChunkStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        ChunkStream::read(self, &Context::background(), buf).map_err(to_io)
    }
}

impl<S: RecordStore> io::Write for ChunkStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        ChunkStream::write(self, &Context::background(), buf).map_err(to_io)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunkstore_records::{FaultInjectingStore, InMemoryRecordStore};
    use std::io::{Read, Write};
    use std::sync::Arc;

    fn stream(store: &Arc<InMemoryRecordStore>) -> ChunkStream<Arc<InMemoryRecordStore>> {
        ChunkStream::new(Arc::clone(store), "default", "logs/app")
    }

    fn drain(stream: &mut ChunkStream<Arc<InMemoryRecordStore>>, chunk: usize) -> Vec<u8> {
        let ctx = Context::background();
        let mut out = Vec::new();
        let mut buf = vec![0u8; chunk];
        loop {
            let n = stream.read(&ctx, &mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        out
    }

    #[test]
    fn write_creates_one_record_per_call() {
        let store = Arc::new(InMemoryRecordStore::new());
        let ctx = Context::background();
        let mut writer = stream(&store);

        assert_eq!(writer.write(&ctx, b"hello").unwrap(), 5);
        assert_eq!(writer.write(&ctx, b" world").unwrap(), 6);

        let records = store.records();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(record.meta.name.starts_with(STREAM_RECORD_PREFIX));
            assert_eq!(record.label(STREAM_KEY_LABEL), Some("logs/app"));
        }
    }

    #[test]
    fn empty_write_is_rejected() {
        let store = Arc::new(InMemoryRecordStore::new());
        let err = stream(&store).write(&Context::background(), b"").unwrap_err();
        assert!(matches!(err, CoreError::NothingToWrite));
        assert_eq!(err.to_string(), "no bytes to write");
        assert!(store.is_empty());
    }

    #[test]
    fn read_spans_record_boundaries() {
        let store = Arc::new(InMemoryRecordStore::new());
        let ctx = Context::background();
        let mut writer = stream(&store);
        for part in [&b"abc"[..], b"de", b"fghij"] {
            writer.write(&ctx, part).unwrap();
        }

        let mut reader = stream(&store);
        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&ctx, &mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(reader.cursor(), StreamCursor { record: 1, offset: 1 });
        assert_eq!(reader.read(&ctx, &mut buf).unwrap(), 4);
        assert_eq!(&buf, b"efgh");
        assert_eq!(reader.read(&ctx, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ij");
        assert_eq!(reader.read(&ctx, &mut buf).unwrap(), 0);
    }

    #[test]
    fn single_byte_reads_reproduce_the_stream() {
        let store = Arc::new(InMemoryRecordStore::new());
        let ctx = Context::background();
        let mut writer = stream(&store);
        writer.write(&ctx, b"one").unwrap();
        writer.write(&ctx, b"two").unwrap();

        assert_eq!(drain(&mut stream(&store), 1), b"onetwo");
    }

    #[test]
    fn read_order_follows_sequence_not_names() {
        let store = Arc::new(InMemoryRecordStore::new());
        let ctx = Context::background();
        // Names sort opposite to sequence.
        for (name, seq, data) in [("a", 2, "third"), ("b", 1, "second"), ("c", 0, "first")] {
            let record = Record::named("default", name, data.as_bytes().to_vec())
                .with_label(STREAM_KEY_LABEL, "logs/app")
                .with_annotation(SEQUENCE_ANNOTATION, seq.to_string());
            store.create(&ctx, record).unwrap();
        }

        assert_eq!(drain(&mut stream(&store), 64), b"firstsecondthird");
    }

    #[test]
    fn empty_stream_is_an_error() {
        let store = Arc::new(InMemoryRecordStore::new());
        let err = stream(&store)
            .read(&Context::background(), &mut [0u8; 8])
            .unwrap_err();
        assert!(matches!(err, CoreError::StreamEmpty { .. }));
        assert_eq!(err.to_string(), "no elements of stream logs/app found");
    }

    #[test]
    fn record_without_sequence_is_rejected() {
        let store = Arc::new(InMemoryRecordStore::new());
        let ctx = Context::background();
        let record =
            Record::named("default", "stray", b"x".to_vec()).with_label(STREAM_KEY_LABEL, "logs/app");
        store.create(&ctx, record).unwrap();

        let err = stream(&store).read(&ctx, &mut [0u8; 8]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingMarker { marker: SEQUENCE_ANNOTATION, .. }
        ));
    }

    #[test]
    fn reader_snapshot_ignores_later_writes() {
        let store = Arc::new(InMemoryRecordStore::new());
        let ctx = Context::background();
        stream(&store).write(&ctx, b"early").unwrap();

        let mut reader = stream(&store);
        let mut buf = [0u8; 2];
        assert_eq!(reader.read(&ctx, &mut buf).unwrap(), 2);

        stream(&store).write(&ctx, b"late").unwrap();
        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"rly");
    }

    #[test]
    fn new_writer_continues_sequence() {
        let store = Arc::new(InMemoryRecordStore::new());
        let ctx = Context::background();
        stream(&store).write(&ctx, b"first ").unwrap();
        stream(&store).write(&ctx, b"second").unwrap();

        assert_eq!(drain(&mut stream(&store), 5), b"first second");
    }

    #[test]
    fn streams_with_different_keys_are_disjoint() {
        let store = Arc::new(InMemoryRecordStore::new());
        let ctx = Context::background();
        stream(&store).write(&ctx, b"mine").unwrap();
        ChunkStream::new(Arc::clone(&store), "default", "logs/other")
            .write(&ctx, b"theirs")
            .unwrap();

        assert_eq!(drain(&mut stream(&store), 16), b"mine");
    }

    #[test]
    fn io_traits_support_copy() {
        let store = Arc::new(InMemoryRecordStore::new());
        let mut writer = stream(&store);
        writer.write_all(b"through io").unwrap();
        writer.flush().unwrap();

        let mut out = Vec::new();
        io::copy(&mut stream(&store), &mut out).unwrap();
        assert_eq!(out, b"through io");
    }

    #[test]
    fn list_failure_propagates() {
        let store = FaultInjectingStore::new(InMemoryRecordStore::new());
        store.fail_lists(true);
        let mut reader = ChunkStream::new(&store, "default", "logs/app");
        let err = reader.read(&Context::background(), &mut [0u8; 4]).unwrap_err();
        assert!(matches!(err, CoreError::Records(_)));
    }

    #[test]
    fn cancelled_read_is_not_retried_by_io() {
        let store = Arc::new(InMemoryRecordStore::new());
        stream(&store).write(&Context::background(), b"x").unwrap();

        let (ctx, handle) = Context::with_cancel();
        handle.cancel();
        let err = stream(&store).read(&ctx, &mut [0u8; 1]).unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(to_io(err).kind(), io::ErrorKind::Other);
    }

    #[test]
    fn expired_read_maps_to_timed_out() {
        let store = Arc::new(InMemoryRecordStore::new());
        stream(&store).write(&Context::background(), b"x").unwrap();

        let ctx = Context::background().with_deadline(std::time::Instant::now());
        let err = stream(&store).read(&ctx, &mut [0u8; 1]).unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(to_io(err).kind(), io::ErrorKind::TimedOut);
    }
}
