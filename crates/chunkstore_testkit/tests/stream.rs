//! Chunk stream integration tests: append/read equivalence across backends.

use chunkstore_core::{ChunkStream, CoreError};
use chunkstore_records::{InMemoryRecordStore, RecordStore};
use chunkstore_testkit::prelude::*;
use proptest::prelude::*;
use std::io::{self, Read, Write};
use std::sync::Arc;

fn drain<S: RecordStore>(stream: &mut ChunkStream<S>, buf_size: usize) -> Vec<u8> {
    let ctx = Context::background();
    let mut out = Vec::new();
    let mut buf = vec![0u8; buf_size];
    loop {
        let n = stream.read(&ctx, &mut buf).unwrap();
        if n == 0 {
            return out;
        }
        assert!(n <= buf_size);
        out.extend_from_slice(&buf[..n]);
    }
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn append_then_read_reproduces_concatenation(
        writes in write_batch_strategy(16, 64),
        buf_size in read_buffer_strategy(),
    ) {
        let store = Arc::new(InMemoryRecordStore::new());
        let ctx = Context::background();
        let mut writer = ChunkStream::new(Arc::clone(&store), TEST_NAMESPACE, "logs/p");
        for payload in &writes {
            prop_assert_eq!(writer.write(&ctx, payload).unwrap(), payload.len());
        }
        prop_assert_eq!(store.len(), writes.len());

        let mut reader = ChunkStream::new(Arc::clone(&store), TEST_NAMESPACE, "logs/p");
        prop_assert_eq!(drain(&mut reader, buf_size), writes.concat());
        // End of stream is sticky.
        prop_assert_eq!(reader.read(&ctx, &mut [0u8; 4]).unwrap(), 0);
    }

    #[test]
    fn reads_are_only_short_at_the_end(
        writes in write_batch_strategy(8, 32),
        buf_size in 1usize..64,
    ) {
        let store = Arc::new(InMemoryRecordStore::new());
        let ctx = Context::background();
        let mut writer = ChunkStream::new(Arc::clone(&store), TEST_NAMESPACE, "logs/p");
        for payload in &writes {
            writer.write(&ctx, payload).unwrap();
        }

        let total: usize = writes.iter().map(Vec::len).sum();
        let mut reader = ChunkStream::new(Arc::clone(&store), TEST_NAMESPACE, "logs/p");
        let mut buf = vec![0u8; buf_size];
        let mut seen = 0;
        loop {
            let n = reader.read(&ctx, &mut buf).unwrap();
            if n == 0 {
                break;
            }
            seen += n;
            if seen < total {
                prop_assert_eq!(n, buf_size);
            }
        }
        prop_assert_eq!(seen, total);
    }
}

#[test]
fn stream_round_trips_through_dir_store() {
    with_dir_store(|dir| {
        let ctx = Context::background();
        let mut writer = ChunkStream::new(Arc::clone(&dir.store), TEST_NAMESPACE, "logs/app");
        for line in ["first line\n", "second line\n", "third line\n"] {
            writer.write(&ctx, line.as_bytes()).unwrap();
        }

        // A fresh store over the same directory sees every chunk in order.
        let mut reader = ChunkStream::new(dir.reopen(), TEST_NAMESPACE, "logs/app");
        assert_eq!(drain(&mut reader, 5), b"first line\nsecond line\nthird line\n");
    });
}

#[test]
fn writers_across_instances_keep_order() {
    let store = Arc::new(InMemoryRecordStore::new());
    for part in ["a", "b", "c", "d"] {
        let mut writer = ChunkStream::new(Arc::clone(&store), TEST_NAMESPACE, "logs/p");
        writer.write_all(part.as_bytes()).unwrap();
    }

    let mut out = String::new();
    ChunkStream::new(Arc::clone(&store), TEST_NAMESPACE, "logs/p")
        .read_to_string(&mut out)
        .unwrap();
    assert_eq!(out, "abcd");
}

#[test]
fn io_copy_between_streams() {
    let store = Arc::new(InMemoryRecordStore::new());
    let mut source = ChunkStream::new(Arc::clone(&store), TEST_NAMESPACE, "logs/src");
    source.write_all(b"copied ").unwrap();
    source.write_all(b"verbatim").unwrap();

    let mut reader = ChunkStream::new(Arc::clone(&store), TEST_NAMESPACE, "logs/src");
    let mut sink = ChunkStream::new(Arc::clone(&store), TEST_NAMESPACE, "logs/dst");
    let copied = io::copy(&mut reader, &mut sink).unwrap();
    assert_eq!(copied, 15);

    let mut out = Vec::new();
    ChunkStream::new(Arc::clone(&store), TEST_NAMESPACE, "logs/dst")
        .read_to_end(&mut out)
        .unwrap();
    assert_eq!(out, b"copied verbatim");
}

#[test]
fn empty_stream_read_is_not_found() {
    let store = InMemoryRecordStore::new();
    let mut reader = ChunkStream::new(&store, TEST_NAMESPACE, "logs/none");

    let err = reader.read(&Context::background(), &mut [0u8; 4]).unwrap_err();
    assert!(matches!(err, CoreError::StreamEmpty { .. }));

    let err = Read::read(&mut reader, &mut [0u8; 4]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
}

#[test]
fn empty_write_is_invalid_input() {
    let store = InMemoryRecordStore::new();
    let mut writer = ChunkStream::new(&store, TEST_NAMESPACE, "logs/p");
    let err = Write::write(&mut writer, b"").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    assert!(store.is_empty());
}
