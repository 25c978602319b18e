//! Test fixtures and store helpers.
//!
//! Provides a sample object type and convenience functions for setting up
//! record stores and object stores in tests.

use chunkstore_core::{ChunkedObjectStore, Object, ObjectMeta, StoreConfig};
use chunkstore_records::{DirRecordStore, FaultInjectingStore, InMemoryRecordStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Namespace used by every fixture.
pub const TEST_NAMESPACE: &str = "default";

/// Segment size small enough that fixture objects span many segments.
pub const SMALL_SEGMENT_SIZE: usize = 16;

/// A sample object with an arbitrary-size body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    /// Identity metadata.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Free-form labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Raw body bytes.
    #[serde(with = "serde_bytes")]
    pub body: Vec<u8>,
}

impl Widget {
    /// Creates a widget with the given name and body.
    pub fn new(name: &str, body: Vec<u8>) -> Self {
        Self {
            metadata: ObjectMeta::named(TEST_NAMESPACE, name),
            labels: BTreeMap::new(),
            body,
        }
    }

    /// Creates a widget with a deterministic body of `len` bytes.
    pub fn sized(name: &str, len: usize) -> Self {
        Self::new(name, (0..len).map(|i| (i % 251) as u8).collect())
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    /// Returns the widget with identity fields cleared, for comparing
    /// content only.
    #[must_use]
    pub fn without_identity(mut self) -> Self {
        self.metadata.uid.clear();
        self.metadata.resource_version.clear();
        self
    }
}

impl Object for Widget {
    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

/// Object store over a shared in-memory record store.
pub type MemoryObjectStore = ChunkedObjectStore<Arc<InMemoryRecordStore>>;

/// Object store over a shared fault-injecting record store.
pub type FaultyObjectStore = ChunkedObjectStore<Arc<FaultInjectingStore<InMemoryRecordStore>>>;

fn config(segment_size: usize) -> StoreConfig {
    StoreConfig::new()
        .namespace(TEST_NAMESPACE)
        .segment_size(segment_size)
}

/// Creates an object store over a fresh in-memory record store.
pub fn memory_object_store(segment_size: usize) -> MemoryObjectStore {
    ChunkedObjectStore::new(Arc::new(InMemoryRecordStore::new()), config(segment_size))
        .expect("Failed to create object store")
}

/// Creates an object store over a fresh fault-injecting record store.
pub fn faulty_object_store(segment_size: usize) -> FaultyObjectStore {
    let records = FaultInjectingStore::new(InMemoryRecordStore::new());
    ChunkedObjectStore::new(Arc::new(records), config(segment_size))
        .expect("Failed to create object store")
}

/// A directory record store with automatic cleanup.
pub struct TestDirStore {
    /// The record store.
    pub store: Arc<DirRecordStore>,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl TestDirStore {
    /// Creates a record store in a new temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = DirRecordStore::open(temp_dir.path()).expect("Failed to open record store");
        Self {
            store: Arc::new(store),
            temp_dir,
        }
    }

    /// Returns the store's root directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Opens a second store over the same directory.
    pub fn reopen(&self) -> DirRecordStore {
        DirRecordStore::open(self.path()).expect("Failed to reopen record store")
    }

    /// Creates an object store over this record store.
    pub fn object_store(&self, segment_size: usize) -> ChunkedObjectStore<Arc<DirRecordStore>> {
        ChunkedObjectStore::new(Arc::clone(&self.store), config(segment_size))
            .expect("Failed to create object store")
    }
}

impl Default for TestDirStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestDirStore {
    type Target = DirRecordStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test with an in-memory object store using small segments.
///
/// # Example
///
/// ```rust
/// use chunkstore_testkit::{with_object_store, Widget};
/// use chunkstore_records::Context;
///
/// with_object_store(|store| {
///     let ctx = Context::background();
///     store.create(&ctx, "widgets/a", Widget::sized("a", 100)).unwrap();
///     assert!(store.exists(&ctx, "widgets/a").unwrap());
/// });
/// ```
pub fn with_object_store<F, R>(f: F) -> R
where
    F: FnOnce(&MemoryObjectStore) -> R,
{
    let store = memory_object_store(SMALL_SEGMENT_SIZE);
    f(&store)
}

/// Runs a test with a temporary directory record store.
pub fn with_dir_store<F, R>(f: F) -> R
where
    F: FnOnce(&TestDirStore) -> R,
{
    let store = TestDirStore::new();
    f(&store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunkstore_records::{Context, RecordStore};

    #[test]
    fn sized_widget_has_requested_body() {
        let widget = Widget::sized("w", 300);
        assert_eq!(widget.body.len(), 300);
        assert_eq!(widget.body[251], 0);
        assert_eq!(widget.metadata.name, "w");
    }

    #[test]
    fn memory_store_fixture_is_empty() {
        with_object_store(|store| {
            assert!(store.records().is_empty());
            assert_eq!(store.config().segment_size, SMALL_SEGMENT_SIZE);
        });
    }

    #[test]
    fn dir_store_survives_reopen() {
        with_dir_store(|dir| {
            let ctx = Context::background();
            let store = dir.object_store(SMALL_SEGMENT_SIZE);
            store.create(&ctx, "widgets/a", Widget::sized("a", 64)).unwrap();

            let selector = chunkstore_core::key_selector(TEST_NAMESPACE, "widgets/a");
            let written = store.records().list(&ctx, &selector).unwrap();
            let reopened = dir.reopen().list(&ctx, &selector).unwrap();
            assert!(!written.is_empty());
            assert_eq!(reopened.len(), written.len());
        });
    }
}
