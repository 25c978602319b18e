//! In-memory record store for testing.

use crate::backend::{admit, stamp, RecordStore, DEFAULT_MAX_RECORD_SIZE};
use crate::context::Context;
use crate::error::{RecordError, RecordResult};
use crate::record::{Record, ResourceVersion, Selector};
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<(String, String), Record>,
    last_version: u64,
}

/// An in-memory record store.
///
/// This store keeps all records in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Embedding where persistence is not needed
///
/// Resource versions come from a store-wide counter, so every create yields
/// a strictly larger version than the one before it.
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use chunkstore_records::{Context, InMemoryRecordStore, Record, RecordStore, Selector};
///
/// let store = InMemoryRecordStore::new();
/// let ctx = Context::background();
/// let created = store
///     .create(&ctx, Record::generated("default", "chunk-", b"hello".to_vec()))
///     .unwrap();
/// assert!(created.meta.uid.is_some());
/// assert_eq!(store.list(&ctx, &Selector::namespace("default")).unwrap().len(), 1);
/// ```
#[derive(Debug)]
pub struct InMemoryRecordStore {
    inner: RwLock<Inner>,
    max_record_size: usize,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    /// Creates an empty store with the default record capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_record_size(DEFAULT_MAX_RECORD_SIZE)
    }

    /// Creates an empty store with a custom record capacity.
    #[must_use]
    pub fn with_max_record_size(max_record_size: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            max_record_size,
        }
    }

    /// Number of records currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().records.is_empty()
    }

    /// Returns a copy of every stored record.
    ///
    /// Useful for testing and debugging.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.inner.read().records.values().cloned().collect()
    }

    /// Removes all records. The version counter is not reset.
    pub fn clear(&self) {
        self.inner.write().records.clear();
    }
}

impl RecordStore for InMemoryRecordStore {
    fn create(&self, ctx: &Context, mut record: Record) -> RecordResult<Record> {
        ctx.check()?;
        admit(&mut record, self.max_record_size)?;

        let mut inner = self.inner.write();
        let key = (record.meta.namespace.clone(), record.meta.name.clone());
        if inner.records.contains_key(&key) {
            return Err(RecordError::already_exists(key.0, key.1));
        }

        inner.last_version += 1;
        stamp(&mut record, ResourceVersion::new(inner.last_version));
        inner.records.insert(key, record.clone());
        Ok(record)
    }

    fn get(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<Record> {
        ctx.check()?;
        self.inner
            .read()
            .records
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| RecordError::not_found(namespace, name))
    }

    fn list(&self, ctx: &Context, selector: &Selector) -> RecordResult<Vec<Record>> {
        ctx.check()?;
        Ok(self
            .inner
            .read()
            .records
            .values()
            .filter(|record| selector.matches(record))
            .cloned()
            .collect())
    }

    fn delete(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<()> {
        ctx.check()?;
        self.inner
            .write()
            .records
            .remove(&(namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| RecordError::not_found(namespace, name))
    }

    fn max_record_size(&self) -> usize {
        self.max_record_size
    }
}
