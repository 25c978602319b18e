//! Record store trait definition.

use crate::context::Context;
use crate::error::{RecordError, RecordResult};
use crate::record::{generate_name, Record, ResourceVersion, Selector, Uid};
use std::sync::Arc;

/// Default per-record body capacity (1 MiB, the ConfigMap limit).
pub const DEFAULT_MAX_RECORD_SIZE: usize = 1024 * 1024;

/// A capacity-limited key-value record store.
///
/// Record stores are **opaque**: they never interpret record bodies, labels,
/// or annotations beyond label-equality selection. Chunking, ordering, and
/// reassembly live above this trait.
///
/// # Invariants
///
/// - `create` assigns a fresh [`Uid`] and [`ResourceVersion`] and, when the
///   record has no name, a name generated from `generate_name`
/// - `create` never stores a body larger than [`RecordStore::max_record_size`]
/// - Each call is atomic per record; there are no multi-record transactions
/// - `list` order is unspecified and must not be relied upon
/// - Every call checks its [`Context`] first and aborts if it is cancelled
///
/// # Implementors
///
/// - [`super::InMemoryRecordStore`] - For testing and embedding
/// - [`super::DirRecordStore`] - One file per record on a local directory
/// - [`super::FaultInjectingStore`] - Wrapper that injects failures
pub trait RecordStore: Send + Sync {
    /// Creates a record and returns the stored copy with identity assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The context is cancelled or expired
    /// - The name is taken ([`RecordError::AlreadyExists`])
    /// - The body exceeds the capacity ([`RecordError::TooLarge`])
    /// - Neither `name` nor `generate_name` is set
    fn create(&self, ctx: &Context, record: Record) -> RecordResult<Record>;

    /// Fetches a record by namespace and name.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if no such record exists.
    fn get(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<Record>;

    /// Lists every record matched by `selector`, in unspecified order.
    ///
    /// # Errors
    ///
    /// Returns an error if the context is cancelled or the listing fails.
    fn list(&self, ctx: &Context, selector: &Selector) -> RecordResult<Vec<Record>>;

    /// Deletes a record by namespace and name.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if no such record exists.
    fn delete(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<()>;

    /// Maximum body size accepted by `create`.
    fn max_record_size(&self) -> usize;
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn create(&self, ctx: &Context, record: Record) -> RecordResult<Record> {
        (**self).create(ctx, record)
    }

    fn get(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<Record> {
        (**self).get(ctx, namespace, name)
    }

    fn list(&self, ctx: &Context, selector: &Selector) -> RecordResult<Vec<Record>> {
        (**self).list(ctx, selector)
    }

    fn delete(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<()> {
        (**self).delete(ctx, namespace, name)
    }

    fn max_record_size(&self) -> usize {
        (**self).max_record_size()
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn create(&self, ctx: &Context, record: Record) -> RecordResult<Record> {
        (**self).create(ctx, record)
    }

    fn get(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<Record> {
        (**self).get(ctx, namespace, name)
    }

    fn list(&self, ctx: &Context, selector: &Selector) -> RecordResult<Vec<Record>> {
        (**self).list(ctx, selector)
    }

    fn delete(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<()> {
        (**self).delete(ctx, namespace, name)
    }

    fn max_record_size(&self) -> usize {
        (**self).max_record_size()
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn create(&self, ctx: &Context, record: Record) -> RecordResult<Record> {
        (**self).create(ctx, record)
    }

    fn get(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<Record> {
        (**self).get(ctx, namespace, name)
    }

    fn list(&self, ctx: &Context, selector: &Selector) -> RecordResult<Vec<Record>> {
        (**self).list(ctx, selector)
    }

    fn delete(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<()> {
        (**self).delete(ctx, namespace, name)
    }

    fn max_record_size(&self) -> usize {
        (**self).max_record_size()
    }
}

/// Validates a record for creation and resolves its final name.
///
/// Identity fields supplied by the caller are discarded.
pub(crate) fn admit(record: &mut Record, max_record_size: usize) -> RecordResult<()> {
    if record.data.len() > max_record_size {
        return Err(RecordError::TooLarge {
            size: record.data.len(),
            max: max_record_size,
        });
    }
    if record.meta.name.is_empty() {
        let prefix = record
            .meta
            .generate_name
            .as_deref()
            .ok_or(RecordError::MissingName)?;
        record.meta.name = generate_name(prefix);
    }
    record.meta.uid = None;
    record.meta.resource_version = None;
    Ok(())
}

/// Stamps store-assigned identity onto an admitted record.
pub(crate) fn stamp(record: &mut Record, version: ResourceVersion) {
    record.meta.uid = Some(Uid::new());
    record.meta.resource_version = Some(version);
}
