//! The chunked object store.

use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::object::{project_identity, Object};
use crate::transaction::CreateTransaction;
use crate::types::{key_selector, marker, KEY_LABEL, POSITION_ANNOTATION, TOTAL_ANNOTATION};
use chunkstore_codec::{decode_value, encode_value, join_segments_with_total, Segment, SegmentCodec};
use chunkstore_records::{Context, Record, RecordStore};
use tracing::{debug, warn};

/// Stores objects larger than one record by splitting them into segments.
///
/// Each segment becomes one record labelled with the object's key and
/// annotated with its position and the object's segment count. Creating an object is all-or-nothing: if any
/// segment fails, the segments already created are deleted again.
///
/// # Example
///
/// ```rust,ignore
/// let store = ChunkedObjectStore::new(InMemoryRecordStore::new(), StoreConfig::new())?;
/// let created = store.create(&Context::background(), "widgets/a", widget)?;
/// let fetched: Widget = store.get(&Context::background(), "widgets/a")?;
/// assert_eq!(created, fetched);
/// ```
#[derive(Debug)]
pub struct ChunkedObjectStore<S> {
    records: S,
    codec: SegmentCodec,
    config: StoreConfig,
}

impl<S: RecordStore> ChunkedObjectStore<S> {
    /// Creates an object store over `records`.
    ///
    /// # Errors
    ///
    /// Returns a codec error if the configured segment size is zero.
    pub fn new(records: S, config: StoreConfig) -> CoreResult<Self> {
        let codec = SegmentCodec::new(config.segment_size)?;
        Ok(Self {
            records,
            codec,
            config,
        })
    }

    /// Returns the backing record store.
    pub fn records(&self) -> &S {
        &self.records
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Persists `object` under `key` and returns it with identity projected.
    ///
    /// # Errors
    ///
    /// - [`CoreError::VersionSet`] if the object already carries a version
    /// - [`CoreError::AlreadyExists`] if records exist under `key`
    /// - [`CoreError::CreateFailed`] if a segment could not be created; the
    ///   segments created before it have been deleted
    pub fn create<T: Object>(&self, ctx: &Context, key: &str, mut object: T) -> CoreResult<T> {
        if !object.meta().resource_version.is_empty() {
            return Err(CoreError::VersionSet);
        }

        match self.fetch(ctx, key) {
            Ok(_) => {
                return Err(CoreError::AlreadyExists {
                    key: key.to_string(),
                })
            }
            Err(CoreError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let bytes = encode_value(&object)?;
        let segments = self.codec.partition(&bytes)?;
        if segments.is_empty() {
            return Err(CoreError::PartitionFailed {
                key: key.to_string(),
            });
        }

        let total = segments.len() as u64;
        let mut txn = CreateTransaction::begin(&self.records, key, total);
        for segment in segments {
            let position = segment.position;
            if let Err(source) = txn.create(ctx, position, self.segment_record(key, segment, total)) {
                let unreclaimed = txn.rollback();
                if !unreclaimed.is_empty() {
                    warn!(
                        key,
                        unreclaimed = unreclaimed.len(),
                        "rollback left segment records behind"
                    );
                }
                return Err(CoreError::CreateFailed {
                    key: key.to_string(),
                    position,
                    total,
                    source,
                    unreclaimed,
                });
            }
        }
        let records = txn.commit()?;

        project_identity(object.meta_mut(), &records);
        debug!(key, segments = total, bytes = bytes.len(), "created object");
        Ok(object)
    }

    /// Reconstructs the object stored under `key`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if no records exist under `key`
    /// - [`CoreError::MissingMarker`] if a record has no position or total
    /// - [`CoreError::InconsistentTotal`] if records disagree on the total
    /// - [`CoreError::Corrupted`] if the segments are duplicated or
    ///   incomplete
    pub fn get<T: Object>(&self, ctx: &Context, key: &str) -> CoreResult<T> {
        let (bytes, records) = self.fetch(ctx, key)?;
        let mut object: T = decode_value(&bytes)?;
        project_identity(object.meta_mut(), &records);
        Ok(object)
    }

    /// Returns whether any records are stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns the record store's listing error.
    pub fn exists(&self, ctx: &Context, key: &str) -> CoreResult<bool> {
        let records = self.records.list(ctx, &self.selector(key))?;
        Ok(!records.is_empty())
    }

    /// Not supported.
    ///
    /// # Errors
    ///
    /// Always returns [`CoreError::Unsupported`].
    pub fn delete<T: Object>(&self, _ctx: &Context, _key: &str) -> CoreResult<T> {
        Err(CoreError::unsupported("delete"))
    }

    /// Not supported.
    ///
    /// # Errors
    ///
    /// Always returns [`CoreError::Unsupported`].
    pub fn watch(&self, _ctx: &Context, _key: &str) -> CoreResult<()> {
        Err(CoreError::unsupported("watch"))
    }

    /// Not supported.
    ///
    /// # Errors
    ///
    /// Always returns [`CoreError::Unsupported`].
    pub fn list<T: Object>(&self, _ctx: &Context, _prefix: &str) -> CoreResult<Vec<T>> {
        Err(CoreError::unsupported("list"))
    }

    /// Not supported.
    ///
    /// # Errors
    ///
    /// Always returns [`CoreError::Unsupported`].
    pub fn guaranteed_update<T, F>(&self, _ctx: &Context, _key: &str, _update: F) -> CoreResult<T>
    where
        T: Object,
        F: FnMut(T) -> CoreResult<T>,
    {
        Err(CoreError::unsupported("guaranteed_update"))
    }

    /// Not supported.
    ///
    /// # Errors
    ///
    /// Always returns [`CoreError::Unsupported`].
    pub fn count(&self, _ctx: &Context, _prefix: &str) -> CoreResult<u64> {
        Err(CoreError::unsupported("count"))
    }

    fn selector(&self, key: &str) -> chunkstore_records::Selector {
        key_selector(&self.config.namespace, key)
    }

    fn segment_record(&self, key: &str, segment: Segment, total: u64) -> Record {
        Record::generated(&self.config.namespace, &self.config.record_prefix, segment.data)
            .with_label(KEY_LABEL, key)
            .with_annotation(POSITION_ANNOTATION, segment.position.to_string())
            .with_annotation(TOTAL_ANNOTATION, total.to_string())
    }

    /// Lists the records under `key` and joins their segments.
    ///
    /// Returns the joined bytes and the records in position order, with
    /// their bodies moved out.
    fn fetch(&self, ctx: &Context, key: &str) -> CoreResult<(Vec<u8>, Vec<Record>)> {
        let mut records = self.records.list(ctx, &self.selector(key))?.into_iter();
        let Some(first) = records.next() else {
            return Err(CoreError::NotFound {
                key: key.to_string(),
            });
        };

        // Every record states the total, so a set missing its tail is caught.
        let total = required_marker(key, &first, TOTAL_ANNOTATION)?;
        let mut ordered = Vec::with_capacity(records.len() + 1);
        for record in std::iter::once(first).chain(records) {
            let position = required_marker(key, &record, POSITION_ANNOTATION)?;
            let declared = required_marker(key, &record, TOTAL_ANNOTATION)?;
            if declared != total {
                return Err(CoreError::InconsistentTotal {
                    key: key.to_string(),
                    record: record.meta.name,
                    expected: total,
                    found: declared,
                });
            }
            ordered.push((position, record));
        }
        ordered.sort_by_key(|(position, _)| *position);

        let bytes = join_segments_with_total(
            ordered
                .iter_mut()
                .map(|(position, record)| Ok(Segment::new(*position, std::mem::take(&mut record.data)))),
            total,
        )
        .map_err(|source| CoreError::Corrupted {
            key: key.to_string(),
            source,
        })?;

        debug!(key, segments = ordered.len(), bytes = bytes.len(), "joined object");
        Ok((bytes, ordered.into_iter().map(|(_, record)| record).collect()))
    }
}

fn required_marker(key: &str, record: &Record, annotation: &'static str) -> CoreResult<u64> {
    marker(record, annotation).ok_or_else(|| CoreError::MissingMarker {
        key: key.to_string(),
        record: record.meta.name.clone(),
        marker: annotation,
    })
}
