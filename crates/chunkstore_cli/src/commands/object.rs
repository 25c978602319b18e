//! Put and get commands for chunked JSON documents.

use chunkstore_core::{ChunkedObjectStore, Context, Object, ObjectMeta, StoreConfig};
use chunkstore_records::DirRecordStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// An arbitrary JSON object with identity metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identity metadata.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Every other top-level field.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Object for Document {
    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

fn open(
    store: &Path,
    namespace: &str,
    segment_size: usize,
) -> Result<ChunkedObjectStore<DirRecordStore>, Box<dyn std::error::Error>> {
    let records = DirRecordStore::open(store)?;
    let config = StoreConfig::new()
        .namespace(namespace)
        .segment_size(segment_size);
    Ok(ChunkedObjectStore::new(records, config)?)
}

/// Stores the JSON document in `file` under `key`.
pub fn put(
    store: &Path,
    namespace: &str,
    key: &str,
    file: &Path,
    segment_size: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let document: Document = serde_json::from_slice(&fs::read(file)?)?;
    let objects = open(store, namespace, segment_size)?;

    let created = objects.create(&Context::background(), key, document)?;
    info!("Stored {:?} as {}", file, key);
    println!("✓ Stored {key}");
    println!("  UID: {}", created.metadata.uid);
    println!("  Version: {}", created.metadata.resource_version);
    Ok(())
}

/// Prints the JSON document stored under `key`.
pub fn get(store: &Path, namespace: &str, key: &str) -> Result<(), Box<dyn std::error::Error>> {
    let objects = open(store, namespace, chunkstore_codec::DEFAULT_SEGMENT_SIZE)?;
    let document: Document = objects.get(&Context::background(), key)?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
