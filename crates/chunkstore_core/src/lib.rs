//! # chunkstore core
//!
//! Chunked persistence of objects into capacity-limited record stores.
//!
//! This crate provides:
//! - [`ChunkedObjectStore`] for structured objects, split into segment
//!   records and rolled back on partial failure
//! - [`ChunkStream`] for raw byte streams, one record per write
//! - [`CreateTransaction`], the compensating multi-record create
//!
//! ## Example
//!
//! ```rust
//! use chunkstore_core::{ChunkedObjectStore, Object, ObjectMeta, StoreConfig};
//! use chunkstore_records::{Context, InMemoryRecordStore};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Note {
//!     metadata: ObjectMeta,
//!     text: String,
//! }
//!
//! impl Object for Note {
//!     fn meta(&self) -> &ObjectMeta {
//!         &self.metadata
//!     }
//!     fn meta_mut(&mut self) -> &mut ObjectMeta {
//!         &mut self.metadata
//!     }
//! }
//!
//! let store = ChunkedObjectStore::new(
//!     InMemoryRecordStore::new(),
//!     StoreConfig::new().segment_size(8),
//! )
//! .unwrap();
//! let ctx = Context::background();
//!
//! let note = Note {
//!     metadata: ObjectMeta::named("default", "note"),
//!     text: "longer than one segment".into(),
//! };
//! let created = store.create(&ctx, "notes/1", note).unwrap();
//! assert!(store.records().len() > 1);
//!
//! let fetched: Note = store.get(&ctx, "notes/1").unwrap();
//! assert_eq!(fetched.text, created.text);
//! assert_eq!(fetched.metadata.resource_version, created.metadata.resource_version);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod object;
mod store;
mod stream;
mod transaction;
mod types;

pub use config::StoreConfig;
pub use error::{CoreError, CoreResult, ErrorKind};
pub use object::{combined_version, Object, ObjectMeta};
pub use store::ChunkedObjectStore;
pub use stream::{ChunkStream, StreamCursor, STREAM_RECORD_PREFIX};
pub use transaction::{CreateState, CreateTransaction};
pub use types::{
    key_selector, marker, stream_selector, SequenceNumber, KEY_LABEL, POSITION_ANNOTATION,
    SEQUENCE_ANNOTATION, STREAM_KEY_LABEL, TOTAL_ANNOTATION,
};

// Re-export the layers below for convenience.
pub use chunkstore_codec::{SegmentCodec, DEFAULT_SEGMENT_SIZE};
pub use chunkstore_records::{Context, RecordStore};
