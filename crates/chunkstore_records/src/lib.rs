//! # chunkstore records
//!
//! Backing record store trait and implementations for chunkstore.
//!
//! This crate provides the lowest-level storage abstraction: a key-value
//! store of small, size-capped records modeled on cluster configuration
//! objects. Record stores are **opaque** - they do not split, order, or
//! reassemble anything.
//!
//! ## Design Principles
//!
//! - Stores offer only per-record create, get, list, and delete
//! - Every call takes a [`Context`] and honours its cancellation
//! - Identity (uid, resource version, generated name) is store-assigned
//! - Must be `Send + Sync` for concurrent access
//!
//! ## Available Stores
//!
//! - [`InMemoryRecordStore`] - For testing and embedding
//! - [`DirRecordStore`] - Persistent, one file per record
//! - [`FaultInjectingStore`] - Wrapper that fails selected calls
//!
//! ## Example
//!
//! ```rust
//! use chunkstore_records::{Context, InMemoryRecordStore, Record, RecordStore};
//!
//! let store = InMemoryRecordStore::new();
//! let ctx = Context::background();
//! let record = store
//!     .create(&ctx, Record::named("default", "greeting", b"hello".to_vec()))
//!     .unwrap();
//! assert_eq!(store.get(&ctx, "default", "greeting").unwrap(), record);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod context;
mod dir;
mod error;
mod faulty;
mod memory;
mod record;

pub use backend::{RecordStore, DEFAULT_MAX_RECORD_SIZE};
pub use context::{CancelHandle, Context};
pub use dir::DirRecordStore;
pub use error::{RecordError, RecordResult};
pub use faulty::FaultInjectingStore;
pub use memory::InMemoryRecordStore;
pub use record::{generate_name, Record, RecordMeta, ResourceVersion, Selector, Uid};
