//! # chunkstore testkit
//!
//! Test utilities for chunkstore.
//!
//! This crate provides:
//! - Sample objects and store fixtures
//! - Property-based test generators using proptest
//! - Known segmentation vectors
//! - Cross-crate integration test helpers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chunkstore_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_store() {
//!     with_object_store(|store| {
//!         let ctx = Context::background();
//!         store.create(&ctx, "widgets/a", Widget::sized("a", 100)).unwrap();
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::vectors::*;
    pub use chunkstore_records::Context;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use vectors::*;
