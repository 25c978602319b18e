//! Benchmarks for chunkstore.
//!
//! The benchmarks live under `benches/`; this crate only shares their
//! helpers.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
