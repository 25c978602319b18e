//! CLI command implementations.

pub mod inspect;
pub mod join;
pub mod object;
pub mod split;
pub mod stream;
