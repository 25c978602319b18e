//! Property-based test generators using proptest.
//!
//! Provides strategies for generating payloads, segment sizes, and stream
//! write batches.

use crate::fixtures::Widget;
use proptest::prelude::*;

/// Strategy for non-empty payloads of up to `max_len` bytes.
pub fn payload_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=max_len.max(1))
}

/// Strategy for segment sizes, biased towards tiny sizes that produce
/// many segments.
pub fn segment_size_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        3 => 1usize..8,
        2 => 8usize..64,
        1 => 64usize..1024,
    ]
}

/// Strategy for object keys.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}/[a-z0-9-]{1,16}").expect("Invalid regex")
}

/// Strategy for widgets with bodies of up to `max_body` bytes.
pub fn widget_strategy(max_body: usize) -> impl Strategy<Value = Widget> {
    (
        prop::string::string_regex("[a-z][a-z0-9-]{0,15}").expect("Invalid regex"),
        prop::collection::vec(any::<u8>(), 0..=max_body),
        prop::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,6}", 0..4),
    )
        .prop_map(|(name, body, labels)| {
            let mut widget = Widget::new(&name, body);
            widget.labels = labels;
            widget
        })
}

/// Strategy for a batch of non-empty stream writes.
pub fn write_batch_strategy(
    max_writes: usize,
    max_len: usize,
) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(payload_strategy(max_len), 1..=max_writes.max(1))
}

/// Strategy for read buffer sizes (always at least one byte).
pub fn read_buffer_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![Just(1usize), 2usize..16, 16usize..4096]
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn payloads_are_never_empty(payload in payload_strategy(64)) {
            prop_assert!(!payload.is_empty());
            prop_assert!(payload.len() <= 64);
        }

        #[test]
        fn segment_sizes_are_positive(size in segment_size_strategy()) {
            prop_assert!(size >= 1);
        }

        #[test]
        fn keys_have_a_slash(key in key_strategy()) {
            prop_assert_eq!(key.matches('/').count(), 1);
        }

        #[test]
        fn batches_hold_non_empty_writes(batch in write_batch_strategy(8, 32)) {
            prop_assert!(!batch.is_empty());
            prop_assert!(batch.iter().all(|w| !w.is_empty()));
        }
    }
}
