//! Cross-crate integration test helpers.

use crate::fixtures::Widget;
use chunkstore_core::{ChunkedObjectStore, CoreResult};
use chunkstore_records::{Context, RecordStore};
use std::collections::BTreeMap;

/// A test harness that tracks created objects for later verification.
pub struct ObjectHarness<S> {
    /// The object store under test.
    pub store: ChunkedObjectStore<S>,
    /// Expected content per key.
    expected: BTreeMap<String, Widget>,
}

impl<S: RecordStore> ObjectHarness<S> {
    /// Wraps an object store.
    pub fn new(store: ChunkedObjectStore<S>) -> Self {
        Self {
            store,
            expected: BTreeMap::new(),
        }
    }

    /// Creates a widget and tracks it when the create succeeds.
    pub fn create(&mut self, key: &str, widget: Widget) -> CoreResult<Widget> {
        let created = self
            .store
            .create(&Context::background(), key, widget.clone())?;
        self.expected.insert(key.to_string(), widget);
        Ok(created)
    }

    /// Fetches a widget and checks it against the tracked content.
    pub fn get_and_verify(&self, key: &str) -> Widget {
        let actual: Widget = self
            .store
            .get(&Context::background(), key)
            .expect("Failed to get object");
        if let Some(expected) = self.expected.get(key) {
            assert_eq!(
                actual.clone().without_identity(),
                expected.clone().without_identity(),
                "Object content mismatch for {key}"
            );
        }
        actual
    }

    /// Verifies every tracked object.
    pub fn verify_all(&self) {
        for key in self.expected.keys() {
            self.get_and_verify(key);
        }
    }

    /// Returns the count of tracked objects.
    pub fn tracked_count(&self) -> usize {
        self.expected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{memory_object_store, SMALL_SEGMENT_SIZE};

    #[test]
    fn harness_tracks_successful_creates() {
        let mut harness = ObjectHarness::new(memory_object_store(SMALL_SEGMENT_SIZE));
        harness.create("widgets/a", Widget::sized("a", 40)).unwrap();
        harness.create("widgets/b", Widget::sized("b", 400)).unwrap();
        assert!(harness.create("widgets/a", Widget::sized("a", 1)).is_err());

        assert_eq!(harness.tracked_count(), 2);
        harness.verify_all();
    }
}
