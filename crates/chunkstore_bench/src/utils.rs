//! Benchmark utilities.

use chunkstore_core::{Object, ObjectMeta};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Generate random data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// An object carrying an opaque payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blob {
    /// Identity metadata.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Opaque payload.
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
}

impl Blob {
    /// Creates a blob with a random payload of `size` bytes.
    pub fn random(name: &str, size: usize) -> Self {
        Self {
            metadata: ObjectMeta::named("default", name),
            payload: random_data(size),
        }
    }
}

impl Object for Blob {
    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
