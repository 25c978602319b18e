//! Record model shared by all record stores.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Alphabet used for generated name suffixes (no vowels, no look-alikes).
const NAME_ALPHABET: &[u8] = b"bcdfghjklmnpqrstvwxz2456789";

/// Length of generated name suffixes.
const NAME_SUFFIX_LEN: usize = 5;

/// Unique identifier assigned to a record on create.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Uid(Uuid);

impl Uid {
    /// Creates a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for Uid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uid({})", self.0)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque version token assigned to a record on create.
///
/// Versions are only ever compared for equality and rendered as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceVersion(pub u64);

impl ResourceVersion {
    /// Creates a version token.
    #[must_use]
    pub const fn new(version: u64) -> Self {
        Self(version)
    }

    /// Returns the raw version value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity and routing metadata of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Namespace the record lives in.
    pub namespace: String,
    /// Record name, unique within the namespace. Empty until created when
    /// `generate_name` is used.
    pub name: String,
    /// Prefix for a store-generated name.
    pub generate_name: Option<String>,
    /// Store-assigned unique identifier.
    pub uid: Option<Uid>,
    /// Store-assigned version token.
    pub resource_version: Option<ResourceVersion>,
    /// Labels usable in list selectors.
    pub labels: BTreeMap<String, String>,
    /// Free-form annotations, not selectable.
    pub annotations: BTreeMap<String, String>,
}

/// One unit of storage in a capacity-limited record store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Identity and routing metadata.
    pub meta: RecordMeta,
    /// Raw record body.
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

impl Record {
    /// Creates an unnamed record in `namespace` whose name will be generated
    /// from `prefix` on create.
    #[must_use]
    pub fn generated(namespace: impl Into<String>, prefix: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            meta: RecordMeta {
                namespace: namespace.into(),
                generate_name: Some(prefix.into()),
                ..RecordMeta::default()
            },
            data,
        }
    }

    /// Creates a record with an explicit name.
    #[must_use]
    pub fn named(namespace: impl Into<String>, name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            meta: RecordMeta {
                namespace: namespace.into(),
                name: name.into(),
                ..RecordMeta::default()
            },
            data,
        }
    }

    /// Sets a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.labels.insert(key.into(), value.into());
        self
    }

    /// Sets an annotation.
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.annotations.insert(key.into(), value.into());
        self
    }

    /// Returns the value of a label.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.meta.labels.get(key).map(String::as_str)
    }

    /// Returns the value of an annotation.
    #[must_use]
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.meta.annotations.get(key).map(String::as_str)
    }
}

/// Selects records by namespace and label equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    /// Namespace to search.
    pub namespace: String,
    /// Labels a record must carry with exactly these values.
    pub labels: BTreeMap<String, String>,
}

impl Selector {
    /// Selects every record in a namespace.
    #[must_use]
    pub fn namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Adds a required label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Returns whether `record` is selected.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        record.meta.namespace == self.namespace
            && self
                .labels
                .iter()
                .all(|(key, value)| record.meta.labels.get(key) == Some(value))
    }
}

/// Generates a name from `prefix` plus a short random suffix.
#[must_use]
pub fn generate_name(prefix: &str) -> String {
    let bytes = Uuid::new_v4().into_bytes();
    let mut name = String::with_capacity(prefix.len() + NAME_SUFFIX_LEN);
    name.push_str(prefix);
    for byte in &bytes[..NAME_SUFFIX_LEN] {
        name.push(char::from(NAME_ALPHABET[usize::from(*byte) % NAME_ALPHABET.len()]));
    }
    name
}
