//! Logical objects and their identity metadata.

use chunkstore_records::Record;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Identity metadata carried by every logical object.
///
/// Empty strings mean "unset". After a create or get, `uid` is the uid of
/// the object's first record and `resource_version` is the combined version
/// of all its records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Caller-chosen object name.
    pub name: String,
    /// Caller-chosen object namespace.
    pub namespace: String,
    /// Unique identifier, projected from the first record.
    pub uid: String,
    /// Opaque version token, derived from every record's version.
    pub resource_version: String,
}

impl ObjectMeta {
    /// Creates metadata with a name and namespace.
    #[must_use]
    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }
}

/// A structured value that can be stored by a [`crate::ChunkedObjectStore`].
pub trait Object: Serialize + DeserializeOwned {
    /// Returns the object's metadata.
    fn meta(&self) -> &ObjectMeta;

    /// Returns the object's metadata for mutation.
    fn meta_mut(&mut self) -> &mut ObjectMeta;
}

/// Computes the combined version token of a record set.
///
/// The token is the CRC-32 of every record's version, concatenated in the
/// given order, as eight hex digits. Changing any one record's version
/// changes the token.
#[must_use]
pub fn combined_version<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut hasher = crc32fast::Hasher::new();
    for record in records {
        if let Some(version) = record.meta.resource_version {
            hasher.update(version.to_string().as_bytes());
        }
    }
    format!("{:08x}", hasher.finalize())
}

/// Copies identity from a position-ordered record set onto `meta`.
pub(crate) fn project_identity(meta: &mut ObjectMeta, records: &[Record]) {
    if let Some(uid) = records.first().and_then(|first| first.meta.uid) {
        meta.uid = uid.to_string();
    }
    meta.resource_version = combined_version(records);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunkstore_records::{ResourceVersion, Uid};

    fn record(version: u64) -> Record {
        let mut record = Record::named("default", format!("r{version}"), vec![]);
        record.meta.uid = Some(Uid::new());
        record.meta.resource_version = Some(ResourceVersion::new(version));
        record
    }

    #[test]
    fn combined_version_is_stable() {
        let records = vec![record(1), record(2), record(3)];
        assert_eq!(combined_version(&records), combined_version(&records));
        assert_eq!(combined_version(&records).len(), 8);
    }

    #[test]
    fn combined_version_changes_with_any_record() {
        let base = vec![record(1), record(2), record(3)];
        let bumped = vec![record(1), record(7), record(3)];
        assert_ne!(combined_version(&base), combined_version(&bumped));
    }

    #[test]
    fn projection_uses_first_record_uid() {
        let records = vec![record(4), record(5)];
        let mut meta = ObjectMeta::named("default", "widget");
        project_identity(&mut meta, &records);

        assert_eq!(meta.uid, records[0].meta.uid.unwrap().to_string());
        assert_eq!(meta.resource_version, combined_version(&records));
        assert_eq!(meta.name, "widget");
    }

    #[test]
    fn missing_meta_fields_default_to_empty() {
        #[derive(Serialize)]
        struct Partial<'a> {
            name: &'a str,
        }

        let bytes = chunkstore_codec::encode_value(&Partial { name: "only-name" }).unwrap();
        let meta: ObjectMeta = chunkstore_codec::decode_value(&bytes).unwrap();
        assert_eq!(meta.name, "only-name");
        assert!(meta.uid.is_empty());
        assert!(meta.resource_version.is_empty());
    }
}
