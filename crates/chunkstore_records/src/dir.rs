//! Directory-backed record store for persistent storage.

use crate::backend::{admit, stamp, RecordStore, DEFAULT_MAX_RECORD_SIZE};
use crate::context::Context;
use crate::error::{RecordError, RecordResult};
use crate::record::{Record, ResourceVersion, Selector};
use parking_lot::Mutex;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File holding the last assigned resource version.
const VERSION_FILE: &str = "VERSION";

/// Extension of record files.
const RECORD_EXT: &str = "rec";

/// A record store that keeps one file per record under a root directory.
///
/// # Layout
///
/// ```text
/// <root>/VERSION                  last assigned resource version
/// <root>/<namespace>/<name>.rec   CBOR-encoded record
/// ```
///
/// Record files are written to a temporary sibling and renamed into place,
/// so a crash never leaves a half-written record visible.
///
/// # Thread Safety
///
/// Mutations are serialized by an internal lock. The store assumes it is the
/// only process writing to `root`.
///
/// # Example
///
/// ```no_run
/// use chunkstore_records::{Context, DirRecordStore, Record, RecordStore};
/// use std::path::Path;
///
/// let store = DirRecordStore::open(Path::new("records")).unwrap();
/// store
///     .create(&Context::background(), Record::named("default", "a", b"hi".to_vec()))
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct DirRecordStore {
    root: PathBuf,
    max_record_size: usize,
    write_lock: Mutex<()>,
}

impl DirRecordStore {
    /// Opens or creates a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: &Path) -> RecordResult<Self> {
        Self::open_with_max_record_size(root, DEFAULT_MAX_RECORD_SIZE)
    }

    /// Opens or creates a store with a custom record capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open_with_max_record_size(root: &Path, max_record_size: usize) -> RecordResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            max_record_size,
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_dir(&self, namespace: &str) -> RecordResult<PathBuf> {
        validate_component(namespace)?;
        Ok(self.root.join(namespace))
    }

    fn record_path(&self, namespace: &str, name: &str) -> RecordResult<PathBuf> {
        validate_component(name)?;
        Ok(self
            .namespace_dir(namespace)?
            .join(format!("{name}.{RECORD_EXT}")))
    }

    fn next_version(&self) -> RecordResult<ResourceVersion> {
        let path = self.root.join(VERSION_FILE);
        let last = match fs::read_to_string(&path) {
            Ok(text) => text.trim().parse::<u64>().map_err(|e| {
                RecordError::Corrupted(format!("invalid version file {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };
        let next = last + 1;
        write_atomically(&path, next.to_string().as_bytes())?;
        Ok(ResourceVersion::new(next))
    }
}

impl RecordStore for DirRecordStore {
    fn create(&self, ctx: &Context, mut record: Record) -> RecordResult<Record> {
        ctx.check()?;
        admit(&mut record, self.max_record_size)?;
        let path = self.record_path(&record.meta.namespace, &record.meta.name)?;

        let _guard = self.write_lock.lock();
        if path.exists() {
            return Err(RecordError::already_exists(
                record.meta.namespace,
                record.meta.name,
            ));
        }
        stamp(&mut record, self.next_version()?);

        let mut encoded = Vec::new();
        ciborium::into_writer(&record, &mut encoded)
            .map_err(|e| RecordError::Corrupted(format!("failed to encode record: {e}")))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomically(&path, &encoded)?;
        debug!(path = %path.display(), size = record.data.len(), "created record");
        Ok(record)
    }

    fn get(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<Record> {
        ctx.check()?;
        let path = self.record_path(namespace, name)?;
        match fs::read(&path) {
            Ok(bytes) => decode_record(&path, &bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(RecordError::not_found(namespace, name))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, ctx: &Context, selector: &Selector) -> RecordResult<Vec<Record>> {
        ctx.check()?;
        let dir = self.namespace_dir(&selector.namespace)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXT) {
                continue;
            }
            // Deleted since read_dir.
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            let record = decode_record(&path, &bytes)?;
            if selector.matches(&record) {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn delete(&self, ctx: &Context, namespace: &str, name: &str) -> RecordResult<()> {
        ctx.check()?;
        let path = self.record_path(namespace, name)?;
        let _guard = self.write_lock.lock();
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "deleted record");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(RecordError::not_found(namespace, name))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn max_record_size(&self) -> usize {
        self.max_record_size
    }
}

fn decode_record(path: &Path, bytes: &[u8]) -> RecordResult<Record> {
    ciborium::from_reader(bytes)
        .map_err(|e| RecordError::Corrupted(format!("{}: {e}", path.display())))
}

fn validate_component(component: &str) -> RecordResult<()> {
    if component.is_empty()
        || component == "."
        || component == ".."
        || component.contains(['/', '\\'])
    {
        return Err(RecordError::Io(io::Error::new(
            ErrorKind::InvalidInput,
            format!("invalid path component {component:?}"),
        )));
    }
    Ok(())
}

fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    let mut file = fs::File::create(&tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&tmp, path)
}
