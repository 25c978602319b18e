//! Append and cat commands for chunk streams.

use chunkstore_core::{ChunkStream, Context};
use chunkstore_records::DirRecordStore;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Appends each file to the stream under `key` as one chunk.
pub fn append(
    store: &Path,
    namespace: &str,
    key: &str,
    files: &[PathBuf],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stream = ChunkStream::new(DirRecordStore::open(store)?, namespace, key);
    let ctx = Context::background();

    let mut total = 0;
    for file in files {
        let data = fs::read(file)?;
        total += stream.write(&ctx, &data)?;
        info!("Appended {:?} ({} bytes) to {}", file, data.len(), key);
    }

    println!("✓ Appended {} files ({} bytes) to {}", files.len(), total, key);
    Ok(())
}

/// Writes the stream under `key` to stdout.
pub fn cat(store: &Path, namespace: &str, key: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut stream = ChunkStream::new(DirRecordStore::open(store)?, namespace, key);
    let stdout = io::stdout();
    let mut sink = stdout.lock();
    let copied = io::copy(&mut stream, &mut sink)?;
    sink.flush()?;
    info!("Read {} bytes from {}", copied, key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn appended_files_read_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("store");
        let files: Vec<PathBuf> = ["one", "two", "three"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                fs::write(&path, format!("{name};")).unwrap();
                path
            })
            .collect();

        append(&root, "default", "logs/cli", &files).unwrap();

        let mut out = String::new();
        ChunkStream::new(DirRecordStore::open(&root).unwrap(), "default", "logs/cli")
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "one;two;three;");
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        fs::write(&empty, b"").unwrap();
        assert!(append(&dir.path().join("store"), "default", "logs/cli", &[empty]).is_err());
    }
}
