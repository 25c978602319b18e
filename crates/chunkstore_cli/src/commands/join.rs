//! Join command implementation.

use chunkstore_codec::SegmentCodec;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Reassembles the segment file `input` and writes the bytes to `output`,
/// or stdout.
pub fn run(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::File::open(input)?;
    // Segment size only matters for splitting.
    let data = SegmentCodec::default().join_bytes(source)?;

    match output {
        Some(path) => fs::write(path, &data)?,
        None => {
            let stdout = io::stdout();
            let mut sink = stdout.lock();
            sink.write_all(&data)?;
            sink.flush()?;
        }
    }

    info!("Joined {:?} into {} bytes", input, data.len());
    Ok(())
}
