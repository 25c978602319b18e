//! Split command implementation.

use chunkstore_codec::SegmentCodec;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Splits `input` into segments of at most `segment_size` bytes and writes
/// them to `output`, or stdout.
pub fn run(
    input: &Path,
    segment_size: usize,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let codec = SegmentCodec::new(segment_size)?;
    let data = fs::read(input)?;

    let count = match output {
        Some(path) => {
            let mut sink = BufWriter::new(fs::File::create(path)?);
            let count = codec.split_bytes(&data, &mut sink)?;
            sink.flush()?;
            count
        }
        None => {
            let stdout = io::stdout();
            let mut sink = stdout.lock();
            codec.split_bytes(&data, &mut sink)?
        }
    };

    info!(
        "Split {:?} ({} bytes) into {} segments of at most {} bytes",
        input,
        data.len(),
        count,
        codec.segment_size()
    );
    Ok(())
}
