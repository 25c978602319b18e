//! Inspect command implementation.

use chunkstore_codec::{SegmentReader, SegmentSet};
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Segment file inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Segment file path.
    pub path: String,
    /// Number of segments decoded.
    pub segment_count: usize,
    /// Total payload bytes across segments.
    pub total_bytes: usize,
    /// Whether the segments join cleanly.
    pub complete: bool,
    /// Why the segments do not join, if they don't.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
    /// Per-segment details, in file order.
    pub segments: Vec<SegmentInfo>,
}

/// Details of a single segment.
#[derive(Debug, Serialize)]
pub struct SegmentInfo {
    /// Segment position.
    pub position: u64,
    /// Payload size in bytes.
    pub size: usize,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(path.display().to_string(), fs::File::open(path)?);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

/// Decodes every segment from `source` and checks whether they join.
///
/// Decoding stops at the first malformed segment, which is reported as the
/// problem.
pub fn inspect<R: Read>(path: String, source: R) -> InspectResult {
    let mut result = InspectResult {
        path,
        segment_count: 0,
        total_bytes: 0,
        complete: false,
        problem: None,
        segments: Vec::new(),
    };

    let mut set = SegmentSet::new();
    for segment in SegmentReader::new(source) {
        let segment = match segment {
            Ok(segment) => segment,
            Err(e) => {
                result.problem = Some(e.to_string());
                return result;
            }
        };
        result.segment_count += 1;
        result.total_bytes += segment.data.len();
        result.segments.push(SegmentInfo {
            position: segment.position,
            size: segment.data.len(),
        });
        if let Err(e) = set.insert(segment) {
            result.problem.get_or_insert_with(|| e.to_string());
        }
    }

    if result.problem.is_none() {
        match set.finish() {
            Ok(_) => result.complete = true,
            Err(e) => result.problem = Some(e.to_string()),
        }
    }
    result
}

fn print_text_output(result: &InspectResult) {
    println!("Segment file: {}", result.path);
    println!();
    println!("Segments: {}", result.segment_count);
    println!("Payload:  {} bytes", result.total_bytes);
    match &result.problem {
        None => println!("Status:   complete"),
        Some(problem) => println!("Status:   {problem}"),
    }

    if !result.segments.is_empty() {
        println!();
        println!("  {:>10}  {:>10}", "POSITION", "SIZE");
        for segment in &result.segments {
            println!("  {:>10}  {:>10}", segment.position, segment.size);
        }
    }
}
