//! Known segmentation vectors.
//!
//! Fixed inputs with their expected segments and wire encoding, so a
//! change to partitioning or framing shows up as a concrete diff.

use serde::{Deserialize, Serialize};

/// A segmentation test vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Input bytes (UTF-8 for readability).
    pub input: String,
    /// Segment size to split with.
    pub segment_size: usize,
    /// Expected segment contents, in position order.
    pub expected_segments: Vec<String>,
}

/// A wire encoding test vector for a single segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Segment position.
    pub position: u64,
    /// Segment data (UTF-8 for readability).
    pub data: String,
    /// Expected CBOR encoding (hex).
    pub expected_hex: String,
}

fn vector(id: &str, description: &str, input: &str, size: usize, segments: &[&str]) -> SegmentVector {
    SegmentVector {
        id: id.into(),
        description: description.into(),
        input: input.into(),
        segment_size: size,
        expected_segments: segments.iter().map(|s| (*s).to_string()).collect(),
    }
}

/// Partitioning vectors.
pub fn segment_vectors() -> Vec<SegmentVector> {
    vec![
        vector(
            "hello_world_3",
            "Remainder segment holds the last byte",
            "Hello, world!",
            3,
            &["Hel", "lo,", " wo", "rld", "!"],
        ),
        vector(
            "exact_multiple",
            "Input length is a multiple of the segment size",
            "abcdef",
            2,
            &["ab", "cd", "ef"],
        ),
        vector(
            "single_segment",
            "Segment size larger than input",
            "tiny",
            512,
            &["tiny"],
        ),
        vector(
            "one_byte_segments",
            "Segment size of one",
            "abc",
            1,
            &["a", "b", "c"],
        ),
        vector("empty", "Empty input yields no segments", "", 4, &[]),
    ]
}

/// Wire encoding vectors.
pub fn wire_vectors() -> Vec<WireVector> {
    vec![WireVector {
        id: "segment_0_hel".into(),
        position: 0,
        data: "Hel".into(),
        // {"position": 0, "data": h'48656c'}
        expected_hex: "a268706f736974696f6e0064646174614348656c".into(),
    }]
}

/// Returns every vector as pretty JSON.
pub fn all_vectors_json() -> String {
    #[derive(Serialize)]
    struct AllVectors {
        segments: Vec<SegmentVector>,
        wire: Vec<WireVector>,
    }

    let vectors = AllVectors {
        segments: segment_vectors(),
        wire: wire_vectors(),
    };
    serde_json::to_string_pretty(&vectors).expect("Failed to serialize vectors")
}

/// Hex-encodes bytes.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
