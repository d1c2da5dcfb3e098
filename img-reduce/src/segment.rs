//! Flash segment records and the reduced container encoding.
//!
//! The container holds two records back to back, each an 8-byte header
//! followed by its payload:
//!
//! ```text
//! [ offset (4, LE) ][ length (4, LE) ][ payload (length bytes) ]
//! ```
//!
//! Offsets are absolute flash addresses, not file offsets. There is no
//! magic, checksum or terminator; the reader knows the record count.

/// Bytes of the per-segment header: offset plus length.
const HEADER_SIZE: usize = 8;

/// A block of bytes to program at an absolute flash offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    offset: u32,
    data: Vec<u8>,
}

impl Segment {
    pub fn new(offset: u32, data: Vec<u8>) -> Self {
        Self { offset, data }
    }

    /// Absolute flash offset where this segment is programmed.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Encoded size of this segment: header plus payload.
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.data.len()
    }

    /// Append the wire encoding of this segment to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.offset.to_le_bytes());
        out.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.data);
    }
}

/// Encode segments into one container, in order, with nothing in between
/// and nothing after the last payload.
pub fn encode_container(segments: &[Segment]) -> Vec<u8> {
    let mut out = Vec::with_capacity(segments.iter().map(Segment::encoded_len).sum());
    for segment in segments {
        segment.encode(&mut out);
    }
    out
}
