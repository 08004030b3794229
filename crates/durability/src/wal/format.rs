//! Physical log format shared by the writer and reader
//!
//! The log is a sequence of 32 KiB blocks. Each block holds one or more
//! chunks; a chunk never straddles a block boundary. A block tail shorter
//! than a chunk header is zero-filled and skipped.
//!
//! ```text
//! +---------+-----------+-----------+--- ... ---+
//! | CRC (4) | Length (2)| Type (1)  |  Payload  |
//! +---------+-----------+-----------+--- ... ---+
//! ```
//!
//! - CRC: masked CRC32C over the type byte followed by the payload (LE)
//! - Length: payload length in bytes (LE)
//! - Type: position of the chunk within its logical record

use strata_core::coding::{decode_fixed16, decode_fixed32, encode_fixed16, encode_fixed32};

/// Size of one log block
pub const BLOCK_SIZE: usize = 32768;

/// Chunk header: checksum (4 bytes), length (2 bytes), type (1 byte)
pub const HEADER_SIZE: usize = 4 + 2 + 1;

/// Largest ordinal a [`RecordType`] can take
pub const MAX_RECORD_TYPE: usize = RecordType::Last as usize;

/// Largest payload the 2-byte length field can describe
pub const MAX_CHUNK_PAYLOAD: usize = u16::MAX as usize;

/// Position of a chunk within its logical record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RecordType {
    /// Reserved for preallocated (zero-filled) regions; never written
    Zero = 0,
    /// The whole logical record fits in this chunk
    Full = 1,
    /// First fragment of a record
    First = 2,
    /// Interior fragment of a record
    Middle = 3,
    /// Final fragment of a record
    Last = 4,
}

impl RecordType {
    /// All record types in ordinal order
    pub const ALL: [RecordType; MAX_RECORD_TYPE + 1] = [
        RecordType::Zero,
        RecordType::Full,
        RecordType::First,
        RecordType::Middle,
        RecordType::Last,
    ];

    /// Decode a type byte, `None` for unknown ordinals
    pub fn from_u8(byte: u8) -> Option<Self> {
        Self::ALL.get(byte as usize).copied()
    }

    /// Type byte as stored on disk
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Pick the type for a fragment from its position in the record
    #[inline]
    pub fn for_fragment(begin: bool, end: bool) -> Self {
        match (begin, end) {
            (true, true) => RecordType::Full,
            (true, false) => RecordType::First,
            (false, true) => RecordType::Last,
            (false, false) => RecordType::Middle,
        }
    }
}

/// Decoded chunk header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Masked CRC32C as stored
    pub masked_crc: u32,
    /// Payload length
    pub length: u16,
    /// Raw type byte; see [`RecordType::from_u8`]
    pub record_type: u8,
}

impl ChunkHeader {
    /// Pack the header into its 7-byte on-disk form
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        encode_fixed32(&mut buf[0..4], self.masked_crc);
        encode_fixed16(&mut buf[4..6], self.length);
        buf[6] = self.record_type;
        buf
    }

    /// Unpack a header from the first [`HEADER_SIZE`] bytes of `src`
    ///
    /// Returns `None` if `src` is too short.
    pub fn decode(src: &[u8]) -> Option<Self> {
        if src.len() < HEADER_SIZE {
            return None;
        }
        Some(Self {
            masked_crc: decode_fixed32(&src[0..4]),
            length: decode_fixed16(&src[4..6]),
            record_type: src[6],
        })
    }
}

/// Per-type CRC seeds: entry `i` is the CRC32C of the single byte `i`
pub fn type_crc_table() -> [u32; MAX_RECORD_TYPE + 1] {
    let mut table = [0u32; MAX_RECORD_TYPE + 1];
    for (ordinal, seed) in table.iter_mut().enumerate() {
        *seed = strata_core::crc::value(&[ordinal as u8]);
    }
    table
}

/// Masked checksum of a chunk, given the seed for its type
#[inline]
pub fn chunk_crc(seed: u32, payload: &[u8]) -> u32 {
    strata_core::crc::mask(strata_core::crc::extend(seed, payload))
}
