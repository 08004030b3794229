//! WAL reader: reassembles logical records from block-framed chunks
//!
//! The reader consumes its source one block at a time. Reading stops at the
//! first chunk that cannot be trusted (bad checksum, unknown type, length
//! overrunning its block, or a chunk cut short by the end of the stream).
//! Everything before that point is returned; [`WalReader::truncate_info`]
//! reports where valid data ends and why.
//!
//! # Recovered Conditions
//!
//! - Block trailers shorter than a header are skipped
//! - A zero-type, zero-length header marks a zero-filled region; the rest of
//!   the block is skipped
//! - A `First` or `Full` chunk while a fragmented record is open drops the
//!   open record
//! - A `Middle` or `Last` chunk with no open record is dropped

use super::config::WalConfig;
use super::format::{
    chunk_crc, type_crc_table, ChunkHeader, RecordType, BLOCK_SIZE, HEADER_SIZE, MAX_RECORD_TYPE,
};
use crate::error::Result;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Why the reader stopped before the end of the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncateReason {
    /// Stream ended inside a chunk header
    TruncatedHeader,
    /// Stream ended inside a chunk payload
    TruncatedPayload,
    /// Stream ended after the first fragments of a record
    IncompleteRecord,
    /// Stored checksum does not match the chunk
    ChecksumMismatch,
    /// Chunk length runs past the end of its block
    BadRecordLength,
    /// Type byte is not a known chunk type
    UnknownRecordType(u8),
}

impl fmt::Display for TruncateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TruncateReason::TruncatedHeader => write!(f, "truncated chunk header"),
            TruncateReason::TruncatedPayload => write!(f, "truncated chunk payload"),
            TruncateReason::IncompleteRecord => write!(f, "record missing its last fragment"),
            TruncateReason::ChecksumMismatch => write!(f, "checksum mismatch"),
            TruncateReason::BadRecordLength => write!(f, "chunk length overruns block"),
            TruncateReason::UnknownRecordType(t) => write!(f, "unknown record type {}", t),
        }
    }
}

/// Where and why valid log data ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncateInfo {
    /// Stream offset just past the last complete record
    ///
    /// Truncating the file here and attaching a writer at this length
    /// resumes the log cleanly.
    pub valid_end: u64,
    /// Stream offset of the offending chunk (or of the end of stream)
    pub chunk_offset: u64,
    /// What was wrong
    pub reason: TruncateReason,
}

/// Position of a chunk within its logical record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fragment {
    Full,
    First,
    Middle,
    Last,
}

impl Fragment {
    /// `None` for the reserved zero type and unknown types
    fn from_record_type(record_type: RecordType) -> Option<Self> {
        match record_type {
            RecordType::Zero => None,
            RecordType::Full => Some(Fragment::Full),
            RecordType::First => Some(Fragment::First),
            RecordType::Middle => Some(Fragment::Middle),
            RecordType::Last => Some(Fragment::Last),
        }
    }
}

/// One physical chunk located in the current block
struct Chunk {
    fragment: Fragment,
    /// Payload range within the block buffer
    start: usize,
    end: usize,
}

/// Block-at-a-time WAL reader
pub struct WalReader<R: Read> {
    source: R,
    verify_checksums: bool,
    type_crc: [u32; MAX_RECORD_TYPE + 1],
    /// Current block (shorter than `BLOCK_SIZE` only at end of stream)
    block: Vec<u8>,
    /// Read position in `block`
    pos: usize,
    /// Stream offset of `block[0]`
    block_start: u64,
    /// Source is exhausted
    eof: bool,
    /// Stream offset just past the last complete record
    valid_end: u64,
    truncated: Option<TruncateInfo>,
}

impl<R: Read> WalReader<R> {
    /// Reader with checksum verification enabled
    pub fn new(source: R) -> Self {
        Self::with_config(source, &WalConfig::default())
    }

    /// Reader honoring `config.verify_checksums`
    pub fn with_config(source: R, config: &WalConfig) -> Self {
        Self {
            source,
            verify_checksums: config.verify_checksums,
            type_crc: type_crc_table(),
            block: Vec::with_capacity(BLOCK_SIZE),
            pos: 0,
            block_start: 0,
            eof: false,
            valid_end: 0,
            truncated: None,
        }
    }

    /// Stream offset just past the last complete record returned
    pub fn valid_end(&self) -> u64 {
        self.valid_end
    }

    /// Set once the reader has stopped at an untrusted chunk
    pub fn truncate_info(&self) -> Option<&TruncateInfo> {
        self.truncated.as_ref()
    }

    /// Iterate over the remaining records
    pub fn records(&mut self) -> Records<'_, R> {
        Records { reader: self }
    }

    /// Read the next logical record
    ///
    /// Returns `Ok(None)` at the end of valid data. I/O errors from the
    /// source are returned as errors; damaged data is not.
    pub fn read_record(&mut self) -> Result<Option<Vec<u8>>> {
        let mut record = Vec::new();
        let mut in_fragmented = false;

        loop {
            let Some(chunk) = self.read_chunk()? else {
                if in_fragmented && self.truncated.is_none() {
                    let end = self.block_start + self.block.len() as u64;
                    self.stop(end, TruncateReason::IncompleteRecord);
                }
                return Ok(None);
            };

            let payload = &self.block[chunk.start..chunk.end];
            let chunk_end = self.block_start + chunk.end as u64;

            match chunk.fragment {
                Fragment::Full => {
                    if in_fragmented {
                        self.report_drop(record.len(), "partial record without end");
                    }
                    let full = payload.to_vec();
                    self.valid_end = chunk_end;
                    return Ok(Some(full));
                }
                Fragment::First => {
                    if in_fragmented {
                        self.report_drop(record.len(), "partial record without end");
                    }
                    record.clear();
                    record.extend_from_slice(payload);
                    in_fragmented = true;
                }
                Fragment::Middle => {
                    if in_fragmented {
                        record.extend_from_slice(payload);
                    } else {
                        let len = payload.len();
                        self.report_drop(len, "missing start of fragmented record");
                    }
                }
                Fragment::Last => {
                    if in_fragmented {
                        record.extend_from_slice(payload);
                        self.valid_end = chunk_end;
                        return Ok(Some(record));
                    }
                    let len = payload.len();
                    self.report_drop(len, "missing start of fragmented record");
                }
            }
        }
    }

    /// Locate the next trusted chunk, or `None` at end of valid data
    fn read_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.truncated.is_some() {
            return Ok(None);
        }

        loop {
            let left = self.block.len() - self.pos;
            if left < HEADER_SIZE {
                if !self.eof {
                    // Trailer padding (or nothing): move to the next block
                    self.fill_block()?;
                    continue;
                }
                if left > 0 {
                    let offset = self.block_start + self.pos as u64;
                    self.stop(offset, TruncateReason::TruncatedHeader);
                }
                return Ok(None);
            }

            let chunk_offset = self.block_start + self.pos as u64;
            let Some(header) = ChunkHeader::decode(&self.block[self.pos..]) else {
                return Ok(None);
            };
            let length = header.length as usize;

            if HEADER_SIZE + length > left {
                let reason = if self.eof {
                    TruncateReason::TruncatedPayload
                } else {
                    TruncateReason::BadRecordLength
                };
                self.stop(chunk_offset, reason);
                return Ok(None);
            }

            if header.record_type == RecordType::Zero.as_u8() && length == 0 {
                debug!(
                    target: "strata::wal",
                    offset = chunk_offset,
                    skipped = left,
                    "skipping zero-filled block region"
                );
                self.pos = self.block.len();
                continue;
            }

            // A zero type with a payload is as untrusted as an unknown one
            let typed = RecordType::from_u8(header.record_type)
                .and_then(|t| Fragment::from_record_type(t).map(|f| (t, f)));
            let Some((record_type, fragment)) = typed else {
                self.stop(
                    chunk_offset,
                    TruncateReason::UnknownRecordType(header.record_type),
                );
                return Ok(None);
            };

            let start = self.pos + HEADER_SIZE;
            let end = start + length;

            if self.verify_checksums {
                let seed = self.type_crc[record_type as usize];
                if chunk_crc(seed, &self.block[start..end]) != header.masked_crc {
                    self.stop(chunk_offset, TruncateReason::ChecksumMismatch);
                    return Ok(None);
                }
            }

            self.pos = end;
            return Ok(Some(Chunk {
                fragment,
                start,
                end,
            }));
        }
    }

    /// Load the next block, short only at end of stream
    fn fill_block(&mut self) -> Result<()> {
        self.block_start += self.block.len() as u64;
        self.block.clear();
        self.block.resize(BLOCK_SIZE, 0);
        self.pos = 0;

        let mut filled = 0;
        while filled < BLOCK_SIZE {
            match self.source.read(&mut self.block[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.block.truncate(filled);
                    return Err(e.into());
                }
            }
        }

        self.block.truncate(filled);
        if filled < BLOCK_SIZE {
            self.eof = true;
        }
        Ok(())
    }

    fn stop(&mut self, chunk_offset: u64, reason: TruncateReason) {
        warn!(
            target: "strata::wal",
            valid_end = self.valid_end,
            chunk_offset,
            %reason,
            "WAL ends at damaged or incomplete data"
        );
        self.truncated = Some(TruncateInfo {
            valid_end: self.valid_end,
            chunk_offset,
            reason,
        });
    }

    fn report_drop(&self, bytes: usize, reason: &str) {
        warn!(
            target: "strata::wal",
            bytes,
            reason,
            block_start = self.block_start,
            "dropping WAL fragment"
        );
    }
}

impl WalReader<File> {
    /// Open the WAL file at `path` for reading
    pub fn open(path: impl AsRef<Path>, config: &WalConfig) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::with_config(file, config))
    }
}

/// Iterator over the records of a [`WalReader`]
pub struct Records<'a, R: Read> {
    reader: &'a mut WalReader<R>,
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}
