//! WAL writer: splits logical records into block-aligned physical chunks
//!
//! A logical record of any length (including zero) is written as one `Full`
//! chunk, or as a `First`, zero or more `Middle`, and a `Last` chunk when it
//! does not fit in the space left in the current block.
//!
//! # Block offset
//!
//! The writer tracks how many bytes of the current block are used. When
//! fewer than [`HEADER_SIZE`] bytes remain, the tail is zero-filled and the
//! next chunk starts a fresh block, so a header never straddles a boundary.
//!
//! The offset is advanced for every chunk the writer *attempts* to emit,
//! whether or not the destination accepted it. It always reflects the
//! intended file layout; after an I/O error the writer should be discarded.

use super::config::WalConfig;
use super::dest::{LogFile, WritableFile};
use super::format::{
    chunk_crc, type_crc_table, ChunkHeader, RecordType, BLOCK_SIZE, HEADER_SIZE,
    MAX_CHUNK_PAYLOAD, MAX_RECORD_TYPE,
};
use crate::error::Result;
use std::path::Path;
use tracing::{debug, warn};

/// Zero bytes used to fill a block trailer
const TRAILER_PADDING: [u8; HEADER_SIZE - 1] = [0; HEADER_SIZE - 1];

/// Physical WAL writer
///
/// Owns the block offset and the per-type checksum seeds. The destination
/// may be owned or borrowed (`&mut D` is itself a [`WritableFile`]).
///
/// Not synchronized: exactly one writer may append to a destination, and
/// callers must serialize access. See [`SharedWalWriter`](super::SharedWalWriter)
/// for a locked wrapper.
///
/// # Example
///
/// ```ignore
/// use strata_durability::wal::WalWriter;
///
/// let mut buf: Vec<u8> = Vec::new();
/// let mut writer = WalWriter::new(&mut buf);
/// writer.add_record(b"batch")?;
/// ```
pub struct WalWriter<D: WritableFile> {
    dest: D,
    /// Bytes already used in the current block
    block_offset: usize,
    /// CRC32C of each type byte, used to seed chunk checksums
    type_crc: [u32; MAX_RECORD_TYPE + 1],
}

impl<D: WritableFile> WalWriter<D> {
    /// Writer for a destination that is empty (or positioned on a block boundary)
    pub fn new(dest: D) -> Self {
        Self::with_offset(dest, 0)
    }

    /// Writer for a destination that already holds `dest_length` bytes
    ///
    /// `dest_length` must come from a previous writer's accounting or from a
    /// reader that validated the file.
    pub fn with_offset(dest: D, dest_length: u64) -> Self {
        Self {
            dest,
            block_offset: (dest_length % BLOCK_SIZE as u64) as usize,
            type_crc: type_crc_table(),
        }
    }

    /// Bytes already used in the current block
    #[inline]
    pub fn block_offset(&self) -> usize {
        self.block_offset
    }

    /// Shared access to the destination
    pub fn get_ref(&self) -> &D {
        &self.dest
    }

    /// Exclusive access to the destination
    ///
    /// Appending through this handle desynchronizes the block offset.
    pub fn get_mut(&mut self) -> &mut D {
        &mut self.dest
    }

    /// Release the destination
    pub fn into_inner(self) -> D {
        self.dest
    }

    /// Force everything written so far to stable storage
    pub fn sync(&mut self) -> Result<()> {
        self.dest.sync()?;
        Ok(())
    }

    /// Append one logical record
    ///
    /// Returns only after every chunk of the record has been appended and
    /// flushed. On error, the chunks emitted before the failure remain in the
    /// destination as an incomplete record; a reader detects them by type
    /// sequence, checksum or truncation.
    pub fn add_record(&mut self, record: &[u8]) -> Result<()> {
        let mut remaining = record;
        let mut begin = true;

        // An empty record still emits one zero-length Full chunk
        loop {
            let leftover = BLOCK_SIZE - self.block_offset;
            if leftover < HEADER_SIZE {
                self.switch_block(leftover)?;
            }

            debug_assert!(BLOCK_SIZE - self.block_offset >= HEADER_SIZE);

            let avail = BLOCK_SIZE - self.block_offset - HEADER_SIZE;
            let fragment_len = remaining.len().min(avail);
            let end = remaining.len() == fragment_len;

            let (fragment, rest) = remaining.split_at(fragment_len);
            self.emit_chunk(RecordType::for_fragment(begin, end), fragment)?;

            remaining = rest;
            begin = false;

            if remaining.is_empty() {
                return Ok(());
            }
        }
    }

    /// Zero-fill the `leftover` trailer bytes and start a new block
    fn switch_block(&mut self, leftover: usize) -> Result<()> {
        // The offset moves to the next block even if padding fails
        self.block_offset = 0;
        if leftover > 0 {
            debug!(target: "strata::wal", padding = leftover, "padding block trailer");
            self.dest.append(&TRAILER_PADDING[..leftover])?;
        }
        Ok(())
    }

    /// Write one chunk: header, payload, flush
    fn emit_chunk(&mut self, record_type: RecordType, payload: &[u8]) -> Result<()> {
        debug_assert!(payload.len() <= MAX_CHUNK_PAYLOAD);
        debug_assert!(self.block_offset + HEADER_SIZE + payload.len() <= BLOCK_SIZE);

        let header = ChunkHeader {
            masked_crc: chunk_crc(self.type_crc[record_type as usize], payload),
            length: payload.len() as u16,
            record_type: record_type.as_u8(),
        };

        let result = self.write_chunk(&header.encode(), payload);

        // Unconditional: keeps later writes block-aligned after a failure
        self.block_offset += HEADER_SIZE + payload.len();

        if let Err(e) = &result {
            warn!(
                target: "strata::wal",
                record_type = ?record_type,
                len = payload.len(),
                error = %e,
                "failed to emit WAL chunk"
            );
        }
        result.map_err(Into::into)
    }

    fn write_chunk(&mut self, header: &[u8], payload: &[u8]) -> std::io::Result<()> {
        self.dest.append(header)?;
        self.dest.append(payload)?;
        self.dest.flush()
    }
}

impl WalWriter<LogFile> {
    /// Open (or create) the WAL file at `path` and attach a writer at its end
    pub fn open(path: impl AsRef<Path>, config: &WalConfig) -> Result<Self> {
        let file = LogFile::open(path, config)?;
        let len = file.len();
        debug!(
            target: "strata::wal",
            path = %file.path().display(),
            len,
            block_offset = len % BLOCK_SIZE as u64,
            "attached WAL writer"
        );
        Ok(Self::with_offset(file, len))
    }
}

impl<D: WritableFile + std::fmt::Debug> std::fmt::Debug for WalWriter<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalWriter")
            .field("dest", &self.dest)
            .field("block_offset", &self.block_offset)
            .finish()
    }
}
